use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AuthError;

/// Body of every 401 produced by the access layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnauthorizedBody {
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

/// An access failure on a specific path.
///
/// Renders as HTTP 401 with an [`UnauthorizedBody`]. The message is the fixed
/// description of the [`AuthError`] kind and never carries internal detail.
#[derive(Debug, Clone)]
pub struct Unauthorized {
    path: String,
    reason: AuthError,
}

impl Unauthorized {
    pub fn new(path: impl Into<String>, reason: AuthError) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }

    pub fn body(&self) -> UnauthorizedBody {
        UnauthorizedBody {
            status: StatusCode::UNAUTHORIZED.as_u16(),
            error: "Unauthorized".to_string(),
            message: self.reason.to_string(),
            path: self.path.clone(),
        }
    }
}

impl fmt::Display for Unauthorized {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unauthorized on {}: {}", self.path, self.reason)
    }
}

impl ResponseError for Unauthorized {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        log::warn!("{}", self);
        HttpResponse::Unauthorized().json(self.body())
    }
}
