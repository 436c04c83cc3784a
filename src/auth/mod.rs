pub mod context;
pub mod extractors;
pub mod interceptor;
pub mod manager;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod responder;
pub mod signup;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

use crate::models::{Principal, Role};

// Re-export necessary items
pub use context::SecurityContext;
pub use extractors::AuthenticatedPrincipal;
pub use interceptor::RequestInterceptor;
pub use manager::AuthenticationManager;
pub use middleware::AuthMiddleware;
pub use password::PasswordHasher;
pub use policy::{AccessPolicy, Requirement};
pub use responder::{Unauthorized, UnauthorizedBody};
pub use token::{Claims, TokenService};

lazy_static! {
    // Regex for username validation: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username must not be blank"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password must not be blank"))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Must be between 3 and 20 characters, alphanumeric, and can include underscores or hyphens.
    #[validate(
        length(min = 3, max = 20),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub username: String,
    #[validate(email, length(max = 50))]
    pub email: String,
    #[validate(length(min = 6, max = 40))]
    pub password: String,
    /// Requested role names (`"admin"`, `"mod"`, `"user"`). Defaults to user.
    #[serde(default, alias = "role")]
    pub roles: Option<BTreeSet<String>>,
}

/// Response structure after a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
    /// The signed bearer token.
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
}

impl JwtResponse {
    pub fn new(principal: Principal, token: String) -> Self {
        Self {
            id: principal.id,
            username: principal.username,
            email: principal.email,
            roles: principal.roles.into_iter().collect(),
            token,
            token_type: "Bearer".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
