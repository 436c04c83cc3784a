use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use super::context::SecurityContext;
use super::responder::Unauthorized;
use crate::error::AuthError;
use crate::models::Principal;

/// Hands the request's [`SecurityContext`] to a handler.
///
/// Requests that did not pass through `AuthMiddleware` are treated as anonymous.
impl FromRequest for SecurityContext {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let ctx = req
            .extensions()
            .get::<SecurityContext>()
            .cloned()
            .unwrap_or_default();
        ready(Ok(ctx))
    }
}

/// Extracts the authenticated principal, rejecting anonymous requests with the
/// uniform 401 response.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(pub Principal);

impl FromRequest for AuthenticatedPrincipal {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result: Result<Self, Self::Error> = match req.extensions().get::<SecurityContext>() {
            Some(ctx) => ctx
                .require_authenticated()
                .map(|principal| AuthenticatedPrincipal(principal.clone()))
                .map_err(|reason| Unauthorized::new(req.path(), reason).into()),
            None => Err(Unauthorized::new(req.path(), AuthError::Unauthenticated).into()),
        };
        ready(result)
    }
}
