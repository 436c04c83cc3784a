use std::sync::Arc;

use super::context::SecurityContext;
use super::token::TokenService;
use crate::error::AuthError;
use crate::models::Principal;
use crate::store::UserStore;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Returns the token part of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    authorization.and_then(|value| value.strip_prefix(BEARER_PREFIX))
}

/// Turns the `Authorization` header of a request into a [`SecurityContext`].
///
/// Never rejects a request: every failure is logged and yields an anonymous
/// context, leaving the decision to the authorization policy.
pub struct RequestInterceptor {
    tokens: Arc<TokenService>,
    users: Arc<dyn UserStore>,
}

impl RequestInterceptor {
    pub fn new(tokens: Arc<TokenService>, users: Arc<dyn UserStore>) -> Self {
        Self { tokens, users }
    }

    pub async fn intercept(&self, authorization: Option<&str>) -> SecurityContext {
        let Some(token) = bearer_token(authorization) else {
            return SecurityContext::anonymous();
        };

        match self.resolve(token).await {
            Ok(principal) => SecurityContext::authenticated(principal),
            Err(AuthError::EmptyToken) => {
                log::debug!("Cannot set user authentication: {}", AuthError::EmptyToken);
                SecurityContext::anonymous()
            }
            Err(e) => {
                log::warn!("Cannot set user authentication: {}", e);
                SecurityContext::anonymous()
            }
        }
    }

    async fn resolve(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.tokens.verify(token)?;

        match self.users.find_by_username(&claims.sub).await {
            Ok(Some(user)) => Ok(Principal::from(user)),
            Ok(None) => Err(AuthError::UnknownSubject),
            Err(e) => {
                log::error!("Credential lookup for token subject failed: {}", e);
                Err(AuthError::UnknownSubject)
            }
        }
    }
}
