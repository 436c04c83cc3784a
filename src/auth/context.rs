use crate::error::AuthError;
use crate::models::{Principal, Role};

/// Authentication state of one request.
///
/// Created by the interceptor for every request and stored in the request's
/// extensions; it is never shared between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    principal: Option<Principal>,
}

impl SecurityContext {
    pub fn anonymous() -> Self {
        Self { principal: None }
    }

    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    pub fn require_authenticated(&self) -> Result<&Principal, AuthError> {
        self.principal.as_ref().ok_or(AuthError::Unauthenticated)
    }

    /// Succeeds when the principal holds at least one of `roles`.
    pub fn require_any_role(&self, roles: &[Role]) -> Result<&Principal, AuthError> {
        let principal = self.require_authenticated()?;
        if principal.has_any_role(roles) {
            Ok(principal)
        } else {
            Err(AuthError::InsufficientRole)
        }
    }
}
