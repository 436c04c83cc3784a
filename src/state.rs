use std::sync::Arc;

use crate::auth::{
    AccessPolicy, AuthMiddleware, AuthenticationManager, PasswordHasher, RequestInterceptor,
    TokenService,
};
use crate::error::AppError;
use crate::store::{RoleStore, UserStore};

/// Shared handler state. Built once at startup and handed to actix as `web::Data`.
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub roles: Arc<dyn RoleStore>,
    pub tokens: Arc<TokenService>,
    pub manager: Arc<AuthenticationManager>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        tokens: TokenService,
        hasher: PasswordHasher,
    ) -> Result<Self, AppError> {
        let manager = AuthenticationManager::new(Arc::clone(&users), hasher)?;
        Ok(Self {
            users,
            roles,
            tokens: Arc::new(tokens),
            manager: Arc::new(manager),
        })
    }

    /// Builds the request middleware sharing this state's token service and user store.
    pub fn auth_middleware(&self, policy: Arc<AccessPolicy>) -> AuthMiddleware {
        let interceptor = RequestInterceptor::new(Arc::clone(&self.tokens), Arc::clone(&self.users));
        AuthMiddleware::new(Arc::new(interceptor), policy)
    }
}
