use std::sync::Arc;

use super::password::PasswordHasher;
use crate::error::{AppError, AuthError};
use crate::models::Principal;
use crate::store::UserStore;

/// Verifies username/password pairs against the credential store.
///
/// An unknown username and a wrong password produce the same
/// [`AuthError::BadCredentials`]. When the user does not exist the password is
/// still checked against a throwaway digest, so both paths cost one bcrypt
/// verification.
pub struct AuthenticationManager {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    missing_user_hash: String,
}

impl AuthenticationManager {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> Result<Self, AppError> {
        let missing_user_hash = hasher.hash("userNotFoundPassword")?;
        Ok(Self {
            users,
            hasher,
            missing_user_hash,
        })
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Returns the principal for a matching username/password pair.
    ///
    /// `Err(AppError::Unauthorized)` carries the uniform bad-credentials message;
    /// storage failures surface as their own `AppError`.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Principal, AppError> {
        let user = self.users.find_by_username(username).await?;

        match user {
            Some(user) => {
                if self.hasher.verify(password, &user.password_hash)? {
                    log::debug!("Authenticated user {}", user.username);
                    Ok(Principal::from(user))
                } else {
                    Err(AuthError::BadCredentials.into())
                }
            }
            None => {
                let _ = self.hasher.verify(password, &self.missing_user_hash);
                Err(AuthError::BadCredentials.into())
            }
        }
    }
}
