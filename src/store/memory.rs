use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use super::{RoleStore, UserStore};
use crate::error::{AppError, AuthError};
use crate::models::{NewUser, Role, User};

/// In-process credential store, used when no database is configured and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Users>,
    roles: RwLock<BTreeMap<i32, Role>>,
}

#[derive(Debug, Default)]
struct Users {
    by_username: HashMap<String, User>,
    last_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.by_username.len()
    }

    pub async fn role_count(&self) -> usize {
        self.roles.read().await.len()
    }

    pub async fn remove_user(&self, username: &str) -> Option<User> {
        self.users.write().await.by_username.remove(username)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.by_username.get(username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.users.read().await.by_username.contains_key(username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        Ok(self
            .users
            .read()
            .await
            .by_username
            .values()
            .any(|user| user.email == email))
    }

    async fn save(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        // Same unique constraints, and the same errors, as `PgStore`.
        if users.by_username.contains_key(&user.username) {
            return Err(AuthError::DuplicateUsername.into());
        }
        if users.by_username.values().any(|u| u.email == user.email) {
            return Err(AuthError::DuplicateEmail.into());
        }

        users.last_id += 1;
        let stored = User {
            id: users.last_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            roles: user.roles,
        };
        users
            .by_username
            .insert(stored.username.clone(), stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn exists_by_id(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.roles.read().await.contains_key(&id))
    }

    async fn insert(&self, role: Role) -> Result<(), AppError> {
        self.roles.write().await.entry(role.id()).or_insert(role);
        Ok(())
    }
}
