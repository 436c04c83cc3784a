//! Credential storage.
//!
//! The auth core only talks to storage through [`UserStore`] and [`RoleStore`].
//! Each call is a single read or a single write; any transactional guarantees
//! belong to the implementation.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewUser, Role, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError>;

    /// Persists a new user together with its role links and returns the stored record.
    async fn save(&self, user: NewUser) -> Result<User, AppError>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn exists_by_id(&self, id: i32) -> Result<bool, AppError>;

    /// Inserts the role row keyed by [`Role::id`]. Inserting an existing row is a no-op.
    async fn insert(&self, role: Role) -> Result<(), AppError>;
}
