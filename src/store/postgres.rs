use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::collections::BTreeSet;

use super::{RoleStore, UserStore};
use crate::error::{AppError, AuthError};
use crate::models::{NewUser, Role, User};

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS roles (
        id INTEGER PRIMARY KEY,
        name VARCHAR(20) NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(20) NOT NULL,
        email VARCHAR(50) NOT NULL,
        password VARCHAR(120) NOT NULL,
        CONSTRAINT users_username_key UNIQUE (username),
        CONSTRAINT users_email_key UNIQUE (email)
    )",
    "CREATE TABLE IF NOT EXISTS user_roles (
        user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        role_id INTEGER NOT NULL REFERENCES roles (id),
        PRIMARY KEY (user_id, role_id)
    )",
];

const UNIQUE_VIOLATION: &str = "23505";

/// Maps a unique-constraint name on `users` to the duplicate it reports.
fn duplicate_for(constraint: &str) -> Option<AuthError> {
    match constraint {
        "users_username_key" => Some(AuthError::DuplicateUsername),
        "users_email_key" => Some(AuthError::DuplicateEmail),
        _ => None,
    }
}

/// A signup that lost a race against another one for the same username or
/// email hits the unique constraint on insert; report it as the duplicate.
fn insert_user_error(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &error {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            if let Some(duplicate) = db.constraint().and_then(duplicate_for) {
                return duplicate.into();
            }
        }
    }
    error.into()
}

/// PostgreSQL-backed credential store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password: String,
    roles: Vec<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let roles: BTreeSet<Role> = row
            .roles
            .iter()
            .filter_map(|name| {
                let role = Role::from_name(name);
                if role.is_none() {
                    log::warn!("Ignoring unknown role '{}' on user {}", name, row.id);
                }
                role
            })
            .collect();

        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password,
            roles,
        }
    }
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Creates the credential tables if they do not exist.
    pub async fn migrate(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT u.id, u.username, u.email, u.password,
                    COALESCE(array_agg(r.name::text ORDER BY r.id) FILTER (WHERE r.id IS NOT NULL),
                             ARRAY[]::text[]) AS roles
             FROM users u
             LEFT JOIN user_roles ur ON ur.user_id = u.id
             LEFT JOIN roles r ON r.id = ur.role_id
             WHERE u.username = $1
             GROUP BY u.id",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn save(&self, user: NewUser) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, email, password) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(insert_user_error)?;

        for role in &user.roles {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(id)
                .bind(role.id())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            roles: user.roles,
        })
    }
}

#[async_trait]
impl RoleStore for PgStore {
    async fn exists_by_id(&self, id: i32) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM roles WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn insert(&self, role: Role) -> Result<(), AppError> {
        sqlx::query("INSERT INTO roles (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING")
            .bind(role.id())
            .bind(role.name())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
