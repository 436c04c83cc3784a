#![allow(dead_code, unused_macros)]

use actix_web::web;
use std::collections::BTreeSet;
use std::sync::Arc;

use taskmanager::auth::{AccessPolicy, PasswordHasher, TokenService};
use taskmanager::models::{NewUser, Principal, Role, User};
use taskmanager::store::{MemoryStore, UserStore};
use taskmanager::{bootstrap, AppState};

pub const SECRET: &str =
    "dGVzdFNlY3JldEtleVdpdGhBdExlYXN0NjRDaGFyYWN0ZXJzRm9yVGhlSFM1MTJTaWduaW5nQWxnb3JpdGhtIQ==";
pub const TOKEN_TTL_MS: i64 = 3_600_000;

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: web::Data<AppState>,
    pub policy: Arc<AccessPolicy>,
}

impl TestContext {
    pub fn hasher(&self) -> PasswordHasher {
        *self.state.manager.hasher()
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state.tokens.issue(&Principal::from(user)).unwrap()
    }
}

/// Memory-backed state with all roles bootstrapped and a cheap bcrypt cost.
pub async fn context() -> TestContext {
    let store = Arc::new(MemoryStore::new());
    bootstrap::init_roles(store.as_ref()).await.unwrap();
    context_with_users(store.clone(), store)
}

/// Same as [`context`] but routes user lookups and writes through `users`.
pub fn context_with_users(users: Arc<dyn UserStore>, store: Arc<MemoryStore>) -> TestContext {
    let tokens = TokenService::new(SECRET, TOKEN_TTL_MS).unwrap();
    let state = AppState::new(users, store.clone(), tokens, PasswordHasher::new(4)).unwrap();
    TestContext {
        store,
        state: web::Data::new(state),
        policy: Arc::new(AccessPolicy::standard().unwrap()),
    }
}

pub async fn seed_user(ctx: &TestContext, username: &str, password: &str, roles: &[Role]) -> User {
    ctx.store
        .save(NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: ctx.hasher().hash(password).unwrap(),
            roles: roles.iter().copied().collect::<BTreeSet<_>>(),
        })
        .await
        .unwrap()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Builds the service the way `main` wires it, minus CORS and request logging.
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.state.clone())
                .wrap($ctx.state.auth_middleware(std::sync::Arc::clone(&$ctx.policy)))
                .service(taskmanager::routes::health::health)
                .service(actix_web::web::scope("/api").configure(taskmanager::routes::config)),
        )
        .await
    };
}
