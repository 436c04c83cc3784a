#![doc = "The `taskmanager` library crate."]
#![doc = ""]
#![doc = "Authentication core of the task manager backend: bcrypt credential checks,"]
#![doc = "HS512 bearer tokens, a per-request interceptor and a route access policy,"]
#![doc = "plus the credential stores and routes the binary (`main.rs`) wires together."]

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::{AppError, AuthError};
pub use crate::state::AppState;
