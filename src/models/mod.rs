pub mod role;
pub mod user;

pub use role::Role;
pub use user::{NewUser, Principal, User};
