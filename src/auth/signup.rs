use std::collections::BTreeSet;

use super::password::PasswordHasher;
use super::SignupRequest;
use crate::error::{AppError, AuthError};
use crate::models::{NewUser, Role, User};
use crate::store::{RoleStore, UserStore};

/// Registers a new user.
///
/// Duplicate checks run before anything is written: a taken username or email
/// returns without touching the store. Requested roles are mapped by
/// [`Role::from_signup_name`]; no roles means [`Role::User`]. Every assigned role
/// must already exist in the store.
pub async fn register_user(
    users: &dyn UserStore,
    roles: &dyn RoleStore,
    hasher: &PasswordHasher,
    request: SignupRequest,
) -> Result<User, AppError> {
    if users.exists_by_username(&request.username).await? {
        return Err(AuthError::DuplicateUsername.into());
    }
    if users.exists_by_email(&request.email).await? {
        return Err(AuthError::DuplicateEmail.into());
    }

    let assigned = resolve_roles(request.roles.as_ref());
    for role in &assigned {
        if !roles.exists_by_id(role.id()).await? {
            log::error!("{} missing from role table; was bootstrap run?", role);
            return Err(AuthError::RoleNotFound.into());
        }
    }

    let password_hash = hasher.hash(&request.password)?;
    let user = users
        .save(NewUser {
            username: request.username,
            email: request.email,
            password_hash,
            roles: assigned,
        })
        .await?;

    log::info!("Registered user {} with roles {:?}", user.username, user.roles);
    Ok(user)
}

fn resolve_roles(requested: Option<&BTreeSet<String>>) -> BTreeSet<Role> {
    match requested {
        Some(names) if !names.is_empty() => names
            .iter()
            .map(|name| Role::from_signup_name(name))
            .collect(),
        _ => BTreeSet::from([Role::User]),
    }
}
