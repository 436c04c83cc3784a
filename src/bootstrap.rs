use crate::error::AppError;
use crate::models::Role;
use crate::store::RoleStore;

/// Ensures every [`Role`] has its row, keyed by ordinal + 1, in declaration order.
///
/// Safe to run on every startup: existing rows are left untouched. Returns the
/// roles that were inserted by this run.
pub async fn init_roles(roles: &dyn RoleStore) -> Result<Vec<Role>, AppError> {
    let mut created = Vec::new();
    for role in Role::ALL {
        if !roles.exists_by_id(role.id()).await? {
            roles.insert(role).await?;
            created.push(role);
        }
    }

    if created.is_empty() {
        log::debug!("All roles already present");
    } else {
        log::info!("Created roles: {:?}", created);
    }
    Ok(created)
}
