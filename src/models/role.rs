use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of roles a user can hold.
///
/// Declaration order is significant: the persisted primary key of each role is
/// its position in [`Role::ALL`] plus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_MODERATOR")]
    Moderator,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Moderator, Role::Admin];

    pub fn ordinal(self) -> usize {
        match self {
            Role::User => 0,
            Role::Moderator => 1,
            Role::Admin => 2,
        }
    }

    /// Primary key of the role row.
    pub fn id(self) -> i32 {
        self.ordinal() as i32 + 1
    }

    /// Stored name, e.g. `ROLE_ADMIN`.
    pub fn name(self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Moderator => "ROLE_MODERATOR",
            Role::Admin => "ROLE_ADMIN",
        }
    }

    pub fn from_name(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.name() == name)
    }

    /// Maps a role requested at signup (`"admin"`, `"mod"`, anything else) to a role.
    pub fn from_signup_name(name: &str) -> Role {
        match name {
            "admin" => Role::Admin,
            "mod" => Role::Moderator,
            _ => Role::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
