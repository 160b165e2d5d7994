/// User model and role set
///
/// Users hold a non-exclusive set of roles and an optional grade. The stored
/// record carries an Argon2 password hash; handlers only ever hand out
/// [`UserView`], which omits it.
///
/// # Example
///
/// ```
/// use scoutstribe_shared::models::user::{Role, RoleSet};
///
/// let roles: RoleSet = [Role::Counselor, Role::TribeLeader].into_iter().collect();
/// assert!(roles.contains(&Role::TribeLeader));
/// assert_eq!("Tribe Leader".parse::<Role>().unwrap(), Role::TribeLeader);
/// ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// RBAC roles a user can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Scoped to a single grade
    Counselor,

    /// Oversees every grade
    #[serde(rename = "Tribe Leader")]
    TribeLeader,

    /// Full control, including user deletion
    Admin,
}

impl Role {
    /// All roles, lowest authority first
    pub const ALL: [Role; 3] = [Role::Counselor, Role::TribeLeader, Role::Admin];

    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Counselor => "Counselor",
            Role::TribeLeader => "Tribe Leader",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s.trim())
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// A user's roles (ordered, deduplicated)
pub type RoleSet = BTreeSet<Role>;

/// Parses a list of role names into a non-empty role set
///
/// # Errors
///
/// Returns the first unknown role name. An empty list parses to an empty
/// set; callers decide whether that is acceptable.
pub fn parse_roles<S: AsRef<str>>(names: &[S]) -> Result<RoleSet, UnknownRole> {
    names.iter().map(|name| name.as_ref().parse()).collect()
}

/// Stored user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Auto-incrementing user ID
    pub id: u64,

    /// Email address, unique across users
    pub email: String,

    /// Argon2 password hash
    pub password_hash: String,

    /// Roles held by the user
    pub roles: RoleSet,

    /// Assigned grade, if any
    pub grade: Option<String>,
}

impl User {
    /// Checks whether the user holds `role`
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Public view of the user
    pub fn view(&self) -> UserView {
        UserView::from(self)
    }
}

/// Input for creating a user; the store assigns the ID
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub roles: RoleSet,
    pub grade: Option<String>,
}

/// User as returned by the API (no password)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: u64,
    pub email: String,
    pub roles: RoleSet,
    pub grade: Option<String>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            roles: user.roles.clone(),
            grade: user.grade.clone(),
        }
    }
}
