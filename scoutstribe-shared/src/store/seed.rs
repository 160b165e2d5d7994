/// Default accounts installed in a fresh store
///
/// | Email                     | Password     | Role         | Grade      |
/// |---------------------------|--------------|--------------|------------|
/// | admin@scoutstribe.com     | admin123     | Admin        | operations |
/// | leader@scoutstribe.com    | leader123    | Tribe Leader | 9          |
/// | counselor@scoutstribe.com | counselor123 | Counselor    | 8          |

use crate::auth::password::{hash_password, PasswordError};
use crate::models::{NewUser, Role};

/// (email, password, role, grade) of each default account
pub const DEFAULT_ACCOUNTS: [(&str, &str, Role, &str); 3] = [
    ("admin@scoutstribe.com", "admin123", Role::Admin, "operations"),
    ("leader@scoutstribe.com", "leader123", Role::TribeLeader, "9"),
    ("counselor@scoutstribe.com", "counselor123", Role::Counselor, "8"),
];

/// Builds the default accounts with hashed passwords
pub fn default_users() -> Result<Vec<NewUser>, PasswordError> {
    DEFAULT_ACCOUNTS
        .iter()
        .map(|(email, password, role, grade)| {
            Ok(NewUser {
                email: email.to_string(),
                password_hash: hash_password(password)?,
                roles: [*role].into_iter().collect(),
                grade: Some(grade.to_string()),
            })
        })
        .collect()
}
