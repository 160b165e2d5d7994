/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Bearer token issuing and parsing
/// - [`middleware`]: Resolving a request's bearer token into a user
/// - [`authorization`]: Permission table and access predicates
///
/// # Example
///
/// ```
/// use scoutstribe_shared::auth::password::{hash_password, verify_password};
/// use scoutstribe_shared::auth::token::{issue_token, parse_token};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("leader123")?;
/// assert!(verify_password("leader123", &hash)?);
///
/// let token = issue_token(2);
/// assert_eq!(parse_token(&token)?, 2);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod middleware;
pub mod password;
pub mod token;
