/// Bearer token issuing and parsing
///
/// Tokens are the mock format `fake-jwt-token-for-user-<id>` used by the web
/// client. They are not signed and carry nothing but the user ID; the user is
/// re-loaded from the store on every request, so a deleted user's token stops
/// working immediately.
///
/// # Example
///
/// ```
/// use scoutstribe_shared::auth::token::{issue_token, parse_token};
///
/// let token = issue_token(42);
/// assert_eq!(token, "fake-jwt-token-for-user-42");
/// assert_eq!(parse_token(&token).unwrap(), 42);
/// ```

/// Prefix shared by every issued token
pub const TOKEN_PREFIX: &str = "fake-jwt-token-for-user-";

/// Error type for token parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Token does not start with the expected prefix
    #[error("Unrecognized token")]
    UnknownFormat,

    /// Token suffix is not a user ID
    #[error("Invalid user id in token: {0}")]
    InvalidUserId(String),
}

/// Issues the bearer token for `user_id`
pub fn issue_token(user_id: u64) -> String {
    format!("{}{}", TOKEN_PREFIX, user_id)
}

/// Extracts the user ID from a bearer token
///
/// # Errors
///
/// Returns `TokenError` if the prefix is missing or the ID does not parse.
pub fn parse_token(token: &str) -> Result<u64, TokenError> {
    let id = token
        .trim()
        .strip_prefix(TOKEN_PREFIX)
        .ok_or(TokenError::UnknownFormat)?;

    id.parse()
        .map_err(|_| TokenError::InvalidUserId(id.to_string()))
}
