/// Request authentication
///
/// Resolves the `Authorization: Bearer <token>` header into the acting
/// [`User`]. The API's auth layer calls [`authenticate`] and inserts the
/// resulting [`AuthContext`] into request extensions, where handlers pick it
/// up with Axum's `Extension` extractor.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use scoutstribe_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.user.email)
/// }
/// ```

use axum::http::{header, HeaderMap};

use super::token::{parse_token, TokenError};
use crate::models::User;
use crate::store::Repository;

/// Authentication context added to request extensions
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated user as loaded for this request
    pub user: User,
}

impl AuthContext {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    /// ID of the authenticated user
    pub fn user_id(&self) -> u64 {
        self.user.id
    }
}

/// Error type for request authentication
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Header present but not a Bearer token
    InvalidFormat(String),

    /// Token could not be parsed
    InvalidToken(String),

    /// Token names a user that does not exist
    UnknownUser(u64),

    /// Store lookup failed
    StoreError(String),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::InvalidToken(err.to_string())
    }
}

/// Extracts the bearer token from request headers
///
/// # Errors
///
/// - `AuthError::MissingCredentials` if there is no Authorization header
/// - `AuthError::InvalidFormat` if it is not `Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    auth_header
        .strip_prefix("Bearer ")
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

/// Authenticates a request against the store
///
/// Parses the bearer token and loads the user it names.
pub async fn authenticate(
    repo: &dyn Repository,
    headers: &HeaderMap,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;
    let user_id = parse_token(token)?;

    let user = repo
        .find_user(user_id)
        .await
        .map_err(|e| AuthError::StoreError(e.to_string()))?
        .ok_or(AuthError::UnknownUser(user_id))?;

    tracing::debug!(user_id = user.id, "request authenticated");

    Ok(AuthContext::new(user))
}
