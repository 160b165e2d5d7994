//! # ScoutsTribe Shared Library
//!
//! Domain types and business rules used by the ScoutsTribe API server.
//!
//! ## Module Organization
//!
//! - `grade`: Grade normalization and yearly advancement
//! - `auth`: Passwords, bearer tokens, request authentication and the
//!   permission table
//! - `models`: Users, channels, messages, members, events, attendance
//! - `store`: The `Repository` trait and its in-memory implementation

pub mod auth;
pub mod grade;
pub mod models;
pub mod store;

/// Current version of the ScoutsTribe shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
