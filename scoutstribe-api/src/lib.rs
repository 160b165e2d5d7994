//! # ScoutsTribe API Server Library
//!
//! HTTP layer of the ScoutsTribe server: authentication, grade channels and
//! messaging, member roster, events and attendance, and user administration.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
