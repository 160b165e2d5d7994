//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - A router over a freshly seeded in-memory store
//! - Login helpers for the default accounts
//! - Request helpers returning status and parsed JSON body
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use scoutstribe_api::app::{build_router, AppState};
use scoutstribe_api::config::Config;
use scoutstribe_shared::store::{MemoryStore, Repository};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service as _;

pub const ADMIN_EMAIL: &str = "admin@scoutstribe.com";
pub const LEADER_EMAIL: &str = "leader@scoutstribe.com";
pub const COUNSELOR_EMAIL: &str = "counselor@scoutstribe.com";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a context whose store holds the three default accounts
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::seeded().expect("seed default users"));
        Self::with_store(store)
    }

    /// Creates a context without any users
    pub fn empty() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    fn with_store(store: Arc<MemoryStore>) -> Self {
        let config = Config::default();
        let repo: Arc<dyn Repository> = store.clone();
        let app = build_router(AppState::new(repo, config.clone()));

        Self { store, app, config }
    }

    /// Sends a request and returns the status with the parsed body
    ///
    /// Non-JSON bodies come back as a JSON string.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Logs in and returns the bearer token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "login failed for {}: {}", email, body);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, "admin123").await
    }

    pub async fn leader_token(&self) -> String {
        self.login(LEADER_EMAIL, "leader123").await
    }

    pub async fn counselor_token(&self) -> String {
        self.login(COUNSELOR_EMAIL, "counselor123").await
    }

    /// Creates a user through the admin endpoint and logs in as them
    pub async fn user_token(&self, email: &str, roles: &[&str], grade: &str) -> String {
        let admin = self.admin_token().await;
        let (status, body) = self
            .post(
                "/api/admin/users",
                &admin,
                json!({ "email": email, "password": "password1", "roles": roles, "grade": grade }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create user failed: {}", body);

        self.login(email, "password1").await
    }

    /// Registers a member as `token` and returns its ID
    pub async fn create_member(
        &self,
        token: &str,
        first_name: &str,
        grade: &str,
        year: &str,
    ) -> u64 {
        let (status, body) = self
            .post(
                "/api/grade/members",
                token,
                json!({ "firstName": first_name, "lastName": "Scout", "grade": grade, "year": year }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create member failed: {}", body);

        body["id"].as_u64().unwrap()
    }
}
