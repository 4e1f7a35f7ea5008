//! Test Utilities Module
//!
//! Drives the flow router in-process and carries the session cookie between
//! requests the way a browser would.
//! This module is only compiled when running tests.

#![cfg(test)]

use crate::config::FlowConfig;
use crate::flow::FlowController;
use crate::server::{AppState, build_router};
use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, StatusCode, header},
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tower::util::ServiceExt;

// ============================================================================
// Test Context
// ============================================================================

/// Router plus the cookie jar of a single client
pub struct TestContext {
    pub app_state: AppState,
    pub router: Router,
    cookie: Option<String>,
}

/// Response with the body already collected
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Bytes,
}

impl TestResponse {
    /// Parse the body as JSON, panicking with the raw body on failure
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "Failed to parse body ({}): {}",
                e,
                String::from_utf8_lossy(&self.body)
            )
        })
    }
}

impl TestContext {
    /// Create a new test context with no search delay
    pub fn new() -> Self {
        let flow = FlowController::new(FlowConfig {
            search_delay: Duration::ZERO,
            ..FlowConfig::default()
        });
        Self::with_state(AppState::new().with_flow(flow))
    }

    pub fn with_state(app_state: AppState) -> Self {
        let router = build_router(app_state.clone());
        Self {
            app_state,
            router,
            cookie: None,
        }
    }

    /// Session id currently held by this client
    pub fn session_id(&self) -> Option<&str> {
        self.cookie
            .as_deref()
            .and_then(|c| c.split_once('='))
            .map(|(_, id)| id)
    }

    /// Send a request, remembering any session cookie handed out
    pub async fn request(&mut self, builder: axum::http::request::Builder, body: Body) -> TestResponse {
        let builder = match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        };
        let request = builder.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.trim().to_string());
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        TestResponse {
            status,
            location,
            body,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let builder = Request::builder().method("GET").uri(uri);
        self.request(builder, Body::empty()).await
    }

    /// POST an urlencoded form body
    pub async fn post_form(&mut self, uri: &str, body: &str) -> TestResponse {
        let builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.request(builder, Body::from(body.to_string())).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
