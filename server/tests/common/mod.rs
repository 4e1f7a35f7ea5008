//! Common Test Utilities for Integration Tests
//!
//! Shared helpers used across integration test modules.

#![allow(dead_code)]

use axum::{
    Json, Router,
    body::{Body, Bytes},
    http::{Request, StatusCode, header},
    routing::get,
};
use detour_server::config::{FlowConfig, NavigationPolicy};
use detour_server::{AppState, FlowController, MemorySessionStore, flow_routes};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;
use tower_http::cors::{Any, CorsLayer};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Flow configuration suitable for tests: no search delay
pub fn test_flow_config(navigation: NavigationPolicy) -> FlowConfig {
    FlowConfig {
        search_delay: Duration::ZERO,
        otp_success_attempt: 4,
        navigation,
    }
}

/// Create a test application router with state
pub fn create_test_app_with_state(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(flow_routes())
        .layer(cors)
        .with_state(state)
}

/// Application state with the given policy and session TTL
pub fn create_test_state(navigation: NavigationPolicy, ttl: Duration) -> AppState {
    AppState::new()
        .with_session_store(Arc::new(MemorySessionStore::new(ttl)))
        .with_flow(FlowController::new(test_flow_config(navigation)))
}

/// Collected response
pub struct FlowResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Bytes,
}

impl FlowResponse {
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "Failed to parse body ({}): {}",
                e,
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn is_redirect_to(&self, path: &str) -> bool {
        self.status == StatusCode::SEE_OTHER && self.location.as_deref() == Some(path)
    }
}

/// A single browser-like client: one router, one cookie jar
pub struct FlowClient {
    pub state: AppState,
    router: Router,
    cookie: Option<String>,
}

impl FlowClient {
    pub fn new() -> Self {
        Self::with_state(create_test_state(
            NavigationPolicy::Permissive,
            Duration::from_secs(60),
        ))
    }

    pub fn with_state(state: AppState) -> Self {
        let router = create_test_app_with_state(state.clone());
        Self {
            state,
            router,
            cookie: None,
        }
    }

    /// Another client sharing this client's server
    pub fn second_client(&self) -> Self {
        Self {
            state: self.state.clone(),
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Another client holding this client's session cookie, like a second tab
    pub fn same_session(&self) -> Self {
        Self {
            state: self.state.clone(),
            router: self.router.clone(),
            cookie: self.cookie.clone(),
        }
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    async fn send(&mut self, request: Request<Body>) -> FlowResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        if let Some(value) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = value.split(';').next()
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

        FlowResponse {
            status,
            location,
            body,
        }
    }

    pub async fn get(&mut self, uri: &str) -> FlowResponse {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(Body::empty()).expect("Failed to build request");
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, body: &str) -> FlowResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.send(request).await
    }
}
