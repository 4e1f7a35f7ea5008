//! HTTP surface of the booking flow

pub mod routes;
mod session_cookie;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::flow::FlowController;
use crate::session::{MemorySessionStore, SessionStore};

pub use routes::flow_routes;
pub use session_cookie::{SessionContext, read_session_cookie};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub flow: Arc<FlowController>,
    pub cookie_name: Arc<str>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(MemorySessionStore::default()),
            flow: Arc::new(FlowController::default()),
            cookie_name: Arc::from(crate::config::SessionConfig::default().cookie_name),
        }
    }

    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = store;
        self
    }

    pub fn with_flow(mut self, flow: FlowController) -> Self {
        self.flow = Arc::new(flow);
        self
    }

    pub fn with_cookie_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Number of live sessions
    pub async fn get_stats(&self) -> usize {
        self.sessions.session_count().await
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Router serving every flow step, with request tracing
pub fn build_router(state: AppState) -> Router {
    flow_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
