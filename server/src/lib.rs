//! Detour Server Library
//!
//! This module exports the server components for use in integration tests
//! and external tooling.

pub mod config;
pub mod flow;
pub mod protocol;
pub mod server;
pub mod session;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use flow::FlowController;
pub use server::{AppState, build_router, flow_routes};
pub use session::{MemorySessionStore, SessionRecord, SessionStore};
