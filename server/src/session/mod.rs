//! Per-client session records and the store that holds them

pub mod state;
pub mod store;

pub use state::{SessionId, SessionRecord, generate_session_id, validate_session_id};
pub use store::{MemorySessionStore, SessionError, SessionStore};
