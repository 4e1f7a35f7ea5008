use crate::protocol::FeeBreakdown;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Session ID: 32-character lowercase hex string (UUID v4, simple form)
pub type SessionId = String;

const SESSION_ID_LENGTH: usize = 32;

/// Generate a random session ID
pub fn generate_session_id() -> SessionId {
    Uuid::new_v4().simple().to_string()
}

/// Validation rules
pub fn validate_session_id(id: &str) -> bool {
    id.len() == SESSION_ID_LENGTH
        && id
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

/// Get current timestamp in milliseconds
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Per-client booking state.
///
/// A default record is what a client gets on first contact. Only the flow
/// controller mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Homepage visits; seeds the destination autocorrect
    pub attempts: u32,
    /// Seat added to the cart, if any
    pub selected_seat: Option<String>,
    /// Fees generated for the current cart
    pub fees: Option<FeeBreakdown>,
    /// Verification attempts in the current cart cycle
    pub otp_attempts: u32,
    pub payment_completed: bool,
    pub booking_token: Option<String>,
    /// Most recent simulated failure reason
    pub error_message: Option<String>,
}
