//! Booking flow state machine
//!
//! This module provides:
//! - `FlowController`, which applies each step of the flow to a `SessionRecord`
//! - the fixed catalog tables (destinations, fee ranges, failure reasons)
//! - seat grid generation with its correction pass
//! - `Step` and the navigation guards between steps

pub mod catalog;
mod controller;
pub mod seats;
mod types;

pub use controller::{FlowController, VerifyOutcome, autocorrect, otp_accepted};
pub use types::{FlowError, Step};
