//! Flow steps and error definitions

use thiserror::Error;

use crate::session::SessionError;

/// Errors that can occur while moving through the flow
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid form body: {0}")]
    InvalidForm(String),

    #[error("Step {step:?} not reached yet, continue at {redirect_to:?}")]
    StepNotReached { step: Step, redirect_to: Step },

    #[error("Session expired")]
    SessionExpired,

    #[error("Seat draw failed: {0}")]
    SeatDraw(String),

    #[error("Session store error: {0}")]
    Store(SessionError),
}

impl From<SessionError> for FlowError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Expired(_) => FlowError::SessionExpired,
            other => FlowError::Store(other),
        }
    }
}

/// A step of the booking flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Home,
    Search,
    SeatSelection,
    AddToCart,
    Cart,
    Payment,
    VerifyOtp,
    PaymentError,
    Confirmation,
    SessionTimeout,
}

impl Step {
    /// Route path serving this step
    pub fn path(self) -> &'static str {
        match self {
            Step::Home => "/",
            Step::Search => "/search",
            Step::SeatSelection => "/seat_selection",
            Step::AddToCart => "/add_to_cart",
            Step::Cart => "/cart",
            Step::Payment => "/payment",
            Step::VerifyOtp => "/verify_otp",
            Step::PaymentError => "/payment_error",
            Step::Confirmation => "/confirmation",
            Step::SessionTimeout => "/session_timeout",
        }
    }

    /// Label used for metrics
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Home => "home",
            Step::Search => "search",
            Step::SeatSelection => "seat_selection",
            Step::AddToCart => "add_to_cart",
            Step::Cart => "cart",
            Step::Payment => "payment",
            Step::VerifyOtp => "verify_otp",
            Step::PaymentError => "payment_error",
            Step::Confirmation => "confirmation",
            Step::SessionTimeout => "session_timeout",
        }
    }
}
