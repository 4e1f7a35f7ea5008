//! The booking flow controller
//!
//! Every operation takes the caller's `SessionRecord`, mutates it as the step
//! requires and returns the view for that step. Randomness is supplied by the
//! caller so that tests can run the flow from a seeded generator.

use metrics::counter;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use super::catalog::{
    self, DEFAULT_ORIGIN, FALLBACK_ERROR_MESSAGE, OTP_FAILURE_REASONS, SESSION_TIMEOUT_MESSAGE,
    UNKNOWN_DESTINATION,
};
use super::seats;
use super::types::{FlowError, Step};
use crate::config::{FlowConfig, NavigationPolicy};
use crate::protocol::{
    CartView, ConfirmationView, ErrorSeverity, FeeBreakdown, HomeView, PaymentErrorView,
    PaymentView, SearchView, SeatSelectionView, SessionTimeoutView,
};
use crate::session::SessionRecord;

/// Result of a verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The attempt failed with a cosmetic reason
    Rejected { reason: &'static str },
    /// Payment went through
    Accepted,
}

impl VerifyOutcome {
    pub fn next_step(&self) -> Step {
        match self {
            VerifyOutcome::Rejected { .. } => Step::PaymentError,
            VerifyOutcome::Accepted => Step::Confirmation,
        }
    }
}

/// Autocorrected destination for an origin: candidate `attempts mod 3`
pub fn autocorrect(origin: &str, attempts: u32) -> &'static str {
    match catalog::destinations_for(origin) {
        Some(candidates) => candidates[attempts as usize % candidates.len()],
        None => UNKNOWN_DESTINATION,
    }
}

/// Whether the given attempt number passes verification. The submitted code
/// plays no part.
pub fn otp_accepted(otp_attempts: u32, success_attempt: u32) -> bool {
    otp_attempts >= success_attempt
}

/// Severity tier for the error page, escalating with each failed attempt.
/// With no attempt made the index wraps to the last tier.
pub fn severity_for(otp_attempts: u32) -> ErrorSeverity {
    let last = ErrorSeverity::TIERS.len() - 1;
    let index = match otp_attempts.checked_sub(1) {
        Some(index) => (index as usize).min(last),
        None => last,
    };
    ErrorSeverity::TIERS[index]
}

pub fn generate_fees<R: Rng + ?Sized>(rng: &mut R) -> FeeBreakdown {
    FeeBreakdown {
        base_fare: rng.random_range(catalog::BASE_FARE),
        chair_usage: rng.random_range(catalog::CHAIR_USAGE),
        digital_ink: rng.random_range(catalog::DIGITAL_INK),
        convenience_fee: rng.random_range(catalog::CONVENIENCE_FEE),
        convenience_fee_fee: rng.random_range(catalog::CONVENIENCE_FEE_FEE),
        emotional_damage: rng.random_range(catalog::EMOTIONAL_DAMAGE),
    }
}

/// Booking token: `#`, four digits, one uppercase letter
pub fn generate_booking_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    let number: u32 = rng.random_range(1000..=9999);
    let letter = char::from(rng.random_range(b'A'..=b'Z'));
    format!("#{}{}", number, letter)
}

/// Applies flow steps to session records
#[derive(Debug, Clone)]
pub struct FlowController {
    config: FlowConfig,
}

impl FlowController {
    pub fn new(config: FlowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Check that `record` may enter `step`.
    ///
    /// Confirmation always requires a completed payment. The remaining
    /// preconditions only apply under [`NavigationPolicy::Strict`].
    pub fn check_precondition(&self, step: Step, record: &SessionRecord) -> Result<(), FlowError> {
        let redirect_to = match step {
            Step::Confirmation if !record.payment_completed => Some(Step::Home),
            _ if self.config.navigation == NavigationPolicy::Permissive => None,
            Step::Cart | Step::Payment | Step::VerifyOtp if record.selected_seat.is_none() => {
                Some(Step::SeatSelection)
            }
            Step::PaymentError if record.otp_attempts == 0 => Some(Step::Payment),
            _ => None,
        };

        match redirect_to {
            Some(redirect_to) => {
                debug!("Step {:?} not reached, redirecting to {:?}", step, redirect_to);
                Err(FlowError::StepNotReached { step, redirect_to })
            }
            None => Ok(()),
        }
    }

    /// Homepage: reset the record and count the visit
    pub fn enter(&self, record: &mut SessionRecord) -> HomeView {
        *record = SessionRecord::default();
        record.attempts += 1;
        HomeView {
            attempts: record.attempts,
        }
    }

    /// Search: suggest a destination after the configured delay
    pub async fn search(&self, record: &SessionRecord, origin: Option<&str>) -> SearchView {
        let origin = origin.unwrap_or(DEFAULT_ORIGIN);
        let autocorrect_target = autocorrect(origin, record.attempts);

        if !self.config.search_delay.is_zero() {
            tokio::time::sleep(self.config.search_delay).await;
        }

        debug!(
            "Search from {} autocorrected to {} (attempts={})",
            origin, autocorrect_target, record.attempts
        );
        SearchView {
            origin: origin.to_string(),
            autocorrect_target: autocorrect_target.to_string(),
        }
    }

    /// Seat selection: a fresh grid on every call
    pub fn list_seats<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SeatSelectionView, FlowError> {
        Ok(SeatSelectionView {
            seats: seats::generate(rng)?,
        })
    }

    /// Add a seat to the cart, starting a new payment cycle
    pub fn add_to_cart<R: Rng + ?Sized>(
        &self,
        record: &mut SessionRecord,
        seat_id: String,
        rng: &mut R,
    ) -> Step {
        let fees = generate_fees(rng);
        debug!("Seat {} added to cart, total {}", seat_id, fees.total());

        record.selected_seat = Some(seat_id);
        record.fees = Some(fees);
        record.otp_attempts = 0;
        record.payment_completed = false;
        record.booking_token = None;
        record.error_message = None;
        Step::Cart
    }

    pub fn view_cart(&self, record: &SessionRecord) -> Result<CartView, FlowError> {
        self.check_precondition(Step::Cart, record)?;
        Ok(CartView {
            seat: record.selected_seat.clone(),
            fees: record.fees,
            total: record.fees.map(|f| f.total()).unwrap_or(0),
        })
    }

    /// Enter payment, discarding any earlier completion
    pub fn enter_payment(&self, record: &mut SessionRecord) -> Result<PaymentView, FlowError> {
        self.check_precondition(Step::Payment, record)?;
        record.payment_completed = false;
        record.booking_token = None;
        Ok(PaymentView {
            seat: record.selected_seat.clone(),
            otp_attempts: record.otp_attempts,
        })
    }

    /// Count a verification attempt. Attempts before the configured success
    /// attempt fail no matter what code was submitted.
    pub fn verify_otp<R: Rng + ?Sized>(
        &self,
        record: &mut SessionRecord,
        code: &str,
        rng: &mut R,
    ) -> Result<VerifyOutcome, FlowError> {
        self.check_precondition(Step::VerifyOtp, record)?;
        record.otp_attempts += 1;
        debug!(
            "Verification attempt {} ({} chars submitted)",
            record.otp_attempts,
            code.len()
        );

        if otp_accepted(record.otp_attempts, self.config.otp_success_attempt) {
            record.payment_completed = true;
            counter!("detour_otp_verifications_total", "outcome" => "accepted").increment(1);
            info!("Payment completed after {} attempts", record.otp_attempts);
            return Ok(VerifyOutcome::Accepted);
        }

        let reason = OTP_FAILURE_REASONS
            .choose(rng)
            .copied()
            .unwrap_or(FALLBACK_ERROR_MESSAGE);
        record.error_message = Some(reason.to_string());
        counter!("detour_otp_verifications_total", "outcome" => "rejected").increment(1);
        Ok(VerifyOutcome::Rejected { reason })
    }

    pub fn show_payment_error(&self, record: &SessionRecord) -> Result<PaymentErrorView, FlowError> {
        self.check_precondition(Step::PaymentError, record)?;
        let severity = severity_for(record.otp_attempts);
        Ok(PaymentErrorView {
            error_message: record
                .error_message
                .clone()
                .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string()),
            severity,
            asset_url: severity.asset_url().to_string(),
            otp_attempts: record.otp_attempts,
        })
    }

    /// Issue a booking token, only once payment has completed
    pub fn confirm<R: Rng + ?Sized>(
        &self,
        record: &mut SessionRecord,
        rng: &mut R,
    ) -> Result<ConfirmationView, FlowError> {
        self.check_precondition(Step::Confirmation, record)?;

        let token = generate_booking_token(rng);
        info!("Issued booking token {}", token);
        record.booking_token = Some(token.clone());
        Ok(ConfirmationView {
            token,
            seat: record.selected_seat.clone(),
        })
    }

    pub fn session_timeout(&self) -> SessionTimeoutView {
        SessionTimeoutView {
            message: SESSION_TIMEOUT_MESSAGE.to_string(),
        }
    }
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new(FlowConfig::default())
    }
}
