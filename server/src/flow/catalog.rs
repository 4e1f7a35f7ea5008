//! Fixed tables the flow draws from

use std::ops::RangeInclusive;

use crate::protocol::SeatStatus;

/// Origin used when the search form omits one
pub const DEFAULT_ORIGIN: &str = "Delhi";

/// Destination suggested for origins missing from [`DESTINATIONS`]
pub const UNKNOWN_DESTINATION: &str = "Unknown";

/// Origin to autocorrect candidates, in suggestion order
pub const DESTINATIONS: &[(&str, [&str; 3])] = &[
    (
        "Delhi",
        ["Lulla Nagar, Maharashtra", "Bhosari, Pune", "Mumbai"],
    ),
    (
        "Mumbai",
        ["Dharavi Slum Tour", "Bandra Underwater", "Delhi"],
    ),
];

pub fn destinations_for(origin: &str) -> Option<&'static [&'static str; 3]> {
    DESTINATIONS
        .iter()
        .find(|(name, _)| *name == origin)
        .map(|(_, candidates)| candidates)
}

pub const SEAT_ROWS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];
pub const SEATS_PER_ROW: u32 = 14;

/// Seat that is always haunted
pub const HAUNTED_SEAT: &str = "F-13";

/// Relative draw weights for a seat's status
pub const SEAT_STATUS_WEIGHTS: [(SeatStatus, f64); 6] = [
    (SeatStatus::Available, 0.1),
    (SeatStatus::Taken, 0.3),
    (SeatStatus::MlaQuota, 0.1),
    (SeatStatus::BadVastu, 0.1),
    (SeatStatus::Cursed, 0.1),
    (SeatStatus::Vacation, 0.1),
];

/// Inclusive fee ranges
pub const BASE_FARE: RangeInclusive<u32> = 1000..=1500;
pub const CHAIR_USAGE: RangeInclusive<u32> = 100..=200;
pub const DIGITAL_INK: RangeInclusive<u32> = 50..=100;
pub const CONVENIENCE_FEE: RangeInclusive<u32> = 70..=100;
pub const CONVENIENCE_FEE_FEE: RangeInclusive<u32> = 20..=50;
pub const EMOTIONAL_DAMAGE: RangeInclusive<u32> = 150..=250;

pub const OTP_FAILURE_REASONS: [&str; 4] = [
    "OTP expired before it arrived",
    "Pigeon got lost carrying your OTP",
    "Stranger forgot to whisper the numbers",
    "Server was on chai break",
];

/// Shown on the error page when no failure was recorded
pub const FALLBACK_ERROR_MESSAGE: &str = "Unknown error";

pub const SESSION_TIMEOUT_MESSAGE: &str =
    "Your session timed out while you were deciding. Start again from the homepage.";
