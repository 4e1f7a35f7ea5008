use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Seat availability status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    Available,
    Taken,
    MlaQuota,
    BadVastu,
    Cursed,
    Vacation,
    Haunted,
}

/// Seat id (`{row}-{num}`) to status, in grid order
pub type SeatMap = IndexMap<String, SeatStatus>;

/// Itemized cart fees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub base_fare: u32,
    pub chair_usage: u32,
    pub digital_ink: u32,
    pub convenience_fee: u32,
    /// Fee for the convenience fee
    pub convenience_fee_fee: u32,
    pub emotional_damage: u32,
}

impl FeeBreakdown {
    /// Named components in display order
    pub fn items(&self) -> [(&'static str, u32); 6] {
        [
            ("base_fare", self.base_fare),
            ("chair_usage", self.chair_usage),
            ("digital_ink", self.digital_ink),
            ("convenience_fee", self.convenience_fee),
            ("convenience_fee_fee", self.convenience_fee_fee),
            ("emotional_damage", self.emotional_damage),
        ]
    }

    pub fn total(&self) -> u32 {
        self.items().iter().map(|(_, amount)| amount).sum()
    }
}

/// How upset the payment error page looks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    Mild,
    Moderate,
    Extreme,
}

impl ErrorSeverity {
    /// Tiers in escalation order
    pub const TIERS: [ErrorSeverity; 3] = [Self::Mild, Self::Moderate, Self::Extreme];

    pub fn asset_url(self) -> &'static str {
        match self {
            Self::Mild => "https://media.giphy.com/media/l0HlG8vJXW0q5Q5iU/giphy.gif",
            Self::Moderate => "https://media.giphy.com/media/3o7TKsQ8UQ4l4LhGz6/giphy.gif",
            Self::Extreme => "https://media.giphy.com/media/3o7TKYnjG9bcRA5nD2/giphy.gif",
        }
    }
}

/// GET /
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeView {
    pub attempts: u32,
}

/// POST /search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchView {
    pub origin: String,
    pub autocorrect_target: String,
}

/// GET /seat_selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatSelectionView {
    pub seats: SeatMap,
}

/// GET /cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub seat: Option<String>,
    pub fees: Option<FeeBreakdown>,
    pub total: u32,
}

/// GET /payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentView {
    pub seat: Option<String>,
    pub otp_attempts: u32,
}

/// GET /payment_error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentErrorView {
    pub error_message: String,
    pub severity: ErrorSeverity,
    pub asset_url: String,
    pub otp_attempts: u32,
}

/// GET /confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationView {
    pub token: String,
    pub seat: Option<String>,
}

/// GET /session_timeout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTimeoutView {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_status_serializes_snake_case() {
        let json = serde_json::to_string(&SeatStatus::MlaQuota).unwrap();
        assert_eq!(json, "\"mla_quota\"");
        let json = serde_json::to_string(&SeatStatus::BadVastu).unwrap();
        assert_eq!(json, "\"bad_vastu\"");
    }

    #[test]
    fn test_fee_total_sums_all_items() {
        let fees = FeeBreakdown {
            base_fare: 1000,
            chair_usage: 100,
            digital_ink: 50,
            convenience_fee: 70,
            convenience_fee_fee: 20,
            emotional_damage: 150,
        };
        assert_eq!(fees.total(), 1390);
        assert_eq!(fees.items().len(), 6);
    }

    #[test]
    fn test_seat_map_keeps_insertion_order() {
        let mut seats = SeatMap::new();
        seats.insert("B-2".to_string(), SeatStatus::Taken);
        seats.insert("A-1".to_string(), SeatStatus::Available);

        let json = serde_json::to_string(&SeatSelectionView { seats }).unwrap();
        assert_eq!(json, r#"{"seats":{"B-2":"taken","A-1":"available"}}"#);
    }
}
