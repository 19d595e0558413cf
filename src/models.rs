use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(anyhow::anyhow!("unknown booking status {other:?}")),
        }
    }
}

/// What the booking keeps of the already-authorized payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentSummary {
    pub card_last_four: String,
    pub card_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyerInfo {
    /// `None` marks a guest purchase.
    pub user_id: Option<Uuid>,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub showtime_id: Uuid,
    pub movie_id: Uuid,
    pub user_id: Option<Uuid>,
    pub is_guest: bool,
    pub email: String,
    pub phone: String,
    pub seats: Vec<String>,
    #[schema(value_type = String, example = "2500.00")]
    pub total_amount: Decimal,
    pub payment: PaymentSummary,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Catalog facts about a showtime that booking depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Showtime {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub movie_title: String,
    pub start_time: DateTime<Utc>,
    #[schema(value_type = String, example = "1000.00")]
    pub base_price: Decimal,
    pub total_seats: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShowtimeAvailability {
    #[serde(flatten)]
    pub showtime: Showtime,
    pub available_seats: u32,
}

/// Booking joined with the showtime it belongs to, for history and receipts.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub movie_title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
}
