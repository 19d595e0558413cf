use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{BookingDetails, PaymentSummary},
};

/// Payment already authorized by the payment collaborator. Only a summary of
/// it is kept on the booking.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentConfirmation {
    /// Full card number or just its last four digits.
    pub card_number: String,
    pub card_name: String,
    /// Opaque authorization reference from the payment provider.
    pub reference: Option<String>,
}

impl PaymentConfirmation {
    pub fn summary(&self) -> AppResult<PaymentSummary> {
        let digits: Vec<char> = self
            .card_number
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        if digits.len() < 4 || !digits.iter().all(|c| c.is_ascii_digit()) {
            return Err(AppError::Validation("card number must contain at least four digits".into()));
        }

        Ok(PaymentSummary {
            card_last_four: digits[digits.len() - 4..].iter().collect(),
            card_name: self.card_name.trim().to_string(),
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub showtime_id: Uuid,
    #[schema(example = json!(["A-1", "P-1"]))]
    pub seats: Vec<String>,
    pub email: String,
    pub phone: String,
    pub payment: PaymentConfirmation,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingList {
    pub items: Vec<BookingDetails>,
}
