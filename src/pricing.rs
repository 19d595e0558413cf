use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::seat_map::{SeatCategory, SeatId, SeatMap};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("Seat {0} does not exist")]
    InvalidSeat(String),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuoteLine {
    pub seat: String,
    pub category: SeatCategory,
    #[schema(value_type = String, example = "1500.00")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Quote {
    pub lines: Vec<QuoteLine>,
    #[schema(value_type = String, example = "2500.00")]
    pub total: Decimal,
}

/// Seat prices derived from the seat map's category multipliers. Pure: never
/// touches seat occupancy.
#[derive(Debug, Clone)]
pub struct PricingCalculator {
    seat_map: Arc<SeatMap>,
}

impl PricingCalculator {
    pub fn new(seat_map: Arc<SeatMap>) -> Self {
        Self { seat_map }
    }

    pub fn seat_map(&self) -> &SeatMap {
        &self.seat_map
    }

    pub fn price_of(&self, seat: &SeatId, base_price: Decimal) -> Result<Decimal, PricingError> {
        let row = self
            .seat_map
            .locate(seat)
            .ok_or_else(|| PricingError::InvalidSeat(seat.to_string()))?;
        Ok(round_money(base_price * row.multiplier))
    }

    /// Sum of [`price_of`](Self::price_of); one unknown seat fails the whole set.
    pub fn total_price<'a, I>(&self, seats: I, base_price: Decimal) -> Result<Decimal, PricingError>
    where
        I: IntoIterator<Item = &'a SeatId>,
    {
        seats
            .into_iter()
            .try_fold(Decimal::ZERO, |acc, seat| Ok(acc + self.price_of(seat, base_price)?))
    }

    pub fn quote<'a, I>(&self, seats: I, base_price: Decimal) -> Result<Quote, PricingError>
    where
        I: IntoIterator<Item = &'a SeatId>,
    {
        let mut lines = Vec::new();
        let mut total = Decimal::ZERO;
        for seat in seats {
            let price = self.price_of(seat, base_price)?;
            let category = self
                .seat_map
                .locate(seat)
                .map(|r| r.category)
                .ok_or_else(|| PricingError::InvalidSeat(seat.to_string()))?;
            total += price;
            lines.push(QuoteLine {
                seat: seat.to_string(),
                category,
                price,
            });
        }
        Ok(Quote { lines, total })
    }
}

/// Currency minor-unit precision: two decimal places, halves away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
