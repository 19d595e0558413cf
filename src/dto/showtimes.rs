use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    ledger::SeatSnapshot,
    models::ShowtimeAvailability,
    seat_map::{SeatCategory, SeatRow},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct BookedSeats {
    pub showtime_id: Uuid,
    pub sold_seats: Vec<String>,
    pub available: u32,
    pub capacity: u32,
}

impl From<SeatSnapshot> for BookedSeats {
    fn from(snapshot: SeatSnapshot) -> Self {
        Self {
            showtime_id: snapshot.showtime_id,
            available: snapshot.available(),
            capacity: snapshot.capacity,
            sold_seats: snapshot.sold.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShowtimeList {
    pub items: Vec<ShowtimeAvailability>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeatRowView {
    pub row: String,
    pub seats: Vec<u16>,
    pub category: SeatCategory,
    #[schema(value_type = String, example = "1.5")]
    pub multiplier: Decimal,
}

impl From<&SeatRow> for SeatRowView {
    fn from(row: &SeatRow) -> Self {
        Self {
            row: row.row.to_string(),
            seats: row.seats.clone().collect(),
            category: row.category,
            multiplier: row.multiplier,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeatMapView {
    pub rows: Vec<SeatRowView>,
    pub total_seats: u32,
}
