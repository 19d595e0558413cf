//! Persistence seams used by the booking coordinator.
//!
//! Both traits have a Postgres implementation for the server and an
//! in-memory one for tests and local runs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Booking, BookingStatus, Showtime},
};

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryBookingStore, InMemoryCatalog};
pub use postgres::{PgBookingStore, PgCatalog};

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub user_id: Option<Uuid>,
    pub showtime_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        self.user_id.is_none_or(|id| booking.user_id == Some(id))
            && self.showtime_id.is_none_or(|id| booking.showtime_id == id)
            && self.status.is_none_or(|status| booking.status == status)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub limit: u64,
    pub offset: u64,
    pub newest_first: bool,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
            newest_first: true,
        }
    }
}

/// Read access to the showtime catalog, which this service never writes.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    async fn showtime(&self, id: Uuid) -> AppResult<Option<Showtime>>;

    async fn showtimes(&self, ids: &[Uuid]) -> AppResult<Vec<Showtime>>;

    /// All showtimes ordered by start time.
    async fn list_showtimes(&self) -> AppResult<Vec<Showtime>>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Persists a booking together with its seat claims, all or nothing.
    /// A seat already claimed for the same showtime yields
    /// [`AppError::SeatConflict`](crate::error::AppError::SeatConflict).
    async fn insert(&self, booking: &Booking) -> AppResult<()>;

    async fn get(&self, id: Uuid) -> AppResult<Option<Booking>>;

    /// Matching bookings for the requested page plus the total match count.
    async fn list(&self, filter: &BookingFilter, page: PageRequest) -> AppResult<(Vec<Booking>, u64)>;

    /// Seats held by confirmed bookings of a showtime.
    async fn sold_seats(&self, showtime_id: Uuid) -> AppResult<Vec<String>>;
}
