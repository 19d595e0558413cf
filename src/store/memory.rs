use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Booking, BookingStatus, Showtime},
    store::{BookingFilter, BookingStore, CatalogReader, PageRequest},
};

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    showtimes: RwLock<HashMap<Uuid, Showtime>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn upsert(&self, showtime: Showtime) {
        self.showtimes.write().await.insert(showtime.id, showtime);
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn showtime(&self, id: Uuid) -> AppResult<Option<Showtime>> {
        Ok(self.showtimes.read().await.get(&id).cloned())
    }

    async fn showtimes(&self, ids: &[Uuid]) -> AppResult<Vec<Showtime>> {
        let showtimes = self.showtimes.read().await;
        Ok(ids.iter().filter_map(|id| showtimes.get(id).cloned()).collect())
    }

    async fn list_showtimes(&self) -> AppResult<Vec<Showtime>> {
        let mut items: Vec<Showtime> = self.showtimes.read().await.values().cloned().collect();
        items.sort_by_key(|s| s.start_time);
        Ok(items)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    bookings: RwLock<Vec<Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bookings.read().await.is_empty()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn insert(&self, booking: &Booking) -> AppResult<()> {
        let mut bookings = self.bookings.write().await;

        let taken: Vec<String> = bookings
            .iter()
            .filter(|b| b.showtime_id == booking.showtime_id && b.status == BookingStatus::Confirmed)
            .flat_map(|b| b.seats.iter())
            .filter(|seat| booking.seats.contains(seat))
            .cloned()
            .collect();
        if !taken.is_empty() {
            return Err(AppError::SeatConflict(taken));
        }

        bookings.push(booking.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Booking>> {
        Ok(self.bookings.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn list(&self, filter: &BookingFilter, page: PageRequest) -> AppResult<(Vec<Booking>, u64)> {
        let mut matched: Vec<Booking> = self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();

        matched.sort_by_key(|b| b.created_at);
        if page.newest_first {
            matched.reverse();
        }

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn sold_seats(&self, showtime_id: Uuid) -> AppResult<Vec<String>> {
        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| b.showtime_id == showtime_id && b.status == BookingStatus::Confirmed)
            .flat_map(|b| b.seats.iter().cloned())
            .collect())
    }
}
