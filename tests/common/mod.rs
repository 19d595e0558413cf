#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use cinema_booking_api::{
    config::AppConfig,
    coordinator::{BookingCoordinator, CreateBooking},
    error::{AppError, AppResult},
    ledger::ShowtimeLedger,
    models::{Booking, BuyerInfo, PaymentSummary, Showtime},
    seat_map::SeatMap,
    state::AppState,
    store::{BookingFilter, BookingStore, CatalogReader, InMemoryBookingStore, InMemoryCatalog, PageRequest},
};
use rust_decimal::Decimal;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-secret";

pub fn showtime(capacity: u32, base_price: i64) -> Showtime {
    Showtime {
        id: Uuid::new_v4(),
        movie_id: Uuid::new_v4(),
        movie_title: "Fearless Concurrency".into(),
        start_time: Utc::now() + chrono::Duration::days(1),
        base_price: Decimal::new(base_price, 0),
        total_seats: capacity,
    }
}

pub fn request(showtime_id: Uuid, seats: &[&str]) -> CreateBooking {
    CreateBooking {
        showtime_id,
        seats: seats.iter().map(|s| s.to_string()).collect(),
        buyer: BuyerInfo {
            user_id: None,
            email: "guest@example.com".into(),
            phone: "+1 555 0100".into(),
        },
        payment: PaymentSummary {
            card_last_four: "4242".into(),
            card_name: "Guest Buyer".into(),
        },
    }
}

pub struct Harness {
    pub coordinator: BookingCoordinator,
    pub catalog: Arc<InMemoryCatalog>,
    pub store: Arc<InMemoryBookingStore>,
}

pub async fn harness(showtimes: &[Showtime]) -> Harness {
    harness_with_timeout(showtimes, Duration::from_secs(5)).await
}

pub async fn harness_with_timeout(showtimes: &[Showtime], lock_timeout: Duration) -> Harness {
    let catalog = Arc::new(InMemoryCatalog::new());
    for showtime in showtimes {
        catalog.upsert(showtime.clone()).await;
    }
    let store = Arc::new(InMemoryBookingStore::new());
    let coordinator = BookingCoordinator::new(
        Arc::new(ShowtimeLedger::new(lock_timeout)),
        Arc::new(SeatMap::standard()),
        catalog.clone(),
        store.clone(),
    );
    Harness {
        coordinator,
        catalog,
        store,
    }
}

pub async fn coordinator_with_store(
    showtime: &Showtime,
    store: Arc<dyn BookingStore>,
    lock_timeout: Duration,
) -> BookingCoordinator {
    let catalog = Arc::new(InMemoryCatalog::new());
    catalog.upsert(showtime.clone()).await;
    let catalog: Arc<dyn CatalogReader> = catalog;
    BookingCoordinator::new(
        Arc::new(ShowtimeLedger::new(lock_timeout)),
        Arc::new(SeatMap::standard()),
        catalog,
        store,
    )
}

pub fn app_state(coordinator: BookingCoordinator) -> AppState {
    AppState {
        config: AppConfig {
            database_url: String::new(),
            host: "127.0.0.1".into(),
            port: 0,
            jwt_secret: JWT_SECRET.into(),
            booking_lock_timeout: Duration::from_secs(5),
            max_concurrent_requests: 100,
        },
        bookings: coordinator,
    }
}

/// Store whose writes always fail, as if the database went away.
#[derive(Default)]
pub struct FailingStore;

#[async_trait]
impl BookingStore for FailingStore {
    async fn insert(&self, _booking: &Booking) -> AppResult<()> {
        Err(AppError::Internal(anyhow::anyhow!("connection reset")))
    }

    async fn get(&self, _id: Uuid) -> AppResult<Option<Booking>> {
        Ok(None)
    }

    async fn list(&self, _filter: &BookingFilter, _page: PageRequest) -> AppResult<(Vec<Booking>, u64)> {
        Ok((Vec::new(), 0))
    }

    async fn sold_seats(&self, _showtime_id: Uuid) -> AppResult<Vec<String>> {
        Ok(Vec::new())
    }
}
