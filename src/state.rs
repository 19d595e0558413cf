use crate::{config::AppConfig, coordinator::BookingCoordinator};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub bookings: BookingCoordinator,
}
