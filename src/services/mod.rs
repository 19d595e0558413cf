pub mod booking_service;
pub mod showtime_service;
