pub mod audit_logs;
pub mod booking_seats;
pub mod bookings;
pub mod movies;
pub mod showtimes;

pub use audit_logs::Entity as AuditLogs;
pub use booking_seats::Entity as BookingSeats;
pub use bookings::Entity as Bookings;
pub use movies::Entity as Movies;
pub use showtimes::Entity as Showtimes;
