use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        bookings::{BookingList, CreateBookingRequest, PaymentConfirmation},
        showtimes::{BookedSeats, SeatMapView, SeatRowView, ShowtimeList},
    },
    models::{Booking, BookingDetails, BookingStatus, PaymentSummary, Showtime, ShowtimeAvailability},
    pricing::{Quote, QuoteLine},
    response::{ApiResponse, Meta},
    routes::{admin, bookings, health, params, showtimes},
    seat_map::SeatCategory,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        showtimes::list_showtimes,
        showtimes::get_showtime,
        showtimes::booked_seats,
        showtimes::quote,
        showtimes::seat_map,
        bookings::create_booking,
        bookings::my_bookings,
        bookings::get_booking,
        admin::list_all_bookings
    ),
    components(
        schemas(
            Booking,
            BookingDetails,
            BookingStatus,
            PaymentSummary,
            Showtime,
            ShowtimeAvailability,
            SeatCategory,
            Quote,
            QuoteLine,
            CreateBookingRequest,
            PaymentConfirmation,
            BookingList,
            BookedSeats,
            ShowtimeList,
            SeatRowView,
            SeatMapView,
            params::Pagination,
            params::SortOrder,
            params::BookingListQuery,
            params::QuoteQuery,
            Meta,
            ApiResponse<Booking>,
            ApiResponse<BookingDetails>,
            ApiResponse<BookingList>,
            ApiResponse<BookedSeats>,
            ApiResponse<ShowtimeList>,
            ApiResponse<Quote>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Showtimes", description = "Showtimes, seat availability and pricing"),
        (name = "Bookings", description = "Seat purchase and booking receipts"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
