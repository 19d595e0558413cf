use uuid::Uuid;

use crate::{
    dto::showtimes::{BookedSeats, SeatMapView, SeatRowView, ShowtimeList},
    error::{AppError, AppResult},
    models::ShowtimeAvailability,
    pricing::Quote,
    response::{ApiResponse, Meta},
    routes::params::QuoteQuery,
    state::AppState,
};

pub async fn list_showtimes(state: &AppState) -> AppResult<ApiResponse<ShowtimeList>> {
    let showtimes = state.bookings.catalog().list_showtimes().await?;

    let mut items = Vec::with_capacity(showtimes.len());
    for showtime in showtimes {
        let snapshot = state.bookings.booked_seats(showtime.id).await?;
        items.push(ShowtimeAvailability {
            available_seats: snapshot.available(),
            showtime,
        });
    }

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Showtimes",
        ShowtimeList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn get_showtime(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ShowtimeAvailability>> {
    let showtime = state
        .bookings
        .catalog()
        .showtime(id)
        .await?
        .ok_or(AppError::NotFound)?;
    let snapshot = state.bookings.booked_seats(id).await?;

    Ok(ApiResponse::success(
        "Showtime",
        ShowtimeAvailability {
            available_seats: snapshot.available(),
            showtime,
        },
        Some(Meta::empty()),
    ))
}

pub async fn booked_seats(state: &AppState, id: Uuid) -> AppResult<ApiResponse<BookedSeats>> {
    let snapshot = state.bookings.booked_seats(id).await?;
    Ok(ApiResponse::success(
        "Booked seats",
        BookedSeats::from(snapshot),
        Some(Meta::empty()),
    ))
}

pub async fn quote(state: &AppState, id: Uuid, query: QuoteQuery) -> AppResult<ApiResponse<Quote>> {
    let quote = state.bookings.quote(id, &query.seat_list()).await?;
    Ok(ApiResponse::success("Quote", quote, Some(Meta::empty())))
}

pub fn seat_map(state: &AppState) -> ApiResponse<SeatMapView> {
    let map = state.bookings.seat_map();
    let view = SeatMapView {
        rows: map.rows().iter().map(SeatRowView::from).collect(),
        total_seats: map.seat_count(),
    };
    ApiResponse::success("Seat map", view, Some(Meta::empty()))
}
