use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::showtimes::{BookedSeats, SeatMapView, ShowtimeList},
    error::AppResult,
    models::ShowtimeAvailability,
    pricing::Quote,
    response::ApiResponse,
    routes::params::QuoteQuery,
    services::showtime_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_showtimes))
        .route("/{id}", get(get_showtime))
        .route("/{id}/booked-seats", get(booked_seats))
        .route("/{id}/quote", get(quote))
}

#[utoipa::path(
    get,
    path = "/api/showtimes",
    responses(
        (status = 200, description = "Showtimes with remaining seats", body = ApiResponse<ShowtimeList>)
    ),
    tag = "Showtimes"
)]
pub async fn list_showtimes(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ShowtimeList>>> {
    Ok(Json(showtime_service::list_showtimes(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/showtimes/{id}",
    params(
        ("id" = Uuid, Path, description = "Showtime ID")
    ),
    responses(
        (status = 200, description = "Showtime", body = ApiResponse<ShowtimeAvailability>),
        (status = 404, description = "Showtime not found"),
    ),
    tag = "Showtimes"
)]
pub async fn get_showtime(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ShowtimeAvailability>>> {
    Ok(Json(showtime_service::get_showtime(&state, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/showtimes/{id}/booked-seats",
    params(
        ("id" = Uuid, Path, description = "Showtime ID")
    ),
    responses(
        (status = 200, description = "Seats already sold", body = ApiResponse<BookedSeats>),
        (status = 404, description = "Showtime not found"),
    ),
    tag = "Showtimes"
)]
pub async fn booked_seats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<BookedSeats>>> {
    Ok(Json(showtime_service::booked_seats(&state, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/showtimes/{id}/quote",
    params(
        ("id" = Uuid, Path, description = "Showtime ID"),
        QuoteQuery,
    ),
    responses(
        (status = 200, description = "Price quote", body = ApiResponse<Quote>),
        (status = 400, description = "Invalid seat"),
        (status = 404, description = "Showtime not found"),
    ),
    tag = "Showtimes"
)]
pub async fn quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<QuoteQuery>,
) -> AppResult<Json<ApiResponse<Quote>>> {
    Ok(Json(showtime_service::quote(&state, id, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/seat-map",
    responses(
        (status = 200, description = "Auditorium layout and price multipliers", body = ApiResponse<SeatMapView>)
    ),
    tag = "Showtimes"
)]
pub async fn seat_map(State(state): State<AppState>) -> Json<ApiResponse<SeatMapView>> {
    Json(showtime_service::seat_map(&state))
}
