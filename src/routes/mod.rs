use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

pub mod admin;
pub mod bookings;
pub mod doc;
pub mod health;
pub mod params;
pub mod showtimes;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/showtimes", showtimes::router())
        .nest("/bookings", bookings::router())
        .nest("/admin", admin::router())
        .route("/seat-map", get(showtimes::seat_map))
        // Path kept for clients that poll availability from the payment page.
        .route(
            "/payments/showtime/{id}/booked-seats",
            get(showtimes::booked_seats),
        )
}

/// Health, API and docs routes bound to `state`, without the tower layers.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
