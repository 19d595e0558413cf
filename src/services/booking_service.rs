use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    coordinator::CreateBooking,
    dto::bookings::{BookingList, CreateBookingRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Booking, BookingDetails, BuyerInfo},
    response::{ApiResponse, Meta},
    routes::params::BookingListQuery,
    state::AppState,
    store::BookingFilter,
};

pub async fn create_booking(
    state: &AppState,
    identity: Option<&AuthUser>,
    payload: CreateBookingRequest,
) -> AppResult<ApiResponse<Booking>> {
    let payment = payload.payment.summary()?;
    let request = CreateBooking {
        showtime_id: payload.showtime_id,
        seats: payload.seats,
        buyer: BuyerInfo {
            user_id: identity.map(|user| user.user_id),
            email: payload.email.trim().to_string(),
            phone: payload.phone.trim().to_string(),
        },
        payment,
    };

    let booking = state.bookings.create_booking(request).await?;

    Ok(ApiResponse::success(
        "Payment successful and booking confirmed",
        booking,
        Some(Meta::empty()),
    ))
}

pub async fn get_booking(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<BookingDetails>> {
    let booking = state
        .bookings
        .bookings()
        .get(id)
        .await?
        .ok_or(AppError::NotFound)?;

    // Someone else's booking looks exactly like a missing one.
    if !user.is_admin() && booking.user_id != Some(user.user_id) {
        return Err(AppError::NotFound);
    }

    let details = with_showtimes(state, vec![booking])
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("OK", details, Some(Meta::empty())))
}

pub async fn list_my_bookings(
    state: &AppState,
    user: &AuthUser,
    query: BookingListQuery,
) -> AppResult<ApiResponse<BookingList>> {
    let filter = BookingFilter {
        user_id: Some(user.user_id),
        status: query.status,
        ..Default::default()
    };
    list_bookings(state, filter, query).await
}

pub async fn list_all_bookings(
    state: &AppState,
    user: &AuthUser,
    query: BookingListQuery,
) -> AppResult<ApiResponse<BookingList>> {
    ensure_admin(user)?;
    let filter = BookingFilter {
        status: query.status,
        ..Default::default()
    };
    list_bookings(state, filter, query).await
}

async fn list_bookings(
    state: &AppState,
    filter: BookingFilter,
    query: BookingListQuery,
) -> AppResult<ApiResponse<BookingList>> {
    let (page, per_page, request) = query.page_request();
    let (bookings, total) = state.bookings.bookings().list(&filter, request).await?;
    let items = with_showtimes(state, bookings).await?;

    let meta = Meta::new(page, per_page, total as i64);
    Ok(ApiResponse::success("Bookings", BookingList { items }, Some(meta)))
}

/// Joins each booking with its showtime's movie title and start time.
async fn with_showtimes(state: &AppState, bookings: Vec<Booking>) -> AppResult<Vec<BookingDetails>> {
    let mut ids: Vec<Uuid> = bookings.iter().map(|b| b.showtime_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let showtimes: HashMap<Uuid, _> = state
        .bookings
        .catalog()
        .showtimes(&ids)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    Ok(bookings
        .into_iter()
        .map(|booking| {
            let showtime = showtimes.get(&booking.showtime_id);
            BookingDetails {
                movie_title: showtime.map(|s| s.movie_title.clone()),
                start_time: showtime.map(|s| s.start_time),
                booking,
            }
        })
        .collect())
}
