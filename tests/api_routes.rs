mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use cinema_booking_api::{middleware::auth::issue_token, routes::create_app};
use common::{JWT_SECRET, app_state, harness, showtime};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

async fn app_with_showtime() -> (Router, Uuid) {
    let show = showtime(100, 1000);
    let h = harness(&[show.clone()]).await;
    (create_app(app_state(h.coordinator)), show.id)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn booking_body(showtime_id: Uuid, seats: &[&str]) -> Body {
    Body::from(
        json!({
            "showtime_id": showtime_id,
            "seats": seats,
            "email": "guest@example.com",
            "phone": "+1 555 0100",
            "payment": {
                "card_number": "4242 4242 4242 4242",
                "card_name": "Guest Buyer"
            }
        })
        .to_string(),
    )
}

fn post_booking(showtime_id: Uuid, seats: &[&str], token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/bookings")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(booking_body(showtime_id, seats)).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn guest_booking_is_created_then_conflicts() {
    let (app, showtime_id) = app_with_showtime().await;

    let (status, body) = send(&app, post_booking(showtime_id, &["A-1", "P-1"], None)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Payment successful and booking confirmed");
    assert_eq!(body["data"]["is_guest"], true);
    assert_eq!(body["data"]["total_amount"], "2500.00");
    assert_eq!(body["data"]["payment"]["card_last_four"], "4242");
    assert_eq!(body["data"]["status"], "confirmed");

    let (status, body) = send(&app, post_booking(showtime_id, &["A-1", "A-2"], None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["data"]["kind"], "conflict");
    assert_eq!(body["data"]["seats"], json!(["A-1"]));

    let uri = format!("/api/showtimes/{showtime_id}/booked-seats");
    let (status, body) = send(&app, get(&uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["sold_seats"], json!(["A-1", "P-1"]));
    assert_eq!(body["data"]["available"], 98);
    assert_eq!(body["data"]["capacity"], 100);
}

#[tokio::test]
async fn payment_page_path_serves_the_same_seats() {
    let (app, showtime_id) = app_with_showtime().await;
    send(&app, post_booking(showtime_id, &["K-3"], None)).await;

    let uri = format!("/api/payments/showtime/{showtime_id}/booked-seats");
    let (status, body) = send(&app, get(&uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["sold_seats"], json!(["K-3"]));
}

#[tokio::test]
async fn error_kinds_map_to_statuses() {
    let (app, showtime_id) = app_with_showtime().await;

    let uri = format!("/api/showtimes/{}/booked-seats", Uuid::new_v4());
    let (status, body) = send(&app, get(&uri, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["kind"], "not_found");

    let (status, body) = send(&app, post_booking(showtime_id, &["Z-99"], None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["kind"], "invalid_seat");

    let (status, body) = send(&app, post_booking(showtime_id, &["A-1", "A-1"], None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["kind"], "validation_error");

    let (status, _) = send(&app, get("/nowhere", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn registered_buyer_sees_own_bookings() {
    let (app, showtime_id) = app_with_showtime().await;
    let user_id = Uuid::new_v4();
    let token = issue_token(JWT_SECRET, user_id, "user", chrono::Duration::hours(1)).unwrap();

    let (status, body) = send(&app, post_booking(showtime_id, &["D-1"], Some(&token))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["is_guest"], false);
    assert_eq!(body["data"]["user_id"], user_id.to_string());
    let booking_id = body["data"]["id"].as_str().unwrap().to_string();

    send(&app, post_booking(showtime_id, &["D-2"], None)).await;

    let (status, body) = send(&app, get("/api/bookings/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["seats"], json!(["D-1"]));
    assert_eq!(body["data"]["items"][0]["movie_title"], "Fearless Concurrency");

    let uri = format!("/api/bookings/{booking_id}");
    let (status, _) = send(&app, get(&uri, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let stranger = issue_token(JWT_SECRET, Uuid::new_v4(), "user", chrono::Duration::hours(1)).unwrap();
    let (status, _) = send(&app, get(&uri, Some(&stranger))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/api/bookings/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_token_books_as_guest() {
    let (app, showtime_id) = app_with_showtime().await;

    let (status, body) = send(&app, post_booking(showtime_id, &["C-9"], Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["is_guest"], true);
    assert_eq!(body["data"]["user_id"], Value::Null);
}

#[tokio::test]
async fn admin_listing_requires_admin_role() {
    let (app, showtime_id) = app_with_showtime().await;
    send(&app, post_booking(showtime_id, &["A-5"], None)).await;
    send(&app, post_booking(showtime_id, &["A-6"], None)).await;

    let user = issue_token(JWT_SECRET, Uuid::new_v4(), "user", chrono::Duration::hours(1)).unwrap();
    let (status, _) = send(&app, get("/api/admin/bookings", Some(&user))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = issue_token(JWT_SECRET, Uuid::new_v4(), "admin", chrono::Duration::hours(1)).unwrap();
    let (status, body) = send(
        &app,
        get("/api/admin/bookings?status=confirmed&sort_order=asc", Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["data"]["items"][0]["seats"], json!(["A-5"]));
}

#[tokio::test]
async fn quote_and_seat_map_are_public() {
    let (app, showtime_id) = app_with_showtime().await;

    let uri = format!("/api/showtimes/{showtime_id}/quote?seats=A-1,P-1");
    let (status, body) = send(&app, get(&uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], "2500.00");
    assert_eq!(body["data"]["lines"][1]["category"], "SUPERIOR");

    let (status, body) = send(&app, get("/api/seat-map", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_seats"], 319);
    assert_eq!(body["data"]["rows"][0]["row"], "P");

    let (status, body) = send(&app, get("/api/showtimes", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["available_seats"], 100);
    assert_eq!(body["data"]["items"][0]["movie_title"], "Fearless Concurrency");
}
