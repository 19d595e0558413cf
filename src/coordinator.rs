//! The single entry point that sells seats.
//!
//! `create_booking` validates the request, prices it, then claims the seats
//! in the showtime ledger and writes the booking record inside the same
//! per-showtime section. The ledger publishes the new sold set only after the
//! record is stored, so readers never see a sold seat without its booking.

use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    ledger::{SeatSnapshot, ShowtimeLedger},
    models::{Booking, BookingStatus, BuyerInfo, PaymentSummary, Showtime},
    pricing::{PricingCalculator, Quote},
    seat_map::{SeatId, SeatMap},
    store::{BookingStore, CatalogReader},
};

#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub showtime_id: Uuid,
    pub seats: Vec<String>,
    pub buyer: BuyerInfo,
    pub payment: PaymentSummary,
}

#[derive(Clone)]
pub struct BookingCoordinator {
    ledger: Arc<ShowtimeLedger>,
    pricing: PricingCalculator,
    catalog: Arc<dyn CatalogReader>,
    bookings: Arc<dyn BookingStore>,
}

impl BookingCoordinator {
    pub fn new(
        ledger: Arc<ShowtimeLedger>,
        seat_map: Arc<SeatMap>,
        catalog: Arc<dyn CatalogReader>,
        bookings: Arc<dyn BookingStore>,
    ) -> Self {
        Self {
            ledger,
            pricing: PricingCalculator::new(seat_map),
            catalog,
            bookings,
        }
    }

    pub fn pricing(&self) -> &PricingCalculator {
        &self.pricing
    }

    pub fn seat_map(&self) -> &SeatMap {
        self.pricing.seat_map()
    }

    pub fn catalog(&self) -> &dyn CatalogReader {
        self.catalog.as_ref()
    }

    pub fn bookings(&self) -> &dyn BookingStore {
        self.bookings.as_ref()
    }

    /// Loads every catalog showtime into the ledger; returns how many were new.
    pub async fn warm_up(&self) -> AppResult<usize> {
        let mut loaded = 0;
        for showtime in self.catalog.list_showtimes().await? {
            if self.load_showtime(&showtime).await? {
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    async fn load_showtime(&self, showtime: &Showtime) -> AppResult<bool> {
        if self.ledger.contains(showtime.id).await {
            return Ok(false);
        }

        let sold = self
            .bookings
            .sold_seats(showtime.id)
            .await?
            .into_iter()
            .filter_map(|raw| match raw.parse::<SeatId>() {
                Ok(seat) => Some(seat),
                Err(err) => {
                    tracing::error!(showtime_id = %showtime.id, error = %err, "unreadable sold seat skipped");
                    None
                }
            })
            .collect::<Vec<_>>();

        let registered = self
            .ledger
            .register(showtime.id, showtime.total_seats, sold)
            .await;
        if registered {
            tracing::debug!(showtime_id = %showtime.id, "showtime loaded into ledger");
        }
        Ok(registered)
    }

    async fn showtime(&self, showtime_id: Uuid) -> AppResult<Showtime> {
        self.catalog
            .showtime(showtime_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Current sold seats for a showtime, loading it on first access.
    pub async fn booked_seats(&self, showtime_id: Uuid) -> AppResult<SeatSnapshot> {
        if !self.ledger.contains(showtime_id).await {
            let showtime = self.showtime(showtime_id).await?;
            self.load_showtime(&showtime).await?;
        }
        Ok(self.ledger.query(showtime_id).await?)
    }

    pub async fn quote(&self, showtime_id: Uuid, seats: &[String]) -> AppResult<Quote> {
        let seats = parse_seats(seats)?;
        let showtime = self.showtime(showtime_id).await?;
        Ok(self.pricing.quote(&seats, showtime.base_price)?)
    }

    pub async fn create_booking(&self, request: CreateBooking) -> AppResult<Booking> {
        let seats = parse_seats(&request.seats)?;
        validate_buyer(&request.buyer)?;
        validate_payment(&request.payment)?;

        let showtime = self.showtime(request.showtime_id).await?;
        let total = self.pricing.total_price(&seats, showtime.base_price)?;
        self.load_showtime(&showtime).await?;

        // Run the claim on its own task so a dropped request cannot stop it
        // between the store write and the ledger publish.
        let this = self.clone();
        tokio::spawn(async move { this.commit(showtime, seats, total, request).await })
            .await
            .map_err(|err| AppError::Internal(anyhow::anyhow!("booking task failed: {err}")))?
    }

    async fn commit(
        &self,
        showtime: Showtime,
        seats: Vec<SeatId>,
        total: Decimal,
        request: CreateBooking,
    ) -> AppResult<Booking> {
        let store = Arc::clone(&self.bookings);
        let CreateBooking { buyer, payment, .. } = request;
        let Showtime {
            id: showtime_id,
            movie_id,
            ..
        } = showtime;

        let result = self
            .ledger
            .reserve_with(showtime_id, &seats, |reservation| async move {
                let booking = Booking {
                    id: Uuid::new_v4(),
                    showtime_id,
                    movie_id,
                    user_id: buyer.user_id,
                    is_guest: buyer.user_id.is_none(),
                    email: buyer.email,
                    phone: buyer.phone,
                    seats: reservation.seats.iter().map(SeatId::to_string).collect(),
                    total_amount: total,
                    payment,
                    status: BookingStatus::Confirmed,
                    created_at: Utc::now(),
                };

                if let Err(err) = store.insert(&booking).await {
                    match &err {
                        AppError::SeatConflict(seats) => tracing::error!(
                            showtime_id = %booking.showtime_id,
                            seats = ?seats,
                            "store already holds seats the ledger reports free"
                        ),
                        other => tracing::error!(
                            showtime_id = %booking.showtime_id,
                            error = ?other,
                            "booking write failed, seats not published"
                        ),
                    }
                    return Err(err);
                }
                Ok((booking, reservation.available))
            })
            .await;

        match result {
            Ok((booking, available)) => {
                tracing::info!(
                    booking_id = %booking.id,
                    showtime_id = %booking.showtime_id,
                    seats = ?booking.seats,
                    total = %booking.total_amount,
                    guest = booking.is_guest,
                    available,
                    "booking confirmed"
                );
                Ok(booking)
            }
            Err(err) => {
                match &err {
                    AppError::SeatConflict(seats) => {
                        tracing::warn!(showtime_id = %showtime_id, seats = ?seats, "seat conflict")
                    }
                    AppError::Busy => {
                        tracing::warn!(showtime_id = %showtime_id, "showtime busy")
                    }
                    _ => {}
                }
                Err(err)
            }
        }
    }
}

fn parse_seats(raw: &[String]) -> AppResult<Vec<SeatId>> {
    if raw.is_empty() {
        return Err(AppError::Validation("at least one seat is required".into()));
    }

    let mut seen = HashSet::with_capacity(raw.len());
    let mut seats = Vec::with_capacity(raw.len());
    for value in raw {
        let seat = value
            .parse::<SeatId>()
            .map_err(|_| AppError::InvalidSeat(value.clone()))?;
        if !seen.insert(seat) {
            return Err(AppError::Validation(format!("seat {seat} requested twice")));
        }
        seats.push(seat);
    }
    Ok(seats)
}

fn validate_buyer(buyer: &BuyerInfo) -> AppResult<()> {
    let email = buyer.email.trim();
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid_email {
        return Err(AppError::Validation("a valid contact email is required".into()));
    }

    if !buyer.phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation("a contact phone number is required".into()));
    }
    Ok(())
}

fn validate_payment(payment: &PaymentSummary) -> AppResult<()> {
    if payment.card_last_four.len() != 4
        || !payment.card_last_four.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(AppError::Validation("card_last_four must be four digits".into()));
    }
    if payment.card_name.trim().is_empty() {
        return Err(AppError::Validation("cardholder name is required".into()));
    }
    Ok(())
}
