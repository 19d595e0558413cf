use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, SqlErr,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::{AuditEvent, log_audit},
    entity::{
        booking_seats::{self, ActiveModel as BookingSeatActive, Column as SeatCol, Entity as BookingSeats},
        bookings::{ActiveModel as BookingActive, Column as BookingCol, Entity as Bookings, Model as BookingModel},
        movies::{Entity as Movies, Model as MovieModel},
        showtimes::{Column as ShowtimeCol, Entity as Showtimes, Model as ShowtimeModel},
    },
    error::{AppError, AppResult},
    models::{Booking, BookingStatus, PaymentSummary, Showtime},
    store::{BookingFilter, BookingStore, CatalogReader, PageRequest},
};

#[derive(Debug, Clone)]
pub struct PgCatalog {
    orm: DatabaseConnection,
}

impl PgCatalog {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl CatalogReader for PgCatalog {
    async fn showtime(&self, id: Uuid) -> AppResult<Option<Showtime>> {
        let row = Showtimes::find_by_id(id)
            .find_also_related(Movies)
            .one(&self.orm)
            .await?;
        Ok(row.map(|(showtime, movie)| showtime_from_entity(showtime, movie)))
    }

    async fn showtimes(&self, ids: &[Uuid]) -> AppResult<Vec<Showtime>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = Showtimes::find()
            .filter(ShowtimeCol::Id.is_in(ids.iter().copied()))
            .find_also_related(Movies)
            .all(&self.orm)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(showtime, movie)| showtime_from_entity(showtime, movie))
            .collect())
    }

    async fn list_showtimes(&self) -> AppResult<Vec<Showtime>> {
        let rows = Showtimes::find()
            .order_by_asc(ShowtimeCol::StartTime)
            .find_also_related(Movies)
            .all(&self.orm)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(showtime, movie)| showtime_from_entity(showtime, movie))
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct PgBookingStore {
    orm: DatabaseConnection,
}

impl PgBookingStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn insert(&self, booking: &Booking) -> AppResult<()> {
        let txn = self.orm.begin().await?;

        BookingActive {
            id: Set(booking.id),
            showtime_id: Set(booking.showtime_id),
            movie_id: Set(booking.movie_id),
            user_id: Set(booking.user_id),
            is_guest: Set(booking.is_guest),
            email: Set(booking.email.clone()),
            phone: Set(booking.phone.clone()),
            seats: Set(serde_json::json!(booking.seats)),
            total_amount: Set(booking.total_amount),
            card_last_four: Set(booking.payment.card_last_four.clone()),
            card_name: Set(booking.payment.card_name.clone()),
            status: Set(booking.status.as_str().to_string()),
            created_at: Set(booking.created_at.into()),
        }
        .insert(&txn)
        .await?;

        let claims = booking.seats.iter().map(|seat| BookingSeatActive {
            showtime_id: Set(booking.showtime_id),
            seat_id: Set(seat.clone()),
            booking_id: Set(booking.id),
        });
        BookingSeats::insert_many(claims)
            .exec_without_returning(&txn)
            .await
            .map_err(|err| seat_claim_error(err, &booking.seats))?;

        txn.commit().await?;

        let event = AuditEvent::new("booking_created", "bookings")
            .actor(booking.user_id)
            .target(booking.id)
            .metadata(serde_json::json!({
                "showtime_id": booking.showtime_id,
                "seats": booking.seats,
                "total_amount": booking.total_amount,
            }));
        if let Err(err) = log_audit(&self.orm, event).await {
            tracing::warn!(error = %err, "audit log failed");
        }

        Ok(())
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Booking>> {
        Bookings::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(booking_from_entity)
            .transpose()
    }

    async fn list(&self, filter: &BookingFilter, page: PageRequest) -> AppResult<(Vec<Booking>, u64)> {
        let mut condition = Condition::all();
        if let Some(user_id) = filter.user_id {
            condition = condition.add(BookingCol::UserId.eq(user_id));
        }
        if let Some(showtime_id) = filter.showtime_id {
            condition = condition.add(BookingCol::ShowtimeId.eq(showtime_id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(BookingCol::Status.eq(status.as_str()));
        }

        let mut finder = Bookings::find().filter(condition);
        finder = if page.newest_first {
            finder.order_by_desc(BookingCol::CreatedAt)
        } else {
            finder.order_by_asc(BookingCol::CreatedAt)
        };

        let total = finder.clone().count(&self.orm).await?;

        let items = finder
            .limit(page.limit)
            .offset(page.offset)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(booking_from_entity)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((items, total))
    }

    async fn sold_seats(&self, showtime_id: Uuid) -> AppResult<Vec<String>> {
        let seats = BookingSeats::find()
            .join(
                sea_orm::JoinType::InnerJoin,
                booking_seats::Relation::Bookings.def(),
            )
            .filter(SeatCol::ShowtimeId.eq(showtime_id))
            .filter(BookingCol::Status.eq(BookingStatus::Confirmed.as_str()))
            .all(&self.orm)
            .await?
            .into_iter()
            .map(|row| row.seat_id)
            .collect();
        Ok(seats)
    }
}

fn seat_claim_error(err: DbErr, seats: &[String]) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::SeatConflict(seats.to_vec()),
        _ => AppError::OrmError(err),
    }
}

fn showtime_from_entity(model: ShowtimeModel, movie: Option<MovieModel>) -> Showtime {
    Showtime {
        id: model.id,
        movie_id: model.movie_id,
        movie_title: movie.map(|m| m.title).unwrap_or_default(),
        start_time: model.start_time.with_timezone(&Utc),
        base_price: model.price,
        total_seats: u32::try_from(model.total_seats).unwrap_or(0),
    }
}

fn booking_from_entity(model: BookingModel) -> AppResult<Booking> {
    let seats: Vec<String> = serde_json::from_value(model.seats)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("corrupt seats for booking {}: {e}", model.id)))?;
    let status = model.status.parse::<BookingStatus>()?;

    Ok(Booking {
        id: model.id,
        showtime_id: model.showtime_id,
        movie_id: model.movie_id,
        user_id: model.user_id,
        is_guest: model.is_guest,
        email: model.email,
        phone: model.phone,
        seats,
        total_amount: model.total_amount,
        payment: PaymentSummary {
            card_last_four: model.card_last_four,
            card_name: model.card_name,
        },
        status,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
