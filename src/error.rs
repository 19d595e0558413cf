use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    ledger::LedgerError,
    pricing::PricingError,
    response::{ApiResponse, Meta},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid seat {0}")]
    InvalidSeat(String),

    #[error("Seats already sold: {}", .0.join(", "))]
    SeatConflict(Vec<String>),

    #[error("Requested {requested} seats but only {available} remain")]
    CapacityExceeded { requested: usize, available: u32 },

    #[error("Showtime is busy, try again")]
    Busy,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// `Busy` is the only outcome a client should retry unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Busy)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_)
            | AppError::Validation(_)
            | AppError::InvalidSeat(_)
            | AppError::CapacityExceeded { .. } => StatusCode::BAD_REQUEST,
            AppError::SeatConflict(_) => StatusCode::CONFLICT,
            AppError::Busy => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Validation(_) => "validation_error",
            AppError::InvalidSeat(_) => "invalid_seat",
            AppError::SeatConflict(_) => "conflict",
            AppError::CapacityExceeded { .. } => "capacity_exceeded",
            AppError::Busy => "busy",
            AppError::Unauthorized => "unauthorized",
            AppError::Forbidden => "forbidden",
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => "internal",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(_) => AppError::NotFound,
            LedgerError::Conflict { seats } => {
                AppError::SeatConflict(seats.iter().map(ToString::to_string).collect())
            }
            LedgerError::CapacityExceeded {
                requested,
                available,
            } => AppError::CapacityExceeded {
                requested,
                available,
            },
            LedgerError::Busy => AppError::Busy,
        }
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidSeat(seat) => AppError::InvalidSeat(seat),
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    seats: Option<Vec<String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() && !self.is_retryable() {
            tracing::error!(error = ?self, "request failed");
        }

        let seats = match &self {
            AppError::SeatConflict(seats) => Some(seats.clone()),
            _ => None,
        };

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
                kind: self.kind(),
                seats,
            }),
            meta: Some(Meta::empty()),
        };

        let mut response = (status, axum::Json(body)).into_response();
        if self.is_retryable() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        response
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seat_map::SeatId;

    #[test]
    fn ledger_errors_map_to_distinct_statuses() {
        let conflict: AppError = LedgerError::Conflict {
            seats: vec![SeatId::new('A', 1)],
        }
        .into();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert!(!conflict.is_retryable());

        let busy: AppError = LedgerError::Busy.into();
        assert_eq!(busy.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(busy.is_retryable());

        let capacity: AppError = LedgerError::CapacityExceeded {
            requested: 3,
            available: 2,
        }
        .into();
        assert_eq!(capacity.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn busy_response_carries_retry_after() {
        let response = AppError::Busy.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "1");
    }
}
