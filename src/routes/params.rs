use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{models::BookingStatus, store::PageRequest};

#[derive(Debug, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingListQuery {
    /// Page number, default 1
    pub page: Option<i64>,
    /// Items per page, default 20
    pub per_page: Option<i64>,
    pub status: Option<BookingStatus>,
    pub sort_order: Option<SortOrder>,
}

impl BookingListQuery {
    /// Page number, page size and the store-level page request.
    pub fn page_request(&self) -> (i64, i64, PageRequest) {
        let (page, per_page, offset) = Pagination {
            page: self.page,
            per_page: self.per_page,
        }
        .normalize();
        let request = PageRequest {
            limit: per_page as u64,
            offset: offset as u64,
            newest_first: !matches!(self.sort_order, Some(SortOrder::Asc)),
        };
        (page, per_page, request)
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuoteQuery {
    /// Comma separated seat ids, e.g. `A-1,P-1`
    pub seats: String,
}

impl QuoteQuery {
    pub fn seat_list(&self) -> Vec<String> {
        self.seats
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
