//! Seat occupancy per showtime.
//!
//! Every showtime owns two locks: an async mutex (the *section*) that
//! serializes `reserve` calls for that showtime only, and a read/write lock
//! around the published sold-seat snapshot. Readers only ever touch the
//! snapshot lock, which writers hold just long enough to swap an `Arc`, so
//! queries never wait on a booking in progress.

use std::{
    collections::{BTreeSet, HashMap},
    future::Future,
    sync::Arc,
    time::Duration,
};

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::seat_map::SeatId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Showtime {0} not found")]
    NotFound(Uuid),

    #[error("Seats already sold: {}", join_seats(.seats))]
    Conflict { seats: Vec<SeatId> },

    #[error("Requested {requested} seats but only {available} remain")]
    CapacityExceeded { requested: usize, available: u32 },

    #[error("Showtime is busy, try again")]
    Busy,
}

fn join_seats(seats: &[SeatId]) -> String {
    seats
        .iter()
        .map(SeatId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Point-in-time view of one showtime's occupancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatSnapshot {
    pub showtime_id: Uuid,
    pub capacity: u32,
    pub sold: Arc<BTreeSet<SeatId>>,
}

impl SeatSnapshot {
    pub fn available(&self) -> u32 {
        self.capacity.saturating_sub(self.sold.len() as u32)
    }
}

/// Seats that passed every ledger check and are about to be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub showtime_id: Uuid,
    pub seats: Vec<SeatId>,
    /// Available count once this reservation is published.
    pub available: u32,
}

struct ShowtimeSlot {
    capacity: u32,
    section: Mutex<()>,
    sold: RwLock<Arc<BTreeSet<SeatId>>>,
}

pub struct ShowtimeLedger {
    slots: RwLock<HashMap<Uuid, Arc<ShowtimeSlot>>>,
    lock_timeout: Duration,
}

impl ShowtimeLedger {
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            lock_timeout,
        }
    }

    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    /// Loads a showtime into the ledger. An already registered showtime is
    /// left untouched and `false` is returned, so late or repeated loads can
    /// never roll back seats sold in the meantime.
    pub async fn register<I>(&self, showtime_id: Uuid, capacity: u32, sold: I) -> bool
    where
        I: IntoIterator<Item = SeatId>,
    {
        let mut slots = self.slots.write().await;
        if slots.contains_key(&showtime_id) {
            return false;
        }

        let sold: BTreeSet<SeatId> = sold.into_iter().collect();
        if sold.len() > capacity as usize {
            tracing::error!(
                showtime_id = %showtime_id,
                capacity,
                sold = sold.len(),
                "showtime loaded with more sold seats than capacity"
            );
        }

        slots.insert(
            showtime_id,
            Arc::new(ShowtimeSlot {
                capacity,
                section: Mutex::new(()),
                sold: RwLock::new(Arc::new(sold)),
            }),
        );
        true
    }

    pub async fn contains(&self, showtime_id: Uuid) -> bool {
        self.slots.read().await.contains_key(&showtime_id)
    }

    async fn slot(&self, showtime_id: Uuid) -> Result<Arc<ShowtimeSlot>, LedgerError> {
        self.slots
            .read()
            .await
            .get(&showtime_id)
            .cloned()
            .ok_or(LedgerError::NotFound(showtime_id))
    }

    /// Last published occupancy. Never waits on an in-flight `reserve`.
    pub async fn query(&self, showtime_id: Uuid) -> Result<SeatSnapshot, LedgerError> {
        let slot = self.slot(showtime_id).await?;
        let sold = slot.sold.read().await.clone();
        Ok(SeatSnapshot {
            showtime_id,
            capacity: slot.capacity,
            sold,
        })
    }

    pub async fn reserve(
        &self,
        showtime_id: Uuid,
        seats: &[SeatId],
    ) -> Result<Reservation, LedgerError> {
        self.reserve_with(showtime_id, seats, |reservation| async move { Ok(reservation) })
            .await
    }

    /// Checks and claims `seats` inside the showtime's exclusive section.
    ///
    /// `commit` runs after every check has passed while the section is still
    /// held; the new sold set is published only if it returns `Ok`. An `Err`
    /// from `commit` leaves the ledger exactly as it was.
    pub async fn reserve_with<F, Fut, T, E>(
        &self,
        showtime_id: Uuid,
        seats: &[SeatId],
        commit: F,
    ) -> Result<T, E>
    where
        F: FnOnce(Reservation) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<LedgerError>,
    {
        let slot = self.slot(showtime_id).await?;

        let _section = tokio::time::timeout(self.lock_timeout, slot.section.lock())
            .await
            .map_err(|_| {
                tracing::debug!(showtime_id = %showtime_id, "seat section wait timed out");
                LedgerError::Busy
            })?;

        let current = slot.sold.read().await.clone();
        let requested: BTreeSet<SeatId> = seats.iter().copied().collect();

        let taken: Vec<SeatId> = requested.intersection(&current).copied().collect();
        if !taken.is_empty() {
            return Err(LedgerError::Conflict { seats: taken }.into());
        }

        let available = slot.capacity.saturating_sub(current.len() as u32);
        if requested.len() > available as usize {
            return Err(LedgerError::CapacityExceeded {
                requested: requested.len(),
                available,
            }
            .into());
        }

        let mut next = BTreeSet::clone(&current);
        next.extend(requested.iter().copied());

        let reservation = Reservation {
            showtime_id,
            available: available - requested.len() as u32,
            seats: requested.into_iter().collect(),
        };
        let committed = commit(reservation).await?;

        *slot.sold.write().await = Arc::new(next);
        Ok(committed)
    }
}
