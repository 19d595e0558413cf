mod common;

use std::{sync::Arc, time::Duration};

use cinema_booking_api::{
    error::AppError,
    ledger::{LedgerError, ShowtimeLedger},
    seat_map::SeatId,
    store::BookingStore,
};
use common::{harness, request, showtime};
use uuid::Uuid;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn disjoint_reservations_all_land() -> anyhow::Result<()> {
    let ledger = Arc::new(ShowtimeLedger::new(Duration::from_secs(5)));
    let showtime_id = Uuid::new_v4();
    ledger.register(showtime_id, 100, Vec::new()).await;

    let mut handles = Vec::new();
    for number in 1..=23u16 {
        for row in ['A', 'B'] {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger.reserve(showtime_id, &[SeatId::new(row, number)]).await
            }));
        }
    }

    for handle in handles {
        handle.await??;
    }

    let snapshot = ledger.query(showtime_id).await?;
    assert_eq!(snapshot.sold.len(), 46);
    assert_eq!(snapshot.available(), 54);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_reservations_sell_each_seat_once() -> anyhow::Result<()> {
    let ledger = Arc::new(ShowtimeLedger::new(Duration::from_secs(5)));
    let showtime_id = Uuid::new_v4();
    ledger.register(showtime_id, 100, Vec::new()).await;

    let mut handles = Vec::new();
    for number in 1..=20u16 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            let seats = [SeatId::new('E', 7), SeatId::new('F', number)];
            ledger.reserve(showtime_id, &seats).await
        }));
    }

    let mut won = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => won += 1,
            Err(LedgerError::Conflict { seats }) => {
                assert_eq!(seats, vec![SeatId::new('E', 7)]);
                conflicts += 1;
            }
            Err(other) => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(won, 1);
    assert_eq!(conflicts, 19);

    let snapshot = ledger.query(showtime_id).await?;
    assert_eq!(snapshot.sold.len(), 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn capacity_holds_under_contention() -> anyhow::Result<()> {
    let ledger = Arc::new(ShowtimeLedger::new(Duration::from_secs(5)));
    let showtime_id = Uuid::new_v4();
    ledger.register(showtime_id, 10, Vec::new()).await;

    let mut handles = Vec::new();
    for number in 1..=23u16 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger.reserve(showtime_id, &[SeatId::new('G', number)]).await
        }));
    }

    let mut sold = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => sold += 1,
            Err(LedgerError::CapacityExceeded { .. }) => {}
            Err(other) => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(sold, 10);
    assert_eq!(ledger.query(showtime_id).await?.available(), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bookings_for_one_seat_produce_one_record() -> anyhow::Result<()> {
    let show = showtime(100, 1000);
    let h = harness(&[show.clone()]).await;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let coordinator = h.coordinator.clone();
        let showtime_id = show.id;
        handles.push(tokio::spawn(async move {
            coordinator.create_booking(request(showtime_id, &["H-12"])).await
        }));
    }

    let mut confirmed = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => confirmed += 1,
            Err(AppError::SeatConflict(seats)) => assert_eq!(seats, vec!["H-12".to_string()]),
            Err(other) => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(confirmed, 1);
    assert_eq!(h.store.len().await, 1);
    assert_eq!(h.store.sold_seats(show.id).await?, vec!["H-12".to_string()]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_showtimes_do_not_contend() -> anyhow::Result<()> {
    let first = showtime(100, 1000);
    let second = showtime(100, 1000);
    let h = harness(&[first.clone(), second.clone()]).await;

    let a = {
        let coordinator = h.coordinator.clone();
        let id = first.id;
        tokio::spawn(async move { coordinator.create_booking(request(id, &["A-1"])).await })
    };
    let b = {
        let coordinator = h.coordinator.clone();
        let id = second.id;
        tokio::spawn(async move { coordinator.create_booking(request(id, &["A-1"])).await })
    };
    a.await??;
    b.await??;

    assert_eq!(h.coordinator.booked_seats(first.id).await?.available(), 99);
    assert_eq!(h.coordinator.booked_seats(second.id).await?.available(), 99);
    Ok(())
}
