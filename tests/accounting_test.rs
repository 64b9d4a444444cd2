mod common;

use std::sync::Barrier;
use chrono::NaiveDate;
use axum_timesheet::errors::{AppError, StorageError};
use axum_timesheet::models::{AuthSession, EntryRequest, EntryScope};
use axum_timesheet::services::{visibility, AccountingService};
use common::{at, seeded_store, user};

fn request(start: &str, end: &str) -> EntryRequest {
    EntryRequest {
        work_type: "development".to_string(),
        start_time: at(start),
        end_time: at(end),
        description: "feature work".to_string(),
    }
}

#[test]
fn entry_exactly_on_limit_is_accepted() {
    let store = seeded_store();
    let accounting = AccountingService::new(store.clone());
    let alice = user(&store, "alice");

    accounting
        .record_entry(alice.id, request("2024-05-01 08:00", "2024-05-01 18:00"))
        .unwrap();

    assert_eq!(store.sum_hours(alice.id).unwrap(), 10.0);
}

#[test]
fn any_entry_past_a_full_limit_is_rejected() {
    let store = seeded_store();
    let accounting = AccountingService::new(store.clone());
    let alice = user(&store, "alice");
    accounting
        .record_entry(alice.id, request("2024-05-01 08:00", "2024-05-01 18:00"))
        .unwrap();

    let err = accounting
        .record_entry(alice.id, request("2024-05-02 08:00", "2024-05-02 08:01"))
        .unwrap_err();

    match err {
        AppError::LimitExceeded {
            attempted,
            current,
            limit,
        } => {
            assert_eq!(attempted, 1.0 / 60.0);
            assert_eq!(current, 10.0);
            assert_eq!(limit, 10.0);
        }
        other => panic!("expected LimitExceeded, got {:?}", other),
    }
    assert_eq!(store.list_entries(EntryScope::ForUser(alice.id)).unwrap().len(), 1);
}

#[test]
fn non_positive_durations_write_nothing() {
    let store = seeded_store();
    let accounting = AccountingService::new(store.clone());
    let alice = user(&store, "alice");

    for (start, end) in [
        ("2024-05-01 09:00", "2024-05-01 09:00"),
        ("2024-05-01 10:00", "2024-05-01 09:00"),
    ] {
        let err = accounting.record_entry(alice.id, request(start, end)).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "non-positive duration"));
    }

    assert!(store.list_entries(EntryScope::All).unwrap().is_empty());
}

#[test]
fn running_total_never_exceeds_limit() {
    let store = seeded_store();
    let accounting = AccountingService::new(store.clone());
    let bob = user(&store, "bob");

    // 45-minute slots on consecutive days: 13 fit into 10 hours, the rest are refused
    let mut accepted = 0;
    for day in 1..=20 {
        let start = format!("2024-06-{:02} 09:00", day);
        let end = format!("2024-06-{:02} 09:45", day);
        if accounting.record_entry(bob.id, request(&start, &end)).is_ok() {
            accepted += 1;
        }
        assert!(store.sum_hours(bob.id).unwrap() <= bob.hour_limit);
    }

    assert_eq!(accepted, 13);
}

#[test]
fn limits_are_tracked_per_user() {
    let store = seeded_store();
    let accounting = AccountingService::new(store.clone());
    let alice = user(&store, "alice");
    let bob = user(&store, "bob");

    accounting
        .record_entry(alice.id, request("2024-05-01 08:00", "2024-05-01 18:00"))
        .unwrap();
    accounting
        .record_entry(bob.id, request("2024-05-01 08:00", "2024-05-01 14:00"))
        .unwrap();

    let usage = accounting.usage(bob.id).unwrap();
    assert_eq!(usage.logged, 6.0);
    assert_eq!(usage.limit, 10.0);
    assert_eq!(usage.remaining(), 4.0);
}

#[test]
fn unknown_user_is_a_storage_error() {
    let store = seeded_store();
    let accounting = AccountingService::new(store.clone());

    let err = accounting
        .record_entry(999, request("2024-05-01 08:00", "2024-05-01 09:00"))
        .unwrap_err();

    assert!(matches!(err, AppError::Storage(StorageError::UnknownUser(999))));
    assert!(store.list_entries(EntryScope::All).unwrap().is_empty());
}

#[test]
fn concurrent_submissions_cannot_both_fit() {
    let store = seeded_store();
    let accounting = AccountingService::new(store.clone());
    let alice = user(&store, "alice");
    let barrier = Barrier::new(2);

    // Each 6-hour entry fits alone; together they would reach 12 of 10 hours.
    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = ["2024-05-01", "2024-05-02"]
            .into_iter()
            .map(|day| {
                let accounting = accounting.clone();
                let barrier = &barrier;
                let user_id = alice.id;
                s.spawn(move || {
                    barrier.wait();
                    accounting.record_entry(
                        user_id,
                        request(&format!("{} 08:00", day), &format!("{} 14:00", day)),
                    )
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let rejections = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::LimitExceeded { .. })))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(rejections, 1);
    assert_eq!(store.sum_hours(alice.id).unwrap(), 6.0);
}

#[test]
fn many_concurrent_submissions_respect_limit() {
    let store = seeded_store();
    let accounting = AccountingService::new(store.clone());
    let bob = user(&store, "bob");
    let barrier = Barrier::new(8);

    let successes = std::thread::scope(|s| {
        let handles: Vec<_> = (1..=8)
            .map(|day| {
                let accounting = accounting.clone();
                let barrier = &barrier;
                let user_id = bob.id;
                s.spawn(move || {
                    barrier.wait();
                    let start = format!("2024-07-{:02} 09:00", day);
                    let end = format!("2024-07-{:02} 12:00", day);
                    accounting.record_entry(user_id, request(&start, &end)).is_ok()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count()
    });

    // 3-hour entries: three fit in 10 hours
    assert_eq!(successes, 3);
    assert_eq!(store.sum_hours(bob.id).unwrap(), 9.0);
}

#[test]
fn admin_sees_every_entry_newest_first() {
    let store = seeded_store();
    let accounting = AccountingService::new(store.clone());
    let alice = user(&store, "alice");
    let bob = user(&store, "bob");
    let root = user(&store, "root");

    accounting
        .record_entry(alice.id, request("2024-05-01 08:00", "2024-05-01 09:00"))
        .unwrap();
    accounting
        .record_entry(bob.id, request("2024-05-03 08:00", "2024-05-03 09:00"))
        .unwrap();
    accounting
        .record_entry(alice.id, request("2024-05-02 08:00", "2024-05-02 09:00"))
        .unwrap();

    let entries = visibility::visible_entries(&store, &AuthSession::for_user(&root)).unwrap();
    let owners: Vec<&str> = entries.iter().map(|e| e.user_name.as_str()).collect();
    assert_eq!(owners, vec!["Bob", "Alice", "Alice"]);
    assert!(entries.windows(2).all(|w| w[0].start_time >= w[1].start_time));
}

#[test]
fn user_sees_only_own_entries_newest_first() {
    let store = seeded_store();
    let accounting = AccountingService::new(store.clone());
    let alice = user(&store, "alice");
    let bob = user(&store, "bob");

    accounting
        .record_entry(alice.id, request("2024-05-01 08:00", "2024-05-01 09:00"))
        .unwrap();
    accounting
        .record_entry(bob.id, request("2024-05-03 08:00", "2024-05-03 09:00"))
        .unwrap();
    accounting
        .record_entry(alice.id, request("2024-05-02 08:00", "2024-05-02 09:00"))
        .unwrap();

    let entries = visibility::visible_entries(&store, &AuthSession::for_user(&alice)).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.user_id == alice.id));
    assert_eq!(entries[0].start_time, at("2024-05-02 08:00"));
    assert_eq!(entries[1].start_time, at("2024-05-01 08:00"));
}

#[test]
fn five_digit_years_are_rejected_before_storage() {
    let store = seeded_store();
    let accounting = AccountingService::new(store.clone());
    let alice = user(&store, "alice");

    accounting
        .record_entry(alice.id, request("2024-01-01 09:00", "2024-01-01 10:00"))
        .unwrap();

    let far = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
    let err = accounting
        .record_entry(
            alice.id,
            EntryRequest {
                work_type: "development".to_string(),
                start_time: far.and_hms_opt(9, 0, 0).unwrap(),
                end_time: far.and_hms_opt(10, 0, 0).unwrap(),
                description: String::new(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let entries = store.list_entries(EntryScope::ForUser(alice.id)).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].start_time, at("2024-01-01 09:00"));
    assert_eq!(store.sum_hours(alice.id).unwrap(), 1.0);
}
