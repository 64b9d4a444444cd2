use chrono::{Datelike, NaiveDate, NaiveDateTime};
use crate::errors::{AppError, AppResult, StorageError};
use crate::models::{EntryId, EntryRequest, HourUsage, NewEntry, RecordForm, UserId};
use crate::services::LedgerStore;

pub const SECONDS_PER_HOUR: f64 = 3600.0;

const NON_POSITIVE_DURATION: &str = "non-positive duration";

// Timestamps are stored as text and sorted as text; that matches time order
// only for four-digit years.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

// Accepted shapes of a submitted timestamp, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a naive local timestamp as sent by a `datetime-local` input or an ISO-8601 client.
/// A bare date means midnight.
pub fn parse_timestamp(raw: &str) -> AppResult<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| AppError::Validation(format!("invalid timestamp: {:?}", raw)))
        .and_then(check_timestamp)
}

pub fn check_timestamp(ts: NaiveDateTime) -> AppResult<NaiveDateTime> {
    if !YEAR_RANGE.contains(&ts.year()) {
        return Err(AppError::Validation(format!(
            "timestamp year {} outside {}..={}",
            ts.year(),
            YEAR_RANGE.start(),
            YEAR_RANGE.end()
        )));
    }
    Ok(ts)
}

/// Builds an entry request from raw text fields, as sent by the HTML form or the JSON API.
pub fn entry_request(form: RecordForm) -> AppResult<EntryRequest> {
    Ok(EntryRequest {
        work_type: form.work_type,
        start_time: parse_timestamp(&form.start_time)?,
        end_time: parse_timestamp(&form.end_time)?,
        description: form.description,
    })
}

/// Length of `[start, end)` in fractional hours. Zero or negative spans are rejected.
pub fn entry_hours(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<f64> {
    if end <= start {
        return Err(AppError::Validation(NON_POSITIVE_DURATION.to_string()));
    }
    let span = (end - start)
        .to_std()
        .map_err(|_| AppError::Validation(NON_POSITIVE_DURATION.to_string()))?;
    Ok(span.as_secs_f64() / SECONDS_PER_HOUR)
}

/// Landing exactly on the limit is allowed; only going past it fails.
pub fn check_hour_limit(current: f64, hours: f64, limit: f64) -> AppResult<()> {
    if current + hours > limit {
        return Err(AppError::LimitExceeded {
            attempted: hours,
            current,
            limit,
        });
    }
    Ok(())
}

#[derive(Clone)]
pub struct AccountingService {
    store: LedgerStore,
}

impl AccountingService {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Validates and stores one entry for `user_id`.
    ///
    /// Reading the running total, comparing it with the user's limit and inserting
    /// happen in a single ledger transaction, so concurrent submissions for the same
    /// user cannot jointly overshoot the limit.
    pub fn record_entry(&self, user_id: UserId, request: EntryRequest) -> AppResult<EntryId> {
        check_timestamp(request.start_time)?;
        check_timestamp(request.end_time)?;
        let hours = entry_hours(request.start_time, request.end_time)?;

        self.store.transaction(move |tx| {
            let user = tx
                .find_user_by_id(user_id)?
                .ok_or(StorageError::UnknownUser(user_id))?;

            let current = tx.sum_hours(user_id)?;
            if let Err(e) = check_hour_limit(current, hours, user.hour_limit) {
                tracing::warn!(
                    "Rejected entry for {}: {:.2} h + {:.2} h over limit {:.2} h",
                    user.username,
                    current,
                    hours,
                    user.hour_limit
                );
                return Err(e);
            }

            let entry_id = tx.insert_entry(&NewEntry {
                user_id,
                work_type: request.work_type,
                start_time: request.start_time,
                end_time: request.end_time,
                description: request.description,
                hours,
            })?;

            tracing::info!(
                "Recorded entry {} for {}: {:.2} h (total {:.2} of {:.2} h)",
                entry_id,
                user.username,
                hours,
                current + hours,
                user.hour_limit
            );
            Ok(entry_id)
        })
    }

    pub fn usage(&self, user_id: UserId) -> AppResult<HourUsage> {
        let user = self
            .store
            .find_user_by_id(user_id)?
            .ok_or(StorageError::UnknownUser(user_id))?;
        let logged = self.store.sum_hours(user_id)?;
        Ok(HourUsage {
            logged,
            limit: user.hour_limit,
        })
    }
}
