//! Slot availability classification.
//!
//! A slot is a pair of wall-clock times without a date. When the end is
//! earlier than the start the slot is treated as running past midnight.

use chrono::NaiveTime;
use thiserror::Error;

use crate::constants::availability::{SLOT_TIME_FORMAT, UPCOMING_WINDOW_MINUTES};
use crate::models::SlotStatus;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("invalid slot time '{0}', expected HH:MM:SS")]
    InvalidTime(String),
}

/// Parse a dataset slot time (`HH:MM:SS`)
pub fn parse_slot_time(raw: &str) -> Result<NaiveTime, AvailabilityError> {
    NaiveTime::parse_from_str(raw, SLOT_TIME_FORMAT)
        .map_err(|_| AvailabilityError::InvalidTime(raw.to_string()))
}

/// Minutes from `now` until `start` on the same day. Negative once started.
fn minutes_until(now: NaiveTime, start: NaiveTime) -> f64 {
    (start - now).num_milliseconds() as f64 / 60_000.0
}

fn starts_soon(now: NaiveTime, start: NaiveTime) -> bool {
    let minutes = minutes_until(now, start);
    minutes > 0.0 && minutes < UPCOMING_WINDOW_MINUTES
}

/// Classify a slot relative to `now`.
///
/// Both boundaries are inclusive. A midnight-spanning slot checks containment
/// before the upcoming window and never reports [`SlotStatus::Passed`]; a
/// regular slot checks the upcoming window first.
pub fn classify_slot(now: NaiveTime, start: NaiveTime, end: NaiveTime) -> SlotStatus {
    if end < start {
        if now >= start || now <= end {
            SlotStatus::Available
        } else if starts_soon(now, start) {
            SlotStatus::Upcoming
        } else {
            SlotStatus::Unavailable
        }
    } else if starts_soon(now, start) {
        SlotStatus::Upcoming
    } else if start <= now && now <= end {
        SlotStatus::Available
    } else if now > end {
        SlotStatus::Passed
    } else {
        SlotStatus::Unavailable
    }
}

/// Parse both slot times and classify the slot
pub fn get_slot_status(
    now: NaiveTime,
    start: &str,
    end: &str,
) -> Result<SlotStatus, AvailabilityError> {
    let start = parse_slot_time(start)?;
    let end = parse_slot_time(end)?;
    Ok(classify_slot(now, start, end))
}
