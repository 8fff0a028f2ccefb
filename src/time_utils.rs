// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar dates.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::user::DATE_FORMAT;

/// The calendar day streaks and default transaction dates are counted in.
pub fn today_utc() -> NaiveDate {
    calendar_day(Utc::now())
}

/// UTC calendar day of a timestamp.
pub fn calendar_day(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}

/// Parse a client-supplied day: either `YYYY-MM-DD` or an RFC 3339
/// timestamp, which counts for its UTC calendar day.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(calendar_day(at.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Format a day as `YYYY-MM-DD`.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}
