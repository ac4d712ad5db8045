//! Date normalization into canonical `YYYY-MM-DD`
//!
//! Accepted shapes, tried in order:
//! - ISO `YYYY-MM-DD`, returned unchanged
//! - day-first `D/M/Y` with a 2 to 4 digit year (2-digit years pivot at 50:
//!   `50..=99` is 19xx, `00..=49` is 20xx)
//! - month-first `M/D/YYYY`, only when day-first does not give a real date
//!
//! Anything else falls back to the clock's current date. The fallback is
//! silent for the caller (it gets a plausible date back) but is logged.

use crate::core::traits::Clock;
use chrono::NaiveDate;
use log::warn;
use std::sync::Arc;

/// Normalizes raw date strings, falling back to an injected clock
#[derive(Debug, Clone)]
pub struct DateNormalizer {
    clock: Arc<dyn Clock>,
}

impl DateNormalizer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Normalize a raw date string into `YYYY-MM-DD`
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            let fallback = self.clock.today_iso();
            warn!("Empty date, using processing date {}", fallback);
            return fallback;
        }

        if is_iso_date(trimmed) {
            return trimmed.to_string();
        }

        match parse_day_first(trimmed).or_else(|| parse_month_first(trimmed)) {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => {
                let fallback = self.clock.today_iso();
                warn!("Unrecognized date '{}', using processing date {}", trimmed, fallback);
                fallback
            }
        }
    }
}

/// `YYYY-MM-DD` by shape only
fn is_iso_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Split `a/b/c` into three all-digit groups
fn slash_groups(s: &str) -> Option<(&str, &str, &str)> {
    let mut parts = s.split('/');
    let first = parts.next()?;
    let second = parts.next()?;
    let third = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if all_digits(first) && all_digits(second) && all_digits(third) {
        Some((first, second, third))
    } else {
        None
    }
}

fn expand_year(year: &str) -> Option<i32> {
    let value: i32 = year.parse().ok()?;
    if year.len() == 2 {
        Some(if value >= 50 { 1900 + value } else { 2000 + value })
    } else {
        Some(value)
    }
}

fn parse_day_first(s: &str) -> Option<NaiveDate> {
    let (day, month, year) = slash_groups(s)?;
    if day.len() > 2 || month.len() > 2 || !(2..=4).contains(&year.len()) {
        return None;
    }

    NaiveDate::from_ymd_opt(expand_year(year)?, month.parse().ok()?, day.parse().ok()?)
}

fn parse_month_first(s: &str) -> Option<NaiveDate> {
    let (month, day, year) = slash_groups(s)?;
    if month.len() > 2 || day.len() > 2 || year.len() != 4 {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}
