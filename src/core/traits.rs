//! Injectable seams for the processing core
//!
//! The core is otherwise pure. The only outside state it touches is the
//! current date (used as a fallback) and the settlement-exclusion policy, and
//! both are reached through the traits below so callers and tests can
//! substitute them.

use chrono::{Local, NaiveDate};
use std::fmt::Debug;

/// Source of "today" for date and month fallbacks
pub trait Clock: Send + Sync + Debug {
    /// Current processing date
    fn today(&self) -> NaiveDate;

    /// Current processing date as `YYYY-MM-DD`
    fn today_iso(&self) -> String {
        self.today().format("%Y-%m-%d").to_string()
    }

    /// Current processing month as `YYYY-MM`
    fn current_month(&self) -> String {
        self.today().format("%Y-%m").to_string()
    }
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    date: NaiveDate,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }
}

/// Record-level exclusion policy
///
/// Decides, from the free-text fields alone, whether a classified record is a
/// settlement entry (e.g. a credit-card bill payment) that must not count as
/// income or expense.
pub trait ExclusionPolicy: Send + Sync + Debug {
    fn is_excluded(&self, counterparty: &str, description: &str) -> bool;
}

/// Built-in settlement marker phrases
pub const DEFAULT_SETTLEMENT_MARKERS: &[&str] = &[
    "pagamento de fatura",
    "pagamento fatura",
    "pgto fatura",
    "pagamento recebido",
    "bill payment",
];

/// Case-insensitive substring match against a list of marker phrases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementMarkers {
    /// Lowercased marker phrases
    markers: Vec<String>,
}

impl SettlementMarkers {
    /// Create a policy from arbitrary marker phrases
    ///
    /// Blank markers are ignored so they cannot match every record.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let markers = markers
            .into_iter()
            .map(|m| m.as_ref().trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();

        Self { markers }
    }

    /// Policy that excludes nothing
    pub fn none() -> Self {
        Self {
            markers: Vec::new(),
        }
    }

    /// Add more marker phrases to the policy
    pub fn extend<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.markers.extend(Self::new(markers).markers);
        self
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}

impl Default for SettlementMarkers {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLEMENT_MARKERS)
    }
}

impl ExclusionPolicy for SettlementMarkers {
    fn is_excluded(&self, counterparty: &str, description: &str) -> bool {
        if self.markers.is_empty() {
            return false;
        }

        let counterparty = counterparty.to_lowercase();
        let description = description.to_lowercase();

        self.markers
            .iter()
            .any(|m| counterparty.contains(m.as_str()) || description.contains(m.as_str()))
    }
}
