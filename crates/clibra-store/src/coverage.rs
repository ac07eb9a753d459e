//! Gap analysis over stored partition dates.

use chrono::NaiveDate;
use clibra_types::DateRange;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Coverage of one (exchange, symbol) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Exchange identifier.
    pub exchange: String,
    /// Symbol.
    pub symbol: String,
    /// Earliest stored date.
    pub min_date: NaiveDate,
    /// Latest stored date.
    pub max_date: NaiveDate,
    /// Dates in `[min_date, max_date]` with no stored partition, ascending.
    pub missing_dates: Vec<NaiveDate>,
}

impl CoverageReport {
    /// Analyzes a set of stored dates. Returns `None` for an empty set.
    #[must_use]
    pub fn analyze(
        exchange: impl Into<String>,
        symbol: impl Into<String>,
        dates: &BTreeSet<NaiveDate>,
    ) -> Option<Self> {
        let min_date = *dates.first()?;
        let max_date = *dates.last()?;
        let missing_dates = DateRange::new(min_date, max_date)
            .ok()?
            .days()
            .filter(|day| !dates.contains(day))
            .collect();

        Some(Self {
            exchange: exchange.into(),
            symbol: symbol.into(),
            min_date,
            max_date,
            missing_dates,
        })
    }

    /// Returns the number of missing dates.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.missing_dates.len()
    }

    /// Returns the number of calendar days from `min_date` to `max_date` inclusive.
    #[must_use]
    pub fn span_days(&self) -> usize {
        usize::try_from((self.max_date - self.min_date).num_days() + 1).unwrap_or(0)
    }

    /// Returns the number of stored dates.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.span_days().saturating_sub(self.missing_count())
    }

    /// Returns true if no date in the span is missing.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.missing_dates.is_empty()
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} from {} to {}, {} missing dates",
            self.exchange,
            self.symbol,
            self.min_date,
            self.max_date,
            self.missing_count()
        )
    }
}
