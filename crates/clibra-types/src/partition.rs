//! Partition identity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ClibraError;

/// Identifies one stored day of 1-second candles.
///
/// Exchange and symbol become directory names, so both are checked to be
/// single, visible path components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartitionKey {
    exchange: String,
    symbol: String,
    date: NaiveDate,
}

impl PartitionKey {
    /// Creates a key. The exchange identifier is lowercased; the symbol is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ClibraError::UnsupportedExchange`] or
    /// [`ClibraError::InvalidSymbol`] if either name is not a plain path
    /// component (see [`validate_symbol`]).
    pub fn new(
        exchange: impl AsRef<str>,
        symbol: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self, ClibraError> {
        let exchange = normalize_exchange(exchange.as_ref());
        if !is_plain_component(&exchange) {
            return Err(ClibraError::UnsupportedExchange(exchange));
        }
        let symbol = symbol.into();
        validate_symbol(&symbol)?;
        Ok(Self {
            exchange,
            symbol,
            date,
        })
    }

    /// Returns the (lowercase) exchange identifier.
    #[must_use]
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Returns the symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the same exchange and symbol on another date.
    #[must_use]
    pub fn with_date(&self, date: NaiveDate) -> Self {
        Self {
            exchange: self.exchange.clone(),
            symbol: self.symbol.clone(),
            date,
        }
    }
}

/// Checks that a symbol can name a store directory.
///
/// Rejects empty symbols, names starting with `.` (which covers `.` and
/// `..` and would be hidden from listings), and names containing a path
/// separator or NUL.
///
/// # Errors
///
/// Returns [`ClibraError::InvalidSymbol`].
pub fn validate_symbol(symbol: &str) -> Result<(), ClibraError> {
    if is_plain_component(symbol) {
        Ok(())
    } else {
        Err(ClibraError::InvalidSymbol(symbol.to_string()))
    }
}

fn is_plain_component(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
        && name.trim() == name
}

impl std::fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.exchange, self.symbol, self.date)
    }
}

/// Normalizes an exchange identifier (trimmed, lowercase).
#[must_use]
pub fn normalize_exchange(exchange: &str) -> String {
    exchange.trim().to_lowercase()
}
