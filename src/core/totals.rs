//! Per-row and grand totals.
//!
//! All arithmetic uses [`Decimal`]. Row products are kept unrounded and the
//! grand total is accumulated left to right in row order, then rounded once.
//! An amount that does not fit in a [`Decimal`] is never replaced by a
//! partial value: it is reported as `None` and displayed as [`OUT_OF_RANGE`].

use std::str::FromStr;

use log::warn;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;

use super::rows::Row;

/// Default key of the designated quantity column.
pub const QUANTITY_KEY: &str = "quantity";
/// Default key of the designated unit-price column.
pub const PRICE_KEY: &str = "price";
/// Shown instead of an amount that exceeds the supported range.
pub const OUT_OF_RANGE: &str = "out of range";

/// Why a cell value could not be read as an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("not a number")]
    Invalid,
    #[error("number exceeds the supported range")]
    OutOfRange,
}

/// Parse a raw cell value, telling unparsable text apart from numbers too
/// large to represent.
///
/// Blank input is zero. Surrounding whitespace, a leading `+`/`-` and
/// scientific notation (`1.5e2`) are accepted; digit grouping (`1,000`,
/// `1_000`) is not.
pub fn try_parse_amount(raw: &str) -> Result<Decimal, AmountError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let well_formed = raw
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'e' | b'E'));
    if !well_formed {
        return Err(AmountError::Invalid);
    }
    if let Ok(value) = Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) {
        return Ok(value);
    }
    // numeric, but beyond Decimal's scale or magnitude
    let approx: f64 = raw.parse().map_err(|_| AmountError::Invalid)?;
    Decimal::from_f64(approx).ok_or(AmountError::OutOfRange)
}

/// Parse a raw cell value as a decimal number.
///
/// Blank, missing or unparsable input yields zero, and so does a number too
/// large to represent; use [`try_parse_amount`] to tell those apart.
pub fn parse_amount(raw: &str) -> Decimal {
    try_parse_amount(raw).unwrap_or(Decimal::ZERO)
}

/// Round half away from zero to two places. Negative zero collapses to zero.
pub fn round_amount(value: Decimal) -> Decimal {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Format with exactly two fractional digits.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round_amount(value))
}

/// Computed totals for a set of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Unrounded `quantity * price` per row, in row order. `None` where the
    /// product or one of its inputs is out of range.
    pub row_totals: Vec<Option<Decimal>>,
    /// Unrounded sum of `row_totals`. `None` if any row is out of range or
    /// the sum itself overflows.
    pub grand_total: Option<Decimal>,
}

impl Totals {
    /// Row total at `index`, formatted to two places.
    pub fn row_display(&self, index: usize) -> Option<String> {
        self.row_totals.get(index).map(|t| display_amount(*t))
    }

    /// Grand total formatted to two places.
    pub fn grand_display(&self) -> String {
        display_amount(self.grand_total)
    }

    /// Index of the first row whose amount is out of range.
    pub fn first_out_of_range(&self) -> Option<usize> {
        self.row_totals.iter().position(Option::is_none)
    }
}

/// [`format_amount`], or [`OUT_OF_RANGE`] for a missing amount.
pub fn display_amount(value: Option<Decimal>) -> String {
    value.map_or_else(|| OUT_OF_RANGE.to_string(), format_amount)
}

/// Derives totals from the designated quantity and price columns.
///
/// If either designated column is absent from a row, that row totals zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalCalculator {
    quantity_key: String,
    price_key: String,
}

impl Default for TotalCalculator {
    fn default() -> Self {
        Self::new(QUANTITY_KEY, PRICE_KEY)
    }
}

impl TotalCalculator {
    pub fn new(quantity_key: impl Into<String>, price_key: impl Into<String>) -> Self {
        Self {
            quantity_key: quantity_key.into(),
            price_key: price_key.into(),
        }
    }

    pub fn quantity_key(&self) -> &str {
        &self.quantity_key
    }

    pub fn price_key(&self) -> &str {
        &self.price_key
    }

    /// Unrounded `quantity * price` for one row, `None` when out of range.
    ///
    /// Unparsable inputs count as zero.
    pub fn row_amount(&self, row: &Row) -> Option<Decimal> {
        let quantity = Self::cell(row, &self.quantity_key)?;
        let price = Self::cell(row, &self.price_key)?;
        let amount = quantity.checked_mul(price);
        if amount.is_none() {
            warn!("row total overflow ({quantity} * {price})");
        }
        amount
    }

    fn cell(row: &Row, key: &str) -> Option<Decimal> {
        let raw = row.value_or_empty(key);
        match try_parse_amount(raw) {
            Ok(value) => Some(value),
            Err(AmountError::Invalid) => Some(Decimal::ZERO),
            Err(AmountError::OutOfRange) => {
                warn!("'{key}' value {raw:?} is out of range");
                None
            }
        }
    }

    /// Row total formatted to exactly two fractional digits.
    ///
    /// ```
    /// use tabfaktura::core::{Row, TotalCalculator};
    ///
    /// let row: Row = [("quantity", "3"), ("price", "2.5")].into_iter().collect();
    /// assert_eq!(TotalCalculator::default().row_total(&row), "7.50");
    /// ```
    pub fn row_total(&self, row: &Row) -> String {
        display_amount(self.row_amount(row))
    }

    /// Grand total over `rows`, formatted to exactly two fractional digits.
    pub fn grand_total<'a>(&self, rows: impl IntoIterator<Item = &'a Row>) -> String {
        self.totals(rows).grand_display()
    }

    /// Row amounts and their left-to-right sum.
    pub fn totals<'a>(&self, rows: impl IntoIterator<Item = &'a Row>) -> Totals {
        let row_totals: Vec<Option<Decimal>> =
            rows.into_iter().map(|r| self.row_amount(r)).collect();
        let mut grand_total = Some(Decimal::ZERO);
        for amount in &row_totals {
            grand_total = grand_total.zip(*amount).and_then(|(sum, a)| sum.checked_add(a));
            if grand_total.is_none() {
                if amount.is_some() {
                    warn!("grand total out of range");
                }
                break;
            }
        }
        Totals {
            row_totals,
            grand_total,
        }
    }
}
