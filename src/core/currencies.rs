//! Display currencies.
//!
//! Amounts are only labelled with a symbol; no conversion is ever performed.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::totals::{OUT_OF_RANGE, format_amount};

/// The fixed set of currencies an invoice can be labelled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar.
    #[default]
    Usd,
    /// Euro.
    Eur,
    /// Kenyan Shilling.
    Kes,
    /// Pound Sterling.
    Gbp,
    /// Indian Rupee.
    Inr,
    /// Japanese Yen.
    Jpy,
}

impl Currency {
    /// Every selectable currency, in menu order.
    pub const ALL: [Currency; 6] = [
        Self::Usd,
        Self::Eur,
        Self::Kes,
        Self::Gbp,
        Self::Inr,
        Self::Jpy,
    ];

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Kes => "KES",
            Self::Gbp => "GBP",
            Self::Inr => "INR",
            Self::Jpy => "JPY",
        }
    }

    /// Display symbol used as amount prefix.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Kes => "ksh",
            Self::Gbp => "£",
            Self::Inr => "₹",
            Self::Jpy => "¥",
        }
    }

    /// Parse from ISO 4217 code. Only the enumerated codes are accepted.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "USD" => Some(Self::Usd),
            "EUR" => Some(Self::Eur),
            "KES" => Some(Self::Kes),
            "GBP" => Some(Self::Gbp),
            "INR" => Some(Self::Inr),
            "JPY" => Some(Self::Jpy),
            _ => None,
        }
    }

    /// Format `amount` to two fractional digits, prefixed with the symbol.
    ///
    /// ```
    /// use tabfaktura::core::Currency;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(Currency::Eur.label(dec!(19.5)), "€19.50");
    /// assert_eq!(Currency::Kes.label(dec!(19.5)), "ksh19.50");
    /// ```
    pub fn label(&self, amount: Decimal) -> String {
        format!("{}{}", self.symbol(), format_amount(amount))
    }

    /// [`label`](Self::label) for a checked amount; `None` shows as
    /// [`OUT_OF_RANGE`] with no symbol.
    pub fn label_checked(&self, amount: Option<Decimal>) -> String {
        amount.map_or_else(|| OUT_OF_RANGE.to_string(), |a| self.label(a))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.symbol())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s.trim()).ok_or_else(|| {
            ValidationError::new("currency", format!("unsupported currency code '{s}'"))
        })
    }
}
