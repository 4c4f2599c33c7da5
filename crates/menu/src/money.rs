//! Integer money in minor units.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency code used when none is configured.
pub const DEFAULT_CURRENCY: &str = "INR";

/// An amount in the currency's minor unit (paise, cents). Never negative, never floating point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in minor units
    #[serde(rename = "amount")]
    pub amount_minor_units: u64,
    /// ISO 4217 code
    #[serde(rename = "currency")]
    pub currency_code: String,
}

impl Money {
    /// Creates an amount.
    pub fn new(amount_minor_units: u64, currency_code: impl Into<String>) -> Self {
        Self {
            amount_minor_units,
            currency_code: currency_code.into(),
        }
    }

    /// Indian rupees, in paise.
    pub fn inr(paise: u64) -> Self {
        Self::new(paise, DEFAULT_CURRENCY)
    }

    /// Zero in `currency_code`.
    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new(0, currency_code)
    }

    /// Whether both amounts share a currency.
    pub fn same_currency(&self, other: &Money) -> bool {
        self.currency_code == other.currency_code
    }

    /// `self * factor`, or `None` on overflow.
    pub fn checked_mul(&self, factor: u64) -> Option<Money> {
        self.amount_minor_units
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency_code.clone()))
    }

    /// Sum of two same-currency amounts; `None` on currency mismatch or overflow.
    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        if !self.same_currency(other) {
            return None;
        }
        self.amount_minor_units
            .checked_add(other.amount_minor_units)
            .map(|amount| Money::new(amount, self.currency_code.clone()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_money(self))
    }
}

/// Renders an amount for display.
///
/// INR is shown in whole rupees (half up) with Indian digit grouping,
/// `₹1,23,457`; any other currency as `USD 12.34`.
pub fn format_money(money: &Money) -> String {
    if money.currency_code == DEFAULT_CURRENCY {
        let rupees = money.amount_minor_units / 100 + u64::from(money.amount_minor_units % 100 >= 50);
        format!("₹{}", group_indian(rupees))
    } else {
        format!(
            "{} {}.{:02}",
            money.currency_code,
            money.amount_minor_units / 100,
            money.amount_minor_units % 100
        )
    }
}

/// Last three digits, then groups of two: 12345678 -> 1,23,45,678.
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}
