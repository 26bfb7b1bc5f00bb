//! Type-safe price representation using decimal arithmetic.
//!
//! Cart rows store a bare [`Decimal`] unit price; [`Price`] pairs an amount
//! with its currency for arithmetic on totals and for display.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a price in the shop currency.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self {
            amount,
            currency_code: CurrencyCode::USD,
        }
    }

    /// Round to two decimal places, half away from zero.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            amount: self
                .amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            ..self
        }
    }

    /// Multiply by a rate (e.g., a tax rate of `0.08`), rounding to cents.
    ///
    /// Returns `None` if the product does not fit a [`Decimal`].
    #[must_use]
    pub fn scaled(self, rate: Decimal) -> Option<Self> {
        let amount = self.amount.checked_mul(rate)?;
        Some(Self { amount, ..self }.rounded())
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded();
        write!(f, "{}{:.2}", self.currency_code.symbol(), rounded.amount)
    }
}

/// ISO 4217 currency codes the shop prices in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::usd(Decimal::from(75)).to_string(), "$75.00");
        assert_eq!(Price::usd(Decimal::new(1999, 2)).to_string(), "$19.99");
    }

    #[test]
    fn test_scaled_rounds_to_cents() {
        // 80.00 * 0.08 = 6.40
        let tax = Price::usd(Decimal::from(80))
            .scaled(Decimal::new(8, 2))
            .unwrap();
        assert_eq!(tax.amount, Decimal::new(640, 2));

        // 12.345 rounds half away from zero
        let odd = Price::usd(Decimal::new(12345, 3)).rounded();
        assert_eq!(odd.amount, Decimal::new(1235, 2));
    }

    #[test]
    fn test_scaled_out_of_range() {
        assert!(Price::usd(Decimal::MAX).scaled(Decimal::from(2)).is_none());
    }

    #[test]
    fn test_is_negative() {
        assert!(Price::usd(Decimal::from(-1)).is_negative());
        assert!(!Price::usd(Decimal::ZERO).is_negative());
        assert!(!Price::usd(Decimal::from(3)).is_negative());
    }
}
