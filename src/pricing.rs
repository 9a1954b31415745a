//! Pricing
//!
//! Derives subtotal, shipping, tax and grand total from a cart total and a
//! shipping choice. All arithmetic is exact [`Decimal`]; rounding to two
//! places happens only when amounts are displayed or persisted.

use std::{fmt, str::FromStr};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while pricing or formatting amounts.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The tax rate could not be parsed.
    #[error("invalid tax rate {0:?}")]
    InvalidTaxRate(String),

    /// The shipping option is not one the store offers.
    #[error("unknown shipping option {0:?}")]
    UnknownShippingOption(String),

    /// An amount does not fit in minor units.
    #[error("amount {0} cannot be represented in minor units")]
    AmountOutOfRange(Decimal),
}

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingOption {
    /// Regular delivery.
    #[default]
    Standard,

    /// Expedited delivery.
    Express,

    /// Collected in store.
    Pickup,
}

impl ShippingOption {
    /// Every option the checkout form offers.
    pub const ALL: [ShippingOption; 3] = [Self::Standard, Self::Express, Self::Pickup];

    /// Wire name, as stored and submitted by the form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Pickup => "pickup",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard delivery",
            Self::Express => "Express delivery",
            Self::Pickup => "Store pickup",
        }
    }

    /// Shipping cost for this option.
    #[must_use]
    pub const fn cost(self) -> Decimal {
        match self {
            Self::Express => Decimal::from_parts(500, 0, 0, false, 2),
            Self::Standard | Self::Pickup => Decimal::ZERO,
        }
    }
}

impl fmt::Display for ShippingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippingOption {
    type Err = PricingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.as_str() == value)
            .ok_or_else(|| PricingError::UnknownShippingOption(value.to_string()))
    }
}

/// Sales tax rate applied to the subtotal.
#[derive(Debug, Clone, Copy)]
pub struct TaxRate(Percentage);

impl TaxRate {
    /// Create a tax rate from a fraction, e.g. `0.15` for 15%.
    #[must_use]
    pub fn from_fraction(fraction: Decimal) -> Self {
        Self(Percentage::from(fraction))
    }

    /// Tax owed on `amount`.
    #[must_use]
    pub fn apply(&self, amount: Decimal) -> Decimal {
        self.0 * amount
    }

    /// The rate as a fraction.
    #[must_use]
    pub fn fraction(&self) -> Decimal {
        self.0 * Decimal::ONE
    }
}

impl Default for TaxRate {
    /// 15%.
    fn default() -> Self {
        Self::from_fraction(Decimal::new(15, 2))
    }
}

impl FromStr for TaxRate {
    type Err = PricingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let fraction = Decimal::from_str(value.trim())
            .map_err(|error| PricingError::InvalidTaxRate(format!("{value}: {error}")))?;

        if fraction.is_sign_negative() || fraction > Decimal::ONE {
            return Err(PricingError::InvalidTaxRate(value.to_string()));
        }

        Ok(Self::from_fraction(fraction))
    }
}

/// Money amounts for a cart under a shipping choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Sum of line totals.
    pub subtotal: Decimal,

    /// Shipping cost.
    pub shipping: Decimal,

    /// Tax on the subtotal.
    pub tax: Decimal,

    /// `subtotal + shipping + tax`.
    pub total: Decimal,
}

impl Quote {
    /// Price a cart subtotal.
    #[must_use]
    pub fn calculate(subtotal: Decimal, shipping: ShippingOption, tax_rate: TaxRate) -> Self {
        let shipping = shipping.cost();
        let tax = tax_rate.apply(subtotal);

        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// The quote with every amount rounded to cents.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round_cents(self.subtotal),
            shipping: round_cents(self.shipping),
            tax: round_cents(self.tax),
            total: round_cents(self.total),
        }
    }
}

/// Round to two decimal places, halves away from zero.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an amount to USD money, rounding to cents.
///
/// # Errors
///
/// Returns [`PricingError::AmountOutOfRange`] if the amount overflows minor units.
pub fn to_money(amount: Decimal) -> Result<Money<'static, iso::Currency>, PricingError> {
    let minor = (round_cents(amount) * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or(PricingError::AmountOutOfRange(amount))?;

    Ok(Money::from_minor(minor, iso::USD))
}

/// Format an amount for display, e.g. `$56.75`.
///
/// # Errors
///
/// Returns [`PricingError::AmountOutOfRange`] if the amount overflows minor units.
pub fn display_amount(amount: Decimal) -> Result<String, PricingError> {
    Ok(to_money(amount)?.to_string())
}
