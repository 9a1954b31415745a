//! Checkout Schema
//!
//! Field names, the rules each field must satisfy, and the two schema
//! variants: the full form, and the reduced form used once an authenticated
//! customer supplies name, email and phone.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::{checkout::form::PaymentMethod, pricing::ShippingOption};

const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 100;
const ADDRESS_MAX: usize = 500;
const NOTES_MAX: usize = 500;

static EMAIL_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));

static PHONE_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[+]?[(]?[0-9]{1,4}[)]?[-\s./0-9]*$"));

/// Raised when a field name is not part of the checkout schema.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown checkout field {0:?}")]
pub struct UnknownField(pub String);

/// A checkout form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Customer name.
    CustomerName,
    /// Customer email.
    CustomerEmail,
    /// Customer phone.
    CustomerPhone,
    /// Delivery address.
    ShippingAddress,
    /// Billing address.
    BillingAddress,
    /// Payment method.
    PaymentMethod,
    /// Shipping option.
    ShippingOption,
    /// Notes.
    Notes,
}

impl Field {
    /// All schema fields, in form order.
    pub const ALL: [Field; 8] = [
        Self::CustomerName,
        Self::CustomerEmail,
        Self::CustomerPhone,
        Self::ShippingAddress,
        Self::BillingAddress,
        Self::PaymentMethod,
        Self::ShippingOption,
        Self::Notes,
    ];

    /// Key of the field in the form object.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CustomerName => "customer_name",
            Self::CustomerEmail => "customer_email",
            Self::CustomerPhone => "customer_phone",
            Self::ShippingAddress => "shipping_address",
            Self::BillingAddress => "billing_address",
            Self::PaymentMethod => "payment_method",
            Self::ShippingOption => "shipping_option",
            Self::Notes => "notes",
        }
    }

    /// Whether an authenticated identity supplies this field.
    #[must_use]
    pub const fn is_identity(self) -> bool {
        matches!(
            self,
            Self::CustomerName | Self::CustomerEmail | Self::CustomerPhone
        )
    }

    /// Check `value` (absent when `None`) against this field's rules.
    ///
    /// Returns the message of the first violated rule.
    #[must_use]
    pub fn check(self, value: Option<&Value>) -> Option<&'static str> {
        let value = value.filter(|value| !value.is_null());

        match self {
            Self::CustomerName => required_text(value, "Name is required")
                .or_else(|| max_chars(value, NAME_MAX, "Name must be at most 100 characters")),
            Self::CustomerEmail => required_text(value, "Email is required")
                .or_else(|| pattern(value, &EMAIL_PATTERN, "Enter a valid email address"))
                .or_else(|| max_chars(value, EMAIL_MAX, "Email must be at most 100 characters")),
            Self::CustomerPhone => required_present(value, "Phone is required")
                .or_else(|| pattern(value, &PHONE_PATTERN, "Enter a valid phone number")),
            Self::ShippingAddress => required_text(value, "Shipping address is required").or_else(
                || max_chars(value, ADDRESS_MAX, "Address must be at most 500 characters"),
            ),
            Self::BillingAddress => {
                max_chars(value, ADDRESS_MAX, "Address must be at most 500 characters")
            }
            Self::PaymentMethod => required_present(value, "Select a payment method").or_else(|| {
                rejects(value, |text| text.parse::<PaymentMethod>().is_ok())
                    .then_some("Select a valid payment method")
            }),
            Self::ShippingOption => required_present(value, "Select a shipping option").or_else(|| {
                rejects(value, |text| text.parse::<ShippingOption>().is_ok())
                    .then_some("Select a valid shipping option")
            }),
            Self::Notes => max_chars(value, NOTES_MAX, "Notes must be at most 500 characters"),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == value)
            .ok_or_else(|| UnknownField(value.to_string()))
    }
}

/// Which fields a form is validated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Schema {
    /// Every field; used for guest checkout.
    #[default]
    Full,

    /// Every field except name, email and phone, which an authenticated
    /// identity supplies as read-only values.
    Identified,
}

impl Schema {
    /// Whether `field` is validated under this schema.
    #[must_use]
    pub const fn includes(self, field: Field) -> bool {
        match self {
            Self::Full => true,
            Self::Identified => !field.is_identity(),
        }
    }

    /// Fields validated under this schema, in form order.
    pub fn fields(self) -> impl Iterator<Item = Field> {
        Field::ALL
            .into_iter()
            .filter(move |field| self.includes(*field))
    }
}

fn required_present(value: Option<&Value>, message: &'static str) -> Option<&'static str> {
    value.is_none().then_some(message)
}

fn required_text(value: Option<&Value>, message: &'static str) -> Option<&'static str> {
    match value {
        Some(Value::String(text)) if !text.trim().is_empty() => None,
        Some(Value::String(_)) | None => Some(message),
        Some(_) => Some("Must be text"),
    }
}

fn max_chars(value: Option<&Value>, max: usize, message: &'static str) -> Option<&'static str> {
    match value {
        Some(Value::String(text)) => (text.chars().count() > max).then_some(message),
        Some(_) => Some("Must be text"),
        None => None,
    }
}

/// A pattern that failed to compile rejects every value.
fn pattern(
    value: Option<&Value>,
    regex: &Result<Regex, regex::Error>,
    message: &'static str,
) -> Option<&'static str> {
    match (value, regex) {
        (None, _) => None,
        (Some(Value::String(text)), Ok(regex)) => (!regex.is_match(text.trim())).then_some(message),
        (Some(_), _) => Some(message),
    }
}

fn rejects(value: Option<&Value>, accepts: impl Fn(&str) -> bool) -> bool {
    !value.and_then(Value::as_str).is_some_and(accepts)
}
