//! Checkout Form Data

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::pricing::ShippingOption;

/// Raised when a payment method name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method {0:?}")]
pub struct UnknownPaymentMethod(pub String);

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Direct bank transfer.
    BankTransfer,

    /// Pay the courier on delivery.
    CashOnDelivery,

    /// Card payment.
    CreditCard,

    /// Order arranged over WhatsApp.
    #[default]
    WhatsappOrder,
}

impl PaymentMethod {
    /// Every method the checkout form offers.
    pub const ALL: [PaymentMethod; 4] = [
        Self::BankTransfer,
        Self::CashOnDelivery,
        Self::CreditCard,
        Self::WhatsappOrder,
    ];

    /// Wire name, as stored and submitted by the form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BankTransfer => "bank_transfer",
            Self::CashOnDelivery => "cash_on_delivery",
            Self::CreditCard => "credit_card",
            Self::WhatsappOrder => "whatsapp_order",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BankTransfer => "Bank transfer",
            Self::CashOnDelivery => "Cash on delivery",
            Self::CreditCard => "Credit card",
            Self::WhatsappOrder => "WhatsApp order",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == value)
            .ok_or_else(|| UnknownPaymentMethod(value.to_string()))
    }
}

/// Contact details supplied by an authenticated customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerIdentity {
    /// Full name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Phone number.
    pub phone: String,
}

/// Checkout form input state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutFormData {
    /// Customer name.
    pub customer_name: String,

    /// Customer email.
    pub customer_email: String,

    /// Customer phone.
    pub customer_phone: String,

    /// Delivery address.
    pub shipping_address: String,

    /// Billing address, when it differs from shipping.
    pub billing_address: Option<String>,

    /// Bill to the shipping address.
    pub same_as_shipping: bool,

    /// Chosen payment method.
    pub payment_method: PaymentMethod,

    /// Chosen shipping option.
    pub shipping_option: ShippingOption,

    /// Free-form notes.
    pub notes: Option<String>,
}

impl CheckoutFormData {
    /// An empty form.
    #[must_use]
    pub fn new() -> Self {
        Self {
            same_as_shipping: true,
            ..Self::default()
        }
    }

    /// A form pre-filled from an authenticated customer.
    #[must_use]
    pub fn for_identity(identity: &CustomerIdentity) -> Self {
        Self {
            customer_name: identity.name.clone(),
            customer_email: identity.email.clone(),
            customer_phone: identity.phone.clone(),
            ..Self::new()
        }
    }

    /// The form as the JSON object the validator checks.
    ///
    /// Optional fields left blank are omitted, as an untouched input would be.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut value = json!({
            "customer_name": self.customer_name,
            "customer_email": self.customer_email,
            "customer_phone": self.customer_phone,
            "shipping_address": self.shipping_address,
            "same_as_shipping": self.same_as_shipping,
            "payment_method": self.payment_method.as_str(),
            "shipping_option": self.shipping_option.as_str(),
        });

        if let Some(object) = value.as_object_mut() {
            for (key, optional) in [("billing_address", &self.billing_address), ("notes", &self.notes)] {
                if let Some(text) = optional.as_deref().filter(|text| !text.trim().is_empty()) {
                    object.insert(key.to_string(), Value::from(text));
                }
            }
        }

        value
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn payment_method_parses_wire_names() -> TestResult {
        for method in PaymentMethod::ALL {
            assert_eq!(method.as_str().parse::<PaymentMethod>()?, method);
        }

        assert_eq!(
            "cheque".parse::<PaymentMethod>(),
            Err(UnknownPaymentMethod("cheque".to_string()))
        );

        Ok(())
    }

    #[test]
    fn payment_method_serialises_snake_case() -> TestResult {
        assert_eq!(
            serde_json::to_value(PaymentMethod::CashOnDelivery)?,
            Value::from("cash_on_delivery")
        );

        Ok(())
    }

    #[test]
    fn for_identity_prefills_contact_fields() {
        let form = CheckoutFormData::for_identity(&CustomerIdentity {
            name: "Ana Vera".to_string(),
            email: "ana@example.com".to_string(),
            phone: "+593 99 123 4567".to_string(),
        });

        assert_eq!(form.customer_name, "Ana Vera");
        assert_eq!(form.customer_email, "ana@example.com");
        assert_eq!(form.customer_phone, "+593 99 123 4567");
        assert!(form.same_as_shipping);
        assert!(form.shipping_address.is_empty());
    }

    #[test]
    fn to_value_omits_blank_optionals() {
        let form = CheckoutFormData {
            billing_address: Some("   ".to_string()),
            notes: Some("Leave at the door".to_string()),
            ..CheckoutFormData::new()
        };

        let value = form.to_value();

        assert!(value.get("billing_address").is_none());
        assert_eq!(value.get("notes"), Some(&Value::from("Leave at the door")));
        assert_eq!(value.get("shipping_option"), Some(&Value::from("standard")));
    }
}
