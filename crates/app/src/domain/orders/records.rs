//! Order Records

use std::fmt;

use cadence::{checkout::PaymentMethod, pricing::ShippingOption};
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::{RecordId, Stored, Table, TableRecord};

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,

    #[serde(default)]
    pub billing_address: Option<String>,

    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_cost: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub tax_amount: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,

    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub shipping_option: ShippingOption,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl TableRecord for OrderRecord {
    const TABLE: Table = Table::Orders;
}

/// Order Item Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRecord {
    pub order_id: RecordId,
    pub product_id: RecordId,
    pub quantity: u32,

    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

impl TableRecord for OrderItemRecord {
    const TABLE: Table = Table::OrderItems;
}

/// An order together with its line items.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub order: Stored<OrderRecord>,
    pub items: Vec<Stored<OrderItemRecord>>,
}
