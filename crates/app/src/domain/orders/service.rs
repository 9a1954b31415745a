//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use serde_json::json;
use tracing::info;

use crate::{
    domain::orders::{
        errors::OrdersError,
        records::{OrderDetails, OrderItemRecord, OrderRecord, OrderStatus, PaymentStatus},
    },
    store::{
        Direction, Filter, RecordId, RecordStore, Stored,
        records::{create, fetch_all, fetch_one, patch, remove},
    },
};

#[derive(Clone)]
pub struct RecordOrdersService {
    store: Arc<dyn RecordStore>,
}

impl RecordOrdersService {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for RecordOrdersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordOrdersService").finish_non_exhaustive()
    }
}

#[async_trait]
impl OrdersService for RecordOrdersService {
    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Stored<OrderRecord>>, OrdersError> {
        let filter = match status {
            Some(status) => Filter::eq("status", status.as_str()),
            None => Filter::all(),
        }
        .order_by("id", Direction::Descending);

        Ok(fetch_all(self.store.as_ref(), &filter).await?)
    }

    async fn get_order(&self, order: RecordId) -> Result<OrderDetails, OrdersError> {
        let order = fetch_one::<OrderRecord>(self.store.as_ref(), order).await?;

        let items = fetch_all(
            self.store.as_ref(),
            &Filter::eq("order_id", order.id).order_by("id", Direction::Ascending),
        )
        .await?;

        Ok(OrderDetails { order, items })
    }

    async fn create_order(&self, mut order: OrderRecord) -> Result<Stored<OrderRecord>, OrdersError> {
        if order.created_at.is_none() {
            order.created_at = Some(Timestamp::now());
        }

        let created = create(self.store.as_ref(), &order).await?;

        info!(order = created.id, order_number = %created.order_number, "order created");

        Ok(created)
    }

    async fn create_item(
        &self,
        item: OrderItemRecord,
    ) -> Result<Stored<OrderItemRecord>, OrdersError> {
        Ok(create(self.store.as_ref(), &item).await?)
    }

    async fn delete_item(&self, item: RecordId) -> Result<(), OrdersError> {
        Ok(remove::<OrderItemRecord>(self.store.as_ref(), item).await?)
    }

    async fn delete_order(&self, order: RecordId) -> Result<(), OrdersError> {
        remove::<OrderRecord>(self.store.as_ref(), order).await?;

        info!(order, "order deleted");

        Ok(())
    }

    async fn update_status(
        &self,
        order: RecordId,
        status: OrderStatus,
    ) -> Result<Stored<OrderRecord>, OrdersError> {
        let updated = patch(self.store.as_ref(), order, json!({ "status": status })).await?;

        info!(order, %status, "order status updated");

        Ok(updated)
    }

    async fn update_payment_status(
        &self,
        order: RecordId,
        status: PaymentStatus,
    ) -> Result<Stored<OrderRecord>, OrdersError> {
        let updated =
            patch(self.store.as_ref(), order, json!({ "payment_status": status })).await?;

        info!(order, %status, "payment status updated");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Retrieves orders, newest first, optionally limited to one status.
    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Stored<OrderRecord>>, OrdersError>;

    /// Retrieve an order with its line items.
    async fn get_order(&self, order: RecordId) -> Result<OrderDetails, OrdersError>;

    /// Creates an order, stamping its creation time when unset.
    ///
    /// Returns [`OrdersError::AlreadyExists`] when the order number is taken.
    async fn create_order(&self, order: OrderRecord) -> Result<Stored<OrderRecord>, OrdersError>;

    /// Creates one order line item.
    async fn create_item(
        &self,
        item: OrderItemRecord,
    ) -> Result<Stored<OrderItemRecord>, OrdersError>;

    /// Deletes an order line item.
    async fn delete_item(&self, item: RecordId) -> Result<(), OrdersError>;

    /// Deletes an order row.
    async fn delete_order(&self, order: RecordId) -> Result<(), OrdersError>;

    /// Sets the fulfilment status of an order.
    async fn update_status(
        &self,
        order: RecordId,
        status: OrderStatus,
    ) -> Result<Stored<OrderRecord>, OrdersError>;

    /// Sets the payment status of an order.
    async fn update_payment_status(
        &self,
        order: RecordId,
        status: PaymentStatus,
    ) -> Result<Stored<OrderRecord>, OrdersError>;
}
