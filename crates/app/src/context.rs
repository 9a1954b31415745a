//! App Context

use std::sync::Arc;

use cadence::checkout::CustomerIdentity;

use crate::{
    checkout::{CheckoutService, CheckoutSettings, Handoff},
    config::StoreBackend,
    domain::{
        catalog::{CatalogService, RecordCatalogService},
        orders::{OrdersService, RecordOrdersService},
        users::{RecordUsersService, UsersError, UsersService},
    },
    identity::{IdentityProvider, StaticIdentityProvider},
    storage::{InMemoryObjectStorage, ObjectStorage, RestObjectStorage},
    store::{InMemoryRecordStore, RecordStore, RestRecordStore},
};

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub orders: Arc<dyn OrdersService>,
    pub users: Arc<dyn UsersService>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context over the configured backend.
    #[must_use]
    pub fn from_backend(backend: StoreBackend, identity: Arc<dyn IdentityProvider>) -> Self {
        let (store, objects): (Arc<dyn RecordStore>, Arc<dyn ObjectStorage>) = match backend {
            StoreBackend::InMemory => (
                Arc::new(InMemoryRecordStore::new()),
                Arc::new(InMemoryObjectStorage::new()),
            ),
            StoreBackend::Rest { records, objects } => (
                Arc::new(RestRecordStore::new(records)),
                Arc::new(RestObjectStorage::new(objects)),
            ),
        };

        Self::from_store(store, objects, identity)
    }

    /// Build application context over an existing store.
    #[must_use]
    pub fn from_store(
        store: Arc<dyn RecordStore>,
        objects: Arc<dyn ObjectStorage>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            catalog: Arc::new(RecordCatalogService::new(store.clone(), objects)),
            orders: Arc::new(RecordOrdersService::new(store.clone())),
            users: Arc::new(RecordUsersService::new(store)),
            identity,
        }
    }

    /// Process-local context for a guest.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_backend(
            StoreBackend::InMemory,
            Arc::new(StaticIdentityProvider::guest()),
        )
    }

    /// Checkout service writing through this context's orders service.
    #[must_use]
    pub fn checkout(&self, handoff: Arc<dyn Handoff>, settings: CheckoutSettings) -> CheckoutService {
        CheckoutService::new(self.orders.clone(), handoff, settings)
    }

    /// Contact details for the signed-in customer.
    ///
    /// `None` for guests and for users whose profile lacks a name or phone.
    ///
    /// # Errors
    ///
    /// Returns a [`UsersError`] when the user row cannot be read.
    pub async fn customer_identity(&self) -> Result<Option<CustomerIdentity>, UsersError> {
        match self.identity.current_user().await {
            Some(identity) => self.users.customer_identity(&identity).await,
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use cadence::cart::{CartStore, MemoryStorage};
    use rust_decimal::Decimal;
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        checkout::{CheckoutRequest, LogHandoff},
        domain::{catalog::records::ProductRecord, users::records::{UserRecord, UserRole}},
    };

    use super::*;

    #[tokio::test]
    async fn guest_has_no_customer_identity() -> TestResult {
        assert_eq!(AppContext::in_memory().customer_identity().await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn signed_in_user_with_profile_has_identity() -> TestResult {
        let context = AppContext::from_store(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(InMemoryObjectStorage::new()),
            Arc::new(StaticIdentityProvider::signed_in("ana@example.com")),
        );

        context
            .users
            .create_user(UserRecord {
                email: "ana@example.com".to_string(),
                name: Some("Ana Vera".to_string()),
                phone: Some("0991234567".to_string()),
                role: UserRole::Customer,
            })
            .await?;

        let identity = context.customer_identity().await?.ok_or("no identity")?;

        assert_eq!(identity.name, "Ana Vera");

        Ok(())
    }

    #[tokio::test]
    async fn catalog_product_checks_out_into_orders() -> TestResult {
        let context = AppContext::in_memory();

        let product = context
            .catalog
            .create_product(ProductRecord {
                name: "Charango".to_string(),
                description: String::new(),
                category_id: None,
                vendor_id: None,
                stock: 2,
                selling_price: Decimal::new(18000, 2),
                purchase_price: None,
                image: None,
            })
            .await?;

        let mut cart = CartStore::load(MemoryStorage::new())?;

        cart.add_to_cart(context.catalog.line_item(product.id, 5).await?)?;

        assert_eq!(cart.item_count(), 2);

        let checkout = context.checkout(Arc::new(LogHandoff), CheckoutSettings::default());
        let request = CheckoutRequest {
            form: json!({
                "customer_name": "Ana Vera",
                "customer_email": "ana@example.com",
                "customer_phone": "0991234567",
                "shipping_address": "Av. Amazonas N34-12, Quito",
                "payment_method": "bank_transfer",
                "shipping_option": "standard",
            }),
            agreed_to_terms: true,
            identity: None,
        };

        let confirmation = checkout.submit(&mut cart, &request).await?;
        let orders = context.orders.list_orders(None).await?;

        assert_eq!(orders.len(), 1);
        assert_eq!(orders.first().map(|order| order.id), Some(confirmation.order_id));
        assert!(cart.is_empty());

        Ok(())
    }
}
