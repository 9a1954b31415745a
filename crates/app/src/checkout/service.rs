//! Checkout service.
//!
//! Places an order in three steps: the order row, then every line item
//! concurrently, then the cart clear and WhatsApp hand-off. Item failures
//! revert whatever was written so the customer can retry from an intact cart.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use cadence::{
    cart::{CartLineItem, CartStore, KeyValueStorage},
    checkout::{CheckoutFormData, CheckoutValidator, CustomerIdentity, Schema, ValidCheckout},
    pricing::{Quote, ShippingOption, TaxRate, round_cents},
};
use futures::future::join_all;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::{
    checkout::{
        errors::CheckoutError,
        handoff::Handoff,
        order_number::OrderNumber,
        summary::{compose, whatsapp_url},
    },
    domain::orders::{
        OrdersError, OrdersService,
        records::{OrderItemRecord, OrderRecord, OrderStatus, PaymentStatus},
    },
    store::{RecordId, Stored},
};

/// Checkout tunables.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Tax applied to the subtotal.
    pub tax_rate: TaxRate,

    /// Shop WhatsApp number for the hand-off; no hand-off when unset.
    pub whatsapp_number: Option<String>,

    /// How many order numbers to try before giving up on collisions.
    pub order_number_attempts: u32,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            tax_rate: TaxRate::default(),
            whatsapp_number: None,
            order_number_attempts: 3,
        }
    }
}

/// One press of the "place order" button.
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    /// Raw form object as submitted.
    pub form: Value,

    /// The "agree to terms" checkbox.
    pub agreed_to_terms: bool,

    /// Contact details of the signed-in customer, if any.
    pub identity: Option<CustomerIdentity>,
}

impl CheckoutRequest {
    #[must_use]
    pub fn from_form(form: &CheckoutFormData, agreed_to_terms: bool) -> Self {
        Self {
            form: form.to_value(),
            agreed_to_terms,
            identity: None,
        }
    }

    #[must_use]
    pub fn with_identity(mut self, identity: Option<CustomerIdentity>) -> Self {
        self.identity = identity;
        self
    }
}

/// A placed order.
#[derive(Debug, Clone)]
pub struct OrderConfirmation {
    pub order_id: RecordId,
    pub order_number: OrderNumber,
    pub quote: Quote,
    pub summary: Option<String>,
    pub whatsapp_url: Option<Url>,
}

#[derive(Debug, Clone, Copy)]
enum SubmissionStage {
    OrderCreated(RecordId),
    ItemCreated(RecordId),
}

struct Submitting<'a>(&'a AtomicBool);

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct CheckoutService {
    orders: Arc<dyn OrdersService>,
    handoff: Arc<dyn Handoff>,
    settings: CheckoutSettings,
    submitting: AtomicBool,
}

impl std::fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutService")
            .field("settings", &self.settings)
            .field("submitting", &self.submitting)
            .finish_non_exhaustive()
    }
}

impl CheckoutService {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersService>,
        handoff: Arc<dyn Handoff>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            orders,
            handoff,
            settings,
            submitting: AtomicBool::new(false),
        }
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Quote for the cart under the configured tax rate.
    #[must_use]
    pub fn quote<S: KeyValueStorage>(
        &self,
        cart: &CartStore<S>,
        shipping: ShippingOption,
    ) -> Quote {
        Quote::calculate(cart.total(), shipping, self.settings.tax_rate)
    }

    /// Place an order for the cart.
    ///
    /// Nothing is written unless the form validates, the terms are accepted
    /// and the cart has items, each within `[1, stock]`. On success the cart
    /// is cleared.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`]; [`CheckoutError::user_message`] gives the
    /// text to show the customer.
    #[tracing::instrument(skip_all, fields(items = cart.len()))]
    pub async fn submit<S: KeyValueStorage>(
        &self,
        cart: &mut CartStore<S>,
        request: &CheckoutRequest,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let _submitting = self.begin()?;

        let checkout = precondition(cart, request)?;
        let items = cart.items().to_vec();
        let quote = self.quote(cart, checkout.shipping_option);

        let (order, order_number) = self.create_order(&checkout, &quote).await?;

        self.create_items(order.id, &items).await?;

        if let Err(error) = cart.clear_cart() {
            error!(%error, order = order.id, "order placed but the cart could not be cleared");
        }

        let summary = compose(&order_number, &checkout, &items, &quote)
            .inspect_err(|error| warn!(%error, "failed to compose order summary"))
            .ok();

        let whatsapp_url = self
            .settings
            .whatsapp_number
            .as_deref()
            .zip(summary.as_deref())
            .and_then(|(number, text)| whatsapp_url(number, text));

        if let Some(url) = &whatsapp_url
            && let Err(error) = self.handoff.open(url).await
        {
            warn!(%error, "whatsapp hand-off failed");
        }

        info!(order = order.id, %order_number, "order placed");

        Ok(OrderConfirmation {
            order_id: order.id,
            order_number,
            quote,
            summary,
            whatsapp_url,
        })
    }

    fn begin(&self) -> Result<Submitting<'_>, CheckoutError> {
        if self.submitting.swap(true, Ordering::AcqRel) {
            return Err(CheckoutError::InProgress);
        }

        Ok(Submitting(&self.submitting))
    }

    async fn create_order(
        &self,
        checkout: &ValidCheckout,
        quote: &Quote,
    ) -> Result<(Stored<OrderRecord>, OrderNumber), CheckoutError> {
        let attempts = self.settings.order_number_attempts.max(1);

        for attempt in 1..=attempts {
            let order_number = OrderNumber::today();

            match self
                .orders
                .create_order(order_record(&order_number, checkout, quote))
                .await
            {
                Ok(order) => return Ok((order, order_number)),
                Err(OrdersError::AlreadyExists) => {
                    warn!(attempt, %order_number, "order number already taken");
                }
                Err(error) => {
                    error!(%error, "order creation failed");

                    return Err(CheckoutError::OrderFailed(error));
                }
            }
        }

        Err(CheckoutError::OrderNumberExhausted { attempts })
    }

    async fn create_items(
        &self,
        order_id: RecordId,
        items: &[CartLineItem],
    ) -> Result<(), CheckoutError> {
        let results = join_all(items.iter().map(|item| {
            self.orders.create_item(OrderItemRecord {
                order_id,
                product_id: item.id,
                quantity: item.quantity,
                unit_price: round_cents(item.selling_price),
            })
        }))
        .await;

        let total = results.len();
        let mut log = vec![SubmissionStage::OrderCreated(order_id)];
        let mut failed = 0;

        for (item, result) in items.iter().zip(results) {
            match result {
                Ok(created) => log.push(SubmissionStage::ItemCreated(created.id)),
                Err(error) => {
                    failed += 1;

                    warn!(%error, product = item.id, "order item failed to save");
                }
            }
        }

        if failed == 0 {
            return Ok(());
        }

        let rolled_back = self.revert(log).await;

        Err(CheckoutError::ItemsFailed {
            failed,
            total,
            rolled_back,
        })
    }

    async fn revert(&self, log: Vec<SubmissionStage>) -> bool {
        let mut rolled_back = true;

        for stage in log.into_iter().rev() {
            debug!(?stage, "reverting");

            let result = match stage {
                SubmissionStage::ItemCreated(item) => self.orders.delete_item(item).await,
                SubmissionStage::OrderCreated(order) => self.orders.delete_order(order).await,
            };

            if let Err(error) = result {
                error!(%error, ?stage, "failed to revert submission stage");

                rolled_back = false;
            }
        }

        rolled_back
    }
}

fn precondition<S: KeyValueStorage>(
    cart: &CartStore<S>,
    request: &CheckoutRequest,
) -> Result<ValidCheckout, CheckoutError> {
    let schema = match request.identity {
        Some(_) => Schema::Identified,
        None => Schema::Full,
    };

    let mut checkout = CheckoutValidator::new(schema)
        .validate(&request.form)
        .map_err(CheckoutError::Incomplete)?;

    if !request.agreed_to_terms {
        return Err(CheckoutError::TermsNotAccepted);
    }

    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    if let Some(item) = cart
        .items()
        .iter()
        .find(|item| !(1..=item.stock).contains(&item.quantity))
    {
        return Err(CheckoutError::InvalidCart {
            product_id: item.id,
            quantity: item.quantity,
            stock: item.stock,
        });
    }

    if let Some(identity) = &request.identity {
        checkout.customer_name.clone_from(&identity.name);
        checkout.customer_email.clone_from(&identity.email);
        checkout.customer_phone.clone_from(&identity.phone);
    }

    Ok(checkout)
}

fn order_record(order_number: &OrderNumber, checkout: &ValidCheckout, quote: &Quote) -> OrderRecord {
    let quote = quote.rounded();

    OrderRecord {
        order_number: order_number.to_string(),
        customer_name: checkout.customer_name.clone(),
        customer_email: checkout.customer_email.clone(),
        customer_phone: checkout.customer_phone.clone(),
        shipping_address: checkout.shipping_address.clone(),
        billing_address: checkout.billing_address.clone(),
        subtotal: quote.subtotal,
        shipping_cost: quote.shipping,
        tax_amount: quote.tax,
        total_amount: quote.total,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        payment_method: checkout.payment_method,
        shipping_option: checkout.shipping_option,
        notes: checkout.notes.clone(),
        created_at: None,
    }
}
