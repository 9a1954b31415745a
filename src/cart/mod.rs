//! Cart
//!
//! The client's in-progress cart. Every mutation mirrors the full collection
//! into a [`KeyValueStorage`] under [`CART_STORAGE_KEY`], so a reload restores
//! the exact prior state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod storage;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "cart";

/// Product identifier, as issued by the record store.
pub type ProductId = i64;

/// Errors raised by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The persisted cart could not be written or read.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The persisted cart document is not a valid cart.
    #[error("persisted cart is corrupt")]
    Corrupt(#[source] serde_json::Error),

    /// The cart could not be serialised.
    #[error("failed to serialise cart")]
    Serialise(#[source] serde_json::Error),

    /// No line item exists for the product.
    #[error("product {0} is not in the cart")]
    ItemNotFound(ProductId),

    /// A quantity step would leave the line item outside `[1, stock]`.
    #[error("quantity {requested} for product {product_id} is outside 1..={stock}")]
    QuantityOutOfRange {
        /// Product of the rejected line item.
        product_id: ProductId,
        /// Quantity the step would have produced.
        requested: u32,
        /// Available stock for the product.
        stock: u32,
    },
}

/// One product quantity in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product identifier; unique within a cart.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Product description.
    #[serde(default)]
    pub description: String,

    /// Available stock.
    pub stock: u32,

    /// Image reference, may be empty.
    #[serde(default)]
    pub image: String,

    /// Unit selling price.
    #[serde(with = "rust_decimal::serde::float")]
    pub selling_price: Decimal,

    /// Requested quantity.
    pub quantity: u32,
}

impl CartLineItem {
    /// Line total: `quantity * selling_price`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.selling_price * Decimal::from(self.quantity)
    }

    /// Clamp a requested quantity into `[1, stock]`.
    ///
    /// Callers clamp before [`CartStore::add_to_cart`]; the store itself does not.
    #[must_use]
    pub fn clamped_quantity(&self, requested: u32) -> u32 {
        requested.clamp(1, self.stock.max(1))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedCart {
    items: Vec<CartLineItem>,
}

#[derive(Serialize)]
struct PersistedCartRef<'a> {
    items: &'a [CartLineItem],
}

/// Cart store: the single owner of the cart's line items.
#[derive(Debug)]
pub struct CartStore<S: KeyValueStorage> {
    items: Vec<CartLineItem>,
    storage: S,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Restore the cart persisted in `storage`, or start empty when none is stored.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the storage cannot be read or holds a corrupt document.
    pub fn load(storage: S) -> Result<Self, CartError> {
        let items = match storage.get(CART_STORAGE_KEY)? {
            Some(document) => {
                serde_json::from_str::<PersistedCart>(&document)
                    .map_err(CartError::Corrupt)?
                    .items
            }
            None => Vec::new(),
        };

        Ok(Self { items, storage })
    }

    /// Add a line item, merging into an existing entry for the same product.
    ///
    /// No stock re-validation happens here.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart cannot be persisted.
    pub fn add_to_cart(&mut self, item: CartLineItem) -> Result<(), CartError> {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }

        self.persist()
    }

    /// Replace the quantity of the matching line item. Unknown products are ignored.
    ///
    /// Does not clamp; keeping quantities within `[1, stock]` is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart cannot be persisted.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> Result<(), CartError> {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product_id) {
            item.quantity = quantity;
        }

        self.persist()
    }

    /// Add a line item, clamping the merged quantity into `[1, stock]`.
    ///
    /// The incoming item's stock is taken as current. Returns the resulting
    /// quantity of the line.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart cannot be persisted.
    pub fn add_within_stock(&mut self, mut item: CartLineItem) -> Result<u32, CartError> {
        let merged = self
            .get(item.id)
            .map_or(item.quantity, |existing| existing.quantity.saturating_add(item.quantity));

        item.quantity = item.clamped_quantity(merged);

        let quantity = item.quantity;

        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }

        self.persist()?;

        Ok(quantity)
    }

    /// Set a line item's quantity, refusing values outside `[1, stock]`.
    ///
    /// # Errors
    ///
    /// - [`CartError::ItemNotFound`]: the product is not in the cart.
    /// - [`CartError::QuantityOutOfRange`]: `quantity` is zero or above stock.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> Result<(), CartError> {
        let item = self.get(product_id).ok_or(CartError::ItemNotFound(product_id))?;

        if !(1..=item.stock).contains(&quantity) {
            return Err(CartError::QuantityOutOfRange {
                product_id,
                requested: quantity,
                stock: item.stock,
            });
        }

        self.update_quantity(product_id, quantity)
    }

    /// Delete the matching line item.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart cannot be persisted.
    pub fn remove_from_cart(&mut self, product_id: ProductId) -> Result<(), CartError> {
        self.items.retain(|item| item.id != product_id);

        self.persist()
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart cannot be persisted.
    pub fn clear_cart(&mut self) -> Result<(), CartError> {
        self.items.clear();

        self.persist()
    }

    /// Step a line item's quantity up by one, refusing to exceed its stock.
    ///
    /// # Errors
    ///
    /// - [`CartError::ItemNotFound`]: the product is not in the cart.
    /// - [`CartError::QuantityOutOfRange`]: the item is already at its stock level.
    pub fn increment(&mut self, product_id: ProductId) -> Result<u32, CartError> {
        let item = self.get(product_id).ok_or(CartError::ItemNotFound(product_id))?;
        let requested = item.quantity.saturating_add(1);

        if requested > item.stock {
            return Err(CartError::QuantityOutOfRange {
                product_id,
                requested,
                stock: item.stock,
            });
        }

        self.update_quantity(product_id, requested)?;

        Ok(requested)
    }

    /// Step a line item's quantity down by one, refusing to go below one.
    ///
    /// # Errors
    ///
    /// - [`CartError::ItemNotFound`]: the product is not in the cart.
    /// - [`CartError::QuantityOutOfRange`]: the item is already at quantity one.
    pub fn decrement(&mut self, product_id: ProductId) -> Result<u32, CartError> {
        let item = self.get(product_id).ok_or(CartError::ItemNotFound(product_id))?;

        if item.quantity <= 1 {
            return Err(CartError::QuantityOutOfRange {
                product_id,
                requested: item.quantity.saturating_sub(1),
                stock: item.stock,
            });
        }

        let requested = item.quantity - 1;

        self.update_quantity(product_id, requested)?;

        Ok(requested)
    }

    /// Sum of `quantity * selling_price` over all line items.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Find the line item for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == product_id)
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// The storage backend the cart is mirrored into.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) -> Result<(), CartError> {
        let document = serde_json::to_string(&PersistedCartRef { items: &self.items })
            .map_err(CartError::Serialise)?;

        self.storage.set(CART_STORAGE_KEY, &document)?;

        Ok(())
    }
}
