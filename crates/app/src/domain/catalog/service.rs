//! Catalog service.

use std::sync::Arc;

use async_trait::async_trait;
use cadence::cart::CartLineItem;
use mockall::automock;
use serde_json::json;
use tracing::{info, warn};

use crate::{
    domain::catalog::{
        errors::CatalogError,
        records::{
            CategoryRecord, PRODUCT_IMAGES_BUCKET, ProductImage, ProductPatch, ProductRecord,
            VendorRecord,
        },
    },
    storage::ObjectStorage,
    store::{
        Direction, Filter, RecordId, RecordStore, StoreError, Stored, Table,
        records::{create, fetch_all, fetch_one, patch, remove},
    },
};

#[derive(Clone)]
pub struct RecordCatalogService {
    store: Arc<dyn RecordStore>,
    objects: Arc<dyn ObjectStorage>,
}

impl RecordCatalogService {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, objects: Arc<dyn ObjectStorage>) -> Self {
        Self { store, objects }
    }
}

impl std::fmt::Debug for RecordCatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordCatalogService").finish_non_exhaustive()
    }
}

#[async_trait]
impl CatalogService for RecordCatalogService {
    async fn list_categories(&self) -> Result<Vec<Stored<CategoryRecord>>, CatalogError> {
        let filter = Filter::all().order_by("name", Direction::Ascending);

        Ok(fetch_all(self.store.as_ref(), &filter).await?)
    }

    async fn create_category(
        &self,
        category: CategoryRecord,
    ) -> Result<Stored<CategoryRecord>, CatalogError> {
        Ok(create(self.store.as_ref(), &category).await?)
    }

    async fn list_vendors(&self) -> Result<Vec<Stored<VendorRecord>>, CatalogError> {
        let filter = Filter::all().order_by("name", Direction::Ascending);

        Ok(fetch_all(self.store.as_ref(), &filter).await?)
    }

    async fn list_products(
        &self,
        category: Option<RecordId>,
    ) -> Result<Vec<Stored<ProductRecord>>, CatalogError> {
        let filter = match category {
            Some(category) => Filter::eq("category_id", category),
            None => Filter::all(),
        }
        .order_by("name", Direction::Ascending);

        Ok(fetch_all(self.store.as_ref(), &filter).await?)
    }

    async fn get_product(&self, product: RecordId) -> Result<Stored<ProductRecord>, CatalogError> {
        Ok(fetch_one(self.store.as_ref(), product).await?)
    }

    async fn create_product(
        &self,
        product: ProductRecord,
    ) -> Result<Stored<ProductRecord>, CatalogError> {
        let created = create(self.store.as_ref(), &product).await?;

        info!(product = created.id, name = %created.name, "product created");

        Ok(created)
    }

    async fn update_product(
        &self,
        product: RecordId,
        update: ProductPatch,
    ) -> Result<Stored<ProductRecord>, CatalogError> {
        let changes = serde_json::to_value(&update).map_err(|source| StoreError::Malformed {
            table: Table::Products,
            source,
        })?;

        Ok(patch(self.store.as_ref(), product, changes).await?)
    }

    async fn delete_product(&self, product: RecordId) -> Result<(), CatalogError> {
        remove::<ProductRecord>(self.store.as_ref(), product).await?;

        info!(product, "product deleted");

        Ok(())
    }

    #[tracing::instrument(skip(self, image), fields(file_name = %image.file_name))]
    async fn save_product_image(
        &self,
        product: RecordId,
        image: ProductImage,
    ) -> Result<String, CatalogError> {
        let file_name = image.file_name.trim();

        if file_name.is_empty() || file_name.contains('/') || file_name.starts_with('.') {
            return Err(CatalogError::InvalidImageName(image.file_name));
        }

        self.get_product(product).await?;

        let key = format!("{product}/{file_name}");

        self.objects
            .upload(PRODUCT_IMAGES_BUCKET, &key, image.bytes, &image.content_type)
            .await
            .map_err(|error| {
                warn!(%error, "product image upload failed");

                CatalogError::ImageUpload(error)
            })?;

        let url = self.objects.public_url(PRODUCT_IMAGES_BUCKET, &key);

        patch::<ProductRecord>(self.store.as_ref(), product, json!({ "image": url })).await?;

        info!(%url, "product image saved");

        Ok(url)
    }

    async fn line_item(&self, product: RecordId, quantity: u32) -> Result<CartLineItem, CatalogError> {
        let product = self.get_product(product).await?;

        if product.stock == 0 {
            return Err(CatalogError::OutOfStock(product.id));
        }

        Ok(product.line_item(quantity))
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieves all categories, by name.
    async fn list_categories(&self) -> Result<Vec<Stored<CategoryRecord>>, CatalogError>;

    /// Creates a category.
    async fn create_category(
        &self,
        category: CategoryRecord,
    ) -> Result<Stored<CategoryRecord>, CatalogError>;

    /// Retrieves all vendors, by name.
    async fn list_vendors(&self) -> Result<Vec<Stored<VendorRecord>>, CatalogError>;

    /// Retrieves products, optionally limited to one category.
    async fn list_products(
        &self,
        category: Option<RecordId>,
    ) -> Result<Vec<Stored<ProductRecord>>, CatalogError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: RecordId) -> Result<Stored<ProductRecord>, CatalogError>;

    /// Creates a product.
    async fn create_product(
        &self,
        product: ProductRecord,
    ) -> Result<Stored<ProductRecord>, CatalogError>;

    /// Applies a partial update to a product.
    async fn update_product(
        &self,
        product: RecordId,
        update: ProductPatch,
    ) -> Result<Stored<ProductRecord>, CatalogError>;

    /// Deletes a product.
    async fn delete_product(&self, product: RecordId) -> Result<(), CatalogError>;

    /// Uploads a product image and points the product at its public URL.
    ///
    /// The product row is only written once the upload has succeeded.
    async fn save_product_image(
        &self,
        product: RecordId,
        image: ProductImage,
    ) -> Result<String, CatalogError>;

    /// The product as a cart line item with a clamped quantity.
    async fn line_item(&self, product: RecordId, quantity: u32) -> Result<CartLineItem, CatalogError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        storage::{InMemoryObjectStorage, MockObjectStorage, ObjectStorageError},
        store::InMemoryRecordStore,
    };

    use super::*;

    fn cajon(category_id: Option<RecordId>, stock: u32) -> ProductRecord {
        ProductRecord {
            name: "Cajón".to_string(),
            description: "Peruvian box drum".to_string(),
            category_id,
            vendor_id: None,
            stock,
            selling_price: Decimal::new(12990, 2),
            purchase_price: Some(Decimal::new(8000, 2)),
            image: None,
        }
    }

    fn service(objects: Arc<dyn ObjectStorage>) -> (Arc<InMemoryRecordStore>, RecordCatalogService) {
        let store = Arc::new(InMemoryRecordStore::new());

        (store.clone(), RecordCatalogService::new(store, objects))
    }

    #[tokio::test]
    async fn list_products_filters_by_category() -> TestResult {
        let (_store, catalog) = service(Arc::new(InMemoryObjectStorage::new()));

        catalog.create_product(cajon(Some(1), 3)).await?;
        catalog
            .create_product(ProductRecord {
                name: "Snare".to_string(),
                ..cajon(Some(2), 5)
            })
            .await?;

        let hand_drums = catalog.list_products(Some(1)).await?;
        let everything = catalog.list_products(None).await?;

        assert_eq!(hand_drums.len(), 1);
        assert_eq!(everything.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_id_returns_not_found() {
        let (_store, catalog) = service(Arc::new(InMemoryObjectStorage::new()));

        let result = catalog.get_product(404).await;

        assert!(
            matches!(result, Err(CatalogError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_product_applies_patch() -> TestResult {
        let (_store, catalog) = service(Arc::new(InMemoryObjectStorage::new()));
        let created = catalog.create_product(cajon(None, 3)).await?;

        let updated = catalog
            .update_product(
                created.id,
                ProductPatch {
                    stock: Some(9),
                    selling_price: Some(Decimal::new(11990, 2)),
                    ..ProductPatch::default()
                },
            )
            .await?;

        assert_eq!(updated.stock, 9);
        assert_eq!(updated.selling_price, Decimal::new(11990, 2));
        assert_eq!(updated.name, "Cajón");

        Ok(())
    }

    #[tokio::test]
    async fn delete_product_makes_it_not_found() -> TestResult {
        let (_store, catalog) = service(Arc::new(InMemoryObjectStorage::new()));
        let created = catalog.create_product(cajon(None, 3)).await?;

        catalog.delete_product(created.id).await?;

        let result = catalog.get_product(created.id).await;

        assert!(
            matches!(result, Err(CatalogError::ProductNotFound)),
            "expected ProductNotFound after deletion, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn save_product_image_uploads_then_links() -> TestResult {
        let objects = Arc::new(InMemoryObjectStorage::new());
        let (_store, catalog) = service(objects.clone());
        let created = catalog.create_product(cajon(None, 3)).await?;

        let url = catalog
            .save_product_image(
                created.id,
                ProductImage {
                    file_name: "cajon.png".to_string(),
                    content_type: "image/png".to_string(),
                    bytes: vec![0x89, 0x50],
                },
            )
            .await?;

        assert_eq!(url, format!("memory://products/{}/cajon.png", created.id));
        assert!(
            objects
                .object("products", &format!("{}/cajon.png", created.id))
                .await
                .is_some(),
            "image should be uploaded"
        );
        assert_eq!(
            catalog.get_product(created.id).await?.image.as_deref(),
            Some(url.as_str())
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_upload_leaves_product_untouched() -> TestResult {
        let mut objects = MockObjectStorage::new();

        objects.expect_upload().times(1).returning(|bucket, key, _, _| {
            Err(ObjectStorageError::Rejected {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: "bucket is full".to_string(),
            })
        });
        objects.expect_public_url().never();

        let (_store, catalog) = service(Arc::new(objects));
        let created = catalog.create_product(cajon(None, 3)).await?;

        let result = catalog
            .save_product_image(
                created.id,
                ProductImage {
                    file_name: "cajon.png".to_string(),
                    content_type: "image/png".to_string(),
                    bytes: vec![1],
                },
            )
            .await;

        assert!(
            matches!(result, Err(CatalogError::ImageUpload(_))),
            "expected ImageUpload, got {result:?}"
        );
        assert_eq!(catalog.get_product(created.id).await?.image, None);

        Ok(())
    }

    #[tokio::test]
    async fn save_product_image_rejects_path_like_names() -> TestResult {
        let (_store, catalog) = service(Arc::new(MockObjectStorage::new()));
        let created = catalog.create_product(cajon(None, 3)).await?;

        let result = catalog
            .save_product_image(
                created.id,
                ProductImage {
                    file_name: "../cajon.png".to_string(),
                    content_type: "image/png".to_string(),
                    bytes: vec![1],
                },
            )
            .await;

        assert!(
            matches!(result, Err(CatalogError::InvalidImageName(_))),
            "expected InvalidImageName, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn line_item_refuses_out_of_stock_products() -> TestResult {
        let (_store, catalog) = service(Arc::new(InMemoryObjectStorage::new()));
        let sold_out = catalog.create_product(cajon(None, 0)).await?;
        let in_stock = catalog.create_product(cajon(None, 2)).await?;

        let result = catalog.line_item(sold_out.id, 1).await;

        assert!(
            matches!(result, Err(CatalogError::OutOfStock(id)) if id == sold_out.id),
            "expected OutOfStock, got {result:?}"
        );
        assert_eq!(catalog.line_item(in_stock.id, 5).await?.quantity, 2);

        Ok(())
    }
}
