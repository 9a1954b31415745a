//! Catalog Records

use cadence::cart::CartLineItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::{RecordId, Stored, Table, TableRecord};

/// Bucket product images are uploaded to.
pub const PRODUCT_IMAGES_BUCKET: &str = "products";

/// Category Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub image: Option<String>,
}

impl TableRecord for CategoryRecord {
    const TABLE: Table = Table::Categories;
}

/// Vendor Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,
}

impl TableRecord for VendorRecord {
    const TABLE: Table = Table::Vendors;
}

/// Product Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category_id: Option<RecordId>,

    #[serde(default)]
    pub vendor_id: Option<RecordId>,

    pub stock: u32,

    #[serde(with = "rust_decimal::serde::float")]
    pub selling_price: Decimal,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub purchase_price: Option<Decimal>,

    #[serde(default)]
    pub image: Option<String>,
}

impl TableRecord for ProductRecord {
    const TABLE: Table = Table::Products;
}

impl Stored<ProductRecord> {
    /// The product as a cart line item, with `requested` clamped into `[1, stock]`.
    #[must_use]
    pub fn line_item(&self, requested: u32) -> CartLineItem {
        let mut item = CartLineItem {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            stock: self.stock,
            image: self.image.clone().unwrap_or_default(),
            selling_price: self.selling_price,
            quantity: requested,
        };

        item.quantity = item.clamped_quantity(requested);

        item
    }
}

/// Partial product update; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<RecordId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub selling_price: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// An image file to attach to a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use crate::store::records::decode;

    use super::*;

    #[test]
    fn product_rows_decode_with_float_prices() -> TestResult {
        let product = decode::<ProductRecord>(json!({
            "id": 4,
            "name": "Cajón",
            "stock": 3,
            "selling_price": 129.9,
            "category_id": null,
        }))?;

        assert_eq!(product.id, 4);
        assert_eq!(product.selling_price, Decimal::new(1299, 1));
        assert_eq!(product.purchase_price, None);

        Ok(())
    }

    #[test]
    fn line_item_clamps_to_stock() {
        let product = Stored::new(
            4,
            ProductRecord {
                name: "Cajón".to_string(),
                description: String::new(),
                category_id: None,
                vendor_id: None,
                stock: 3,
                selling_price: Decimal::new(12990, 2),
                purchase_price: None,
                image: Some("https://cdn.example/cajon.png".to_string()),
            },
        );

        let item = product.line_item(8);

        assert_eq!(item.id, 4);
        assert_eq!(item.quantity, 3);
        assert_eq!(item.image, "https://cdn.example/cajon.png");
    }

    #[test]
    fn patch_serialises_only_set_fields() -> TestResult {
        let patch = ProductPatch {
            stock: Some(12),
            ..ProductPatch::default()
        };

        assert_eq!(serde_json::to_value(&patch)?, json!({"stock": 12}));

        Ok(())
    }
}
