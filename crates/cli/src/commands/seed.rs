//! Seed the catalog and inventory from a YAML file.
//!
//! ```yaml
//! products:
//!   - id: 1
//!     name: Wireless Mouse
//!     description: Two-button optical mouse
//!     price: 25.99
//!     image: https://cdn.example.com/mouse.png
//! skus:
//!   - productId: 1
//!     sku: WM-001-BLK
//!     stockQuantity: 40
//! ```
//!
//! Products are inserted first, then SKUs, each in a single bulk insert.
//! Requires a `postgres://` store; `memory://` would discard the data on exit.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use shopfront_api::services::{CatalogService, InventoryService};
use shopfront_core::{NewSku, Product};
use tracing::{error, info, warn};

/// Contents of a seed file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedFile {
    pub products: Vec<Product>,
    pub skus: Vec<NewSku>,
}

/// Check a seed file for problems that would leave the catalog inconsistent.
///
/// Returns hard errors; SKUs pointing at products outside the file are only
/// warned about, since the product may already be stored.
pub fn validate(seed: &SeedFile) -> Vec<String> {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for product in &seed.products {
        if product.name.trim().is_empty() {
            errors.push(format!("product {} has an empty name", product.id));
        }
        if product.price.is_sign_negative() {
            errors.push(format!("product {} has a negative price", product.id));
        }
        if !ids.insert(product.id) {
            errors.push(format!("product id {} appears more than once", product.id));
        }
    }

    for sku in &seed.skus {
        if sku.sku.trim().is_empty() {
            errors.push(format!("SKU for product {} has an empty code", sku.product_id));
        }
        if sku.stock_quantity < 0 {
            errors.push(format!("SKU {} has negative stock", sku.sku));
        }
        if !ids.contains(&sku.product_id) {
            warn!(sku = %sku.sku, product_id = %sku.product_id, "SKU references a product not in this file");
        }
    }

    errors
}

/// Seed products and SKUs from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// the configured store is in-memory, or the store rejects the inserts.
pub async fn catalog(file_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !file_path.exists() {
        return Err(format!("File not found: {}", file_path.display()).into());
    }

    info!(path = %file_path.display(), "Loading seed file");

    // Read and validate YAML before connecting to the store
    let content = tokio::fs::read_to_string(file_path).await?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;

    info!(
        products = seed.products.len(),
        skus = seed.skus.len(),
        "Parsed seed file"
    );

    let errors = validate(&seed);
    if !errors.is_empty() {
        error!("Seed validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let store = super::connect_persistent("seed").await?;
    info!("Connected to document store");

    let products = CatalogService::new(&store)
        .seed_products(&seed.products)
        .await?;
    let skus = InventoryService::new(&store).seed_skus(seed.skus).await?;

    info!("Seeding complete!");
    info!("  Products inserted: {products}");
    info!("  SKUs inserted: {skus}");

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    const SAMPLE: &str = r"
products:
  - id: 1
    name: Wireless Mouse
    price: 25.99
  - id: 2
    name: Keyboard
    description: Mechanical
    price: 49.5
skus:
  - productId: 1
    sku: WM-001
    stockQuantity: 10
  - productId: 2
    sku: KB-002
";

    #[test]
    fn test_parse_seed_file() {
        let seed: SeedFile = serde_yaml::from_str(SAMPLE).unwrap();

        assert_eq!(seed.products.len(), 2);
        assert_eq!(seed.products[0].price, Decimal::new(2599, 2));
        assert_eq!(seed.products[1].description, "Mechanical");
        assert_eq!(seed.skus[1].stock_quantity, 0);
        assert!(validate(&seed).is_empty());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let seed: SeedFile = serde_yaml::from_str("products: []").unwrap();
        assert!(seed.skus.is_empty());
    }

    #[test]
    fn test_validate_reports_duplicate_ids() {
        let seed: SeedFile = serde_yaml::from_str(
            r"
products:
  - {id: 1, name: A, price: 1.0}
  - {id: 1, name: B, price: 2.0}
",
        )
        .unwrap();

        let errors = validate(&seed);
        assert_eq!(errors, vec!["product id 1 appears more than once".to_string()]);
    }

    #[test]
    fn test_validate_reports_bad_sku() {
        let seed: SeedFile = serde_yaml::from_str(
            r"
skus:
  - {productId: 5, sku: '', stockQuantity: -1}
",
        )
        .unwrap();

        assert_eq!(validate(&seed).len(), 2);
    }
}
