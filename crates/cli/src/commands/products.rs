//! Catalog inspection commands.

use shopfront_api::services::CatalogService;
use shopfront_core::ProductId;
use tracing::info;

/// Log every product in the catalog.
///
/// # Errors
///
/// Returns an error if the store cannot be reached or a product fails to
/// decode.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let store = super::connect_persistent("products list").await?;
    let products = CatalogService::new(&store).list_products().await?;

    info!("Catalog ({} products)", products.len());
    for product in &products {
        info!(
            "  {:>6}  {:<32} {:>10}",
            product.id.as_i64(),
            product.name,
            product.price.to_string()
        );
    }

    Ok(())
}

/// Log a single product by its application id.
///
/// # Errors
///
/// Returns an error if the store cannot be reached or the product does not
/// exist.
pub async fn show(id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::connect_persistent("products show").await?;
    let product = CatalogService::new(&store)
        .find_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| format!("Product {id} not found"))?;

    info!("Product {}", product.id);
    info!("  name:        {}", product.name);
    info!("  description: {}", product.description);
    info!("  price:       {}", product.price);
    info!("  image:       {}", product.image);

    Ok(())
}
