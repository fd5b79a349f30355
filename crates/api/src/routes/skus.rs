//! Inventory route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use shopfront_core::{NewSku, Sku};

use crate::error::Result;
use crate::extract::JsonBody;
use crate::services::InventoryService;
use crate::state::AppState;

/// Response body for a created SKU.
#[derive(Debug, Serialize)]
pub struct SkuCreated {
    pub message: &'static str,
    pub id: String,
}

/// List SKUs of every product named after the configured SKU product.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Sku>>> {
    let skus = InventoryService::new(state.store())
        .list_skus_for_product_name(state.sku_product_name())
        .await?;
    Ok(Json(skus))
}

/// Stamp and insert a SKU.
pub async fn create(
    State(state): State<AppState>,
    JsonBody(sku): JsonBody<NewSku>,
) -> Result<(StatusCode, Json<SkuCreated>)> {
    let id = InventoryService::new(state.store()).create_sku(sku).await?;

    Ok((
        StatusCode::CREATED,
        Json(SkuCreated {
            message: "SKU added successfully",
            id: id.into(),
        }),
    ))
}
