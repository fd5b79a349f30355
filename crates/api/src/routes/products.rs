//! Catalog route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use shopfront_core::{Product, RawDocument};

use crate::error::Result;
use crate::extract::JsonBody;
use crate::services::CatalogService;
use crate::state::AppState;

/// Response body for a created product.
#[derive(Debug, Serialize)]
pub struct ProductCreated {
    pub message: &'static str,
    pub id: String,
}

/// List every product.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = CatalogService::new(state.store()).list_products().await?;
    Ok(Json(products))
}

/// Insert the request body as a product document, unvalidated.
pub async fn create(
    State(state): State<AppState>,
    JsonBody(document): JsonBody<RawDocument>,
) -> Result<(StatusCode, Json<ProductCreated>)> {
    let id = CatalogService::new(state.store())
        .create_product(document)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductCreated {
            message: "Product added successfully",
            id: id.into(),
        }),
    ))
}
