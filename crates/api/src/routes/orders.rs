//! Order route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use shopfront_core::OrderRequest;

use crate::error::Result;
use crate::extract::JsonBody;
use crate::services::OrderService;
use crate::state::AppState;

/// Response body for a created order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub message: &'static str,
    pub order_id: String,
}

/// Create a pending order from the request body.
pub async fn create(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<OrderRequest>,
) -> Result<Json<OrderCreated>> {
    let order_id = OrderService::new(state.store())
        .create_order(request)
        .await?;

    Ok(Json(OrderCreated {
        message: "Order created successfully",
        order_id: order_id.as_str().to_string(),
    }))
}
