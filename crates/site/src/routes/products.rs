//! Public product catalog routes.

use axum::{
    Json,
    extract::{Path, State},
};

use maplewood_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// List active products.
///
/// GET /products
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list(true).await?;
    Ok(Json(products))
}

/// Show a single product.
///
/// Inactive products are hidden from the public view.
///
/// GET /products/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .filter(Product::is_orderable)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(product))
}
