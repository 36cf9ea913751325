//! Admin JSON API: login, product management, order listing.
//!
//! Every handler except `login` requires a session admin via
//! [`RequireAdminAuth`].

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use maplewood_core::{OrderId, OrderStatus, ProductId};

use crate::db::{OrderRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdminAuth, clear_current_admin, set_current_admin};
use crate::models::order::{Order, OrderItem};
use crate::models::{CurrentAdmin, NewProduct, Product, ProductUpdate};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Default and maximum page sizes for order listing.
const DEFAULT_ORDER_LIMIT: i64 = 50;
const MAX_ORDER_LIMIT: i64 = 200;

// ============================================================================
// Session
// ============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login with email and password.
///
/// POST /admin/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<LoginRequest>,
) -> Result<Json<CurrentAdmin>> {
    let admin = AuthService::new(state.pool())
        .login(&input.email, &input.password)
        .await?;

    // Fresh session id on privilege change
    session.cycle_id().await?;

    let current = CurrentAdmin {
        id: admin.id,
        email: admin.email,
        name: admin.name,
    };
    set_current_admin(&session, &current).await?;

    tracing::info!(admin_id = %current.id, "Admin logged in");

    Ok(Json(current))
}

/// Logout the current admin.
///
/// POST /admin/logout
pub async fn logout(session: Session) -> Result<Json<serde_json::Value>> {
    clear_current_admin(&session).await?;
    Ok(Json(serde_json::json!({ "status": "logged_out" })))
}

/// Current admin identity.
///
/// GET /admin/me
pub async fn me(RequireAdminAuth(admin): RequireAdminAuth) -> Json<CurrentAdmin> {
    Json(admin)
}

// ============================================================================
// Products
// ============================================================================

/// List all products, including inactive ones.
///
/// GET /admin/products
pub async fn list_products(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list(false).await?;
    Ok(Json(products))
}

/// Create a product.
///
/// POST /admin/products
pub async fn create_product(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<NewProduct>,
) -> Result<Json<Product>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let product = ProductRepository::new(state.pool()).create(&input).await?;

    tracing::info!(product_id = %product.id, "Product created");

    Ok(Json(product))
}

/// Update a product.
///
/// PUT /admin/products/{id}
pub async fn update_product(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(input): Json<ProductUpdate>,
) -> Result<Json<Product>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let product = ProductRepository::new(state.pool()).update(id, &input).await?;

    Ok(Json(product))
}

/// Request body for visibility toggling.
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// Toggle a product's visibility.
///
/// PATCH /admin/products/{id}/active
pub async fn set_product_active(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(input): Json<SetActiveRequest>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .set_active(id, input.active)
        .await?;

    Ok(Json(product))
}

/// Delete a product.
///
/// Existing order snapshots keep their frozen copy of the product.
///
/// DELETE /admin/products/{id}
pub async fn delete_product(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<serde_json::Value>> {
    let deleted = ProductRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    tracing::info!(product_id = %id, "Product deleted");

    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

// ============================================================================
// Orders
// ============================================================================

/// Query parameters for order listing.
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// List orders, newest first.
///
/// GET /admin/orders?status=paid&limit=50
pub async fn list_orders(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ORDER_LIMIT)
        .clamp(1, MAX_ORDER_LIMIT);

    let orders = OrderRepository::new(state.pool())
        .list(query.status, limit)
        .await?;

    Ok(Json(orders))
}

/// Order detail with its snapshotted line items.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Show an order with its line items.
///
/// GET /admin/orders/{id}
pub async fn show_order(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDetail>> {
    let repo = OrderRepository::new(state.pool());

    let order = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    let items = repo.items(id).await?;

    Ok(Json(OrderDetail { order, items }))
}
