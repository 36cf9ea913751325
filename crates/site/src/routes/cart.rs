//! Session cart routes.
//!
//! The cart lives entirely in the session; the database is only consulted
//! to validate products on add and to price lines at view time.

use axum::{
    Json,
    extract::State,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use maplewood_core::{Cart, ProductId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::state::AppState;

/// Load the cart from the session, defaulting to empty.
pub async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Persist the cart back to the session.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Request body for cart mutations.
#[derive(Debug, Deserialize)]
pub struct CartMutation {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Summary returned by cart mutations.
#[derive(Debug, Serialize)]
pub struct CartSummary {
    pub item_count: u32,
}

/// One priced line in the cart view.
#[derive(Debug, Serialize)]
pub struct CartViewLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

/// Full cart view with current catalog prices.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartViewLine>,
    pub total: Decimal,
    pub item_count: u32,
}

/// Show the cart with priced lines and the grand total.
///
/// Lines whose product has since been deleted or deactivated are skipped
/// rather than failing the whole view.
///
/// GET /cart
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;

    let ids: Vec<ProductId> = cart.lines().iter().map(|l| l.product_id).collect();
    let products = ProductRepository::new(state.pool()).get_many(&ids).await?;

    let mut lines = Vec::with_capacity(cart.lines().len());
    let mut total = Decimal::ZERO;
    let mut item_count = 0u32;

    for line in cart.lines() {
        let Some(product) = products
            .iter()
            .find(|p| p.id == line.product_id)
            .filter(|p| p.is_orderable())
        else {
            continue;
        };

        let subtotal = product.price * Decimal::from(line.quantity);
        total += subtotal;
        item_count += line.quantity;

        lines.push(CartViewLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity: line.quantity,
            subtotal,
        });
    }

    Ok(Json(CartView {
        lines,
        total,
        item_count,
    }))
}

/// Add a product to the cart.
///
/// Adding a product already in the cart merges quantities. The product must
/// exist and be active.
///
/// POST /cart/add
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<CartMutation>,
) -> Result<Json<CartSummary>> {
    ProductRepository::new(state.pool())
        .get(input.product_id)
        .await?
        .filter(|p| p.is_orderable())
        .ok_or(AppError::InvalidProduct)?;

    let mut cart = load_cart(&session).await?;
    let item_count = cart.add(input.product_id, input.quantity);
    save_cart(&session, &cart).await?;

    Ok(Json(CartSummary { item_count }))
}

/// Set the quantity of a cart line.
///
/// Quantity 0 removes the line. Targeting a product not in the cart is a
/// 404, not an implicit add.
///
/// POST /cart/update
pub async fn update(
    session: Session,
    Json(input): Json<CartMutation>,
) -> Result<Json<CartSummary>> {
    let mut cart = load_cart(&session).await?;
    let item_count = cart.update(input.product_id, input.quantity)?;
    save_cart(&session, &cart).await?;

    Ok(Json(CartSummary { item_count }))
}

/// Empty the cart.
///
/// POST /cart/clear
pub async fn clear(session: Session) -> Result<Json<CartSummary>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(Json(CartSummary { item_count: 0 }))
}
