//! Checkout routes.
//!
//! Turns the session cart into an order with a remote payment intent, then
//! finalizes the order when the payment callback comes back.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use maplewood_core::{CartLine, OrderId, OrderStatus, ProductId};

use crate::error::{AppError, Result};
use crate::models::order::CustomerDetails;
use crate::routes::cart::{load_cart, save_cart};
use crate::services::checkout;
use crate::state::AppState;

/// Request body for starting checkout.
///
/// With `product_id` set this is a buy-now checkout for that single product;
/// otherwise the session cart is the source.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Everything the payment widget needs to collect the payment.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_id: OrderId,
    pub receipt: String,
    pub gateway_order_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub key_id: String,
}

/// Create an order and payment intent from the session cart.
///
/// On success the cart is cleared. If the gateway call fails, nothing is
/// persisted and the cart is left intact for a retry.
///
/// POST /checkout
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let customer = CustomerDetails::parse(&input.name, &input.email, input.phone)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Buy-now for a single product, or the session cart
    let requested: Vec<CartLine> = match input.product_id {
        Some(product_id) => {
            if input.quantity == 0 {
                return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
            }
            vec![CartLine {
                product_id,
                quantity: input.quantity,
            }]
        }
        None => load_cart(&session).await?.lines().to_vec(),
    };

    let outcome = checkout::create_order(
        state.pool(),
        state.gateway(),
        state.config().currency,
        customer,
        &requested,
    )
    .await?;

    // Order exists; the cart has served its purpose. A buy-now checkout
    // leaves the cart untouched.
    if input.product_id.is_none() {
        let mut cart = load_cart(&session).await?;
        cart.clear();
        save_cart(&session, &cart).await?;
    }

    let order = outcome.order;
    Ok(Json(CheckoutResponse {
        order_id: order.id,
        receipt: order.receipt,
        gateway_order_id: order.gateway_order_id,
        amount_minor: outcome.amount_minor,
        currency: order.currency,
        key_id: state.config().razorpay.key_id.clone(),
    }))
}

/// Request body for payment verification.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub order_id: OrderId,
    pub payment_id: String,
    pub signature: String,
}

/// Verification outcome.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub order_id: OrderId,
    pub receipt: String,
    pub status: OrderStatus,
}

/// Verify a payment callback signature and finalize the order.
///
/// Idempotent for orders already paid. A signature mismatch records the
/// order as failed and responds 400.
///
/// POST /checkout/verify
pub async fn verify(
    State(state): State<AppState>,
    Json(input): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>> {
    let order = checkout::verify_payment(
        state.pool(),
        state.gateway(),
        input.order_id,
        &input.payment_id,
        &input.signature,
    )
    .await?;

    Ok(Json(VerifyResponse {
        order_id: order.id,
        receipt: order.receipt,
        status: order.status,
    }))
}
