//! HTTP route handlers for the clinic site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Catalog
//! GET  /products               - Active product listing
//! GET  /products/{id}          - Product detail
//!
//! # Cart (session-backed)
//! GET  /cart                   - Cart view with priced lines and total
//! POST /cart/add               - Add a product (quantities merge)
//! POST /cart/update            - Set a line's quantity (0 removes)
//! POST /cart/clear             - Empty the cart
//!
//! # Checkout
//! POST /checkout               - Create order + payment intent from the cart
//! POST /checkout/verify        - Verify payment callback signature
//!
//! # Contact
//! POST /contact                - Contact form submission (email notification)
//!
//! # Admin (session login; all /admin routes except login require auth)
//! POST /admin/login            - Login with email + password
//! POST /admin/logout           - Logout
//! GET  /admin/me               - Current admin identity
//! GET  /admin/products         - Full product listing (incl. inactive)
//! POST /admin/products         - Create product
//! PUT  /admin/products/{id}    - Update product
//! PATCH /admin/products/{id}/active - Toggle visibility
//! DELETE /admin/products/{id}  - Delete product
//! GET  /admin/orders           - Order listing (optional status filter)
//! GET  /admin/orders/{id}      - Order detail with line items
//! ```

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

/// Create the public product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/clear", post(cart::clear))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::create))
        .route("/verify", post(checkout::verify))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/logout", post(admin::logout))
        .route("/me", get(admin::me))
        .route(
            "/products",
            get(admin::list_products).post(admin::create_product),
        )
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/products/{id}/active", patch(admin::set_product_active))
        .route("/orders", get(admin::list_orders))
        .route("/orders/{id}", get(admin::show_order))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .route("/contact", post(contact::submit))
        .nest("/admin", admin_routes())
}
