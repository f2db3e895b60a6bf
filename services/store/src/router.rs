use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use bazaar_core::health::healthz;
use bazaar_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    account::{login, logout, register},
    address::{create_address, delete_address, list_addresses, update_address},
    admin,
    cart::{add_cart_item, get_cart, remove_cart_item, update_cart_item},
    catalog::{get_product, list_categories, list_category_products, list_featured_products},
    order::{checkout, get_order, list_my_orders, pay_order},
    pincode::validate_pincode,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Account
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        // PIN codes
        .route("/pincode/validate", post(validate_pincode))
        // Catalog
        .route("/categories", get(list_categories))
        .route("/categories/{id}/products", get(list_category_products))
        .route("/products/featured", get(list_featured_products))
        .route("/products/{id}", get(get_product))
        // Cart
        .route("/cart", get(get_cart))
        .route("/cart/items", post(add_cart_item))
        .route(
            "/cart/items/{id}",
            patch(update_cart_item).delete(remove_cart_item),
        )
        // Checkout and orders
        .route("/checkout", post(checkout))
        .route("/orders", get(list_my_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/payment", post(pay_order))
        // Addresses
        .route("/addresses", get(list_addresses).post(create_address))
        .route("/addresses/{id}", put(update_address).delete(delete_address))
        // Admin
        .route("/admin/dashboard", get(admin::get_dashboard))
        .route(
            "/admin/products",
            get(admin::list_products).post(admin::create_product),
        )
        .route(
            "/admin/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/admin/orders", get(admin::list_orders))
        .route("/admin/orders/{id}", get(admin::get_order))
        .route("/admin/orders/{id}/status", patch(admin::update_order_status))
        .route("/admin/users", get(admin::list_customers))
        .route("/admin/users/{id}", get(admin::get_customer))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}

/// Ready once the database answers a ping.
async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
