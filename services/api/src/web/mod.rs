pub mod auth;
pub mod bills;
pub mod categories;
pub mod dashboard;
pub mod forms;
pub mod middleware;
pub mod notice;
pub mod products;
pub mod rest;
pub mod state;
pub mod stock;
pub mod views;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

pub use middleware::require_auth;
pub use rest::ApiDoc;
use state::AppState;

/// Credentialed CORS for the single configured front-end origin.
fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);
    match origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            warn!("Ignoring unusable CORS_ORIGIN '{}': {}", origin, e);
            cors
        }
    }
}

/// Builds the full REST router: public auth routes plus everything behind
/// the session middleware.
pub fn app_router(state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Protected routes (session required)
    let protected_routes = Router::new()
        .route("/auth/session", get(auth::session_handler))
        .route("/dashboard", get(dashboard::dashboard_handler))
        .route(
            "/categories",
            get(categories::list_categories_handler).post(categories::create_category_handler),
        )
        .route(
            "/categories/{id}",
            put(categories::update_category_handler).delete(categories::delete_category_handler),
        )
        .route(
            "/products",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route("/products/search", get(products::search_products_handler))
        .route("/products/low-stock", get(products::low_stock_handler))
        .route(
            "/products/{id}",
            put(products::update_product_handler).delete(products::delete_product_handler),
        )
        .route(
            "/stock",
            get(stock::list_stock_handler).post(stock::create_stock_handler),
        )
        .route(
            "/bills",
            get(bills::list_bills_handler).post(bills::create_bill_handler),
        )
        .route("/bills/{id}/receipt", get(bills::receipt_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors_layer(&state.config.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
