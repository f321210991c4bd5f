use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::server::{api_key_auth, AppState};
use crate::webhook::shopify_webhook;

use super::connection::{connect_shop, disconnect_shop, shop_connection};
use super::health::{health, stats};
use super::metrics::prometheus_metrics;
use super::template::{get_template, list_templates, render_template, validate_template};

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health, stats & metrics
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        // Shopify webhooks (HMAC verified in the handler)
        .route("/webhooks/shopify", post(shopify_webhook))
        // Management endpoints
        .nest(
            "/api/v1",
            Router::new()
                // Templates
                .route("/templates", get(list_templates))
                .route("/templates/{key}", get(get_template))
                .route("/templates/{key}/validate", post(validate_template))
                .route("/templates/{key}/render", post(render_template))
                // Shop connections
                .route(
                    "/shops/{shop}/connection",
                    get(shop_connection)
                        .post(connect_shop)
                        .delete(disconnect_shop),
                )
                .route_layer(middleware::from_fn_with_state(state, api_key_auth)),
        )
}
