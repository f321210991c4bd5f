//! API layer - HTTP endpoint handlers organized by domain.

mod connection;
mod health;
mod metrics;
mod routes;
mod template;

pub use connection::{connect_shop, disconnect_shop, shop_connection, ConnectionQuery};
pub use health::{health, stats, HealthResponse, StatsResponse};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use template::{
    get_template, list_templates, render_template, validate_template, RenderResponse,
    TemplateListResponse,
};
