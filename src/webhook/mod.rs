//! Shopify webhook receiver
//!
//! Verifies the HMAC of an inbound webhook, extracts the shop, topic and
//! JSON payload, and hands the event to the relay.

mod handler;
mod signature;

pub use handler::{shopify_webhook, WebhookAck};
pub use signature::{sign, verify_signature};

use axum::http::HeaderMap;
use serde_json::Value;
use thiserror::Error;

use crate::connection::is_valid_shop_domain;
use crate::events::ShopifyTopic;

pub const HMAC_HEADER: &str = "X-Shopify-Hmac-Sha256";
pub const SHOP_HEADER: &str = "X-Shopify-Shop-Domain";
pub const TOPIC_HEADER: &str = "X-Shopify-Topic";
pub const WEBHOOK_ID_HEADER: &str = "X-Shopify-Webhook-Id";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("Missing webhook signature")]
    MissingSignature,

    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Missing or empty header {0}")]
    MissingHeader(&'static str),

    #[error("Invalid shop domain: {0}")]
    InvalidShop(String),

    #[error("Invalid JSON payload: {0}")]
    InvalidPayload(String),
}

impl WebhookError {
    /// Label for rejection metrics
    pub fn reason(&self) -> &'static str {
        match self {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => "signature",
            WebhookError::MissingHeader(_) | WebhookError::InvalidShop(_) => "headers",
            WebhookError::InvalidPayload(_) => "payload",
        }
    }
}

/// A verified, normalized webhook event
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    pub shop: String,
    pub topic: ShopifyTopic,
    pub webhook_id: Option<String>,
    pub payload: Value,
}

/// Verify and normalize an inbound webhook.
///
/// The signature is checked before anything else in the request is trusted.
pub fn parse_webhook(
    secret: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<WebhookEvent, WebhookError> {
    let signature = header(headers, HMAC_HEADER).ok_or(WebhookError::MissingSignature)?;
    if !verify_signature(secret, body, signature) {
        return Err(WebhookError::InvalidSignature);
    }

    let shop = header(headers, SHOP_HEADER).ok_or(WebhookError::MissingHeader(SHOP_HEADER))?;
    if !is_valid_shop_domain(shop) {
        return Err(WebhookError::InvalidShop(shop.to_string()));
    }

    let topic = header(headers, TOPIC_HEADER).ok_or(WebhookError::MissingHeader(TOPIC_HEADER))?;

    let payload: Value =
        serde_json::from_slice(body).map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;
    if !payload.is_object() {
        return Err(WebhookError::InvalidPayload(
            "payload must be a JSON object".to_string(),
        ));
    }

    Ok(WebhookEvent {
        shop: shop.to_string(),
        topic: ShopifyTopic::parse(topic),
        webhook_id: header(headers, WEBHOOK_ID_HEADER).map(str::to_string),
        payload,
    })
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
