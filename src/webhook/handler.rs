//! HTTP endpoint receiving Shopify webhooks

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::metrics::WebhookMetrics;
use crate::server::AppState;

use super::{parse_webhook, WebhookError};

/// Acknowledgement returned to Shopify
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub accepted: bool,
    pub delivery_id: Uuid,
}

impl From<WebhookError> for AppError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => {
                AppError::Auth(err.to_string())
            }
            _ => AppError::Validation(err.to_string()),
        }
    }
}

/// POST /webhooks/shopify - Receive a Shopify webhook
///
/// Answers as soon as the event is verified; forwarding to Wylto happens
/// in the background.
#[tracing::instrument(
    name = "http.shopify_webhook",
    skip(state, headers, body),
    fields(body_len = body.len())
)]
pub async fn shopify_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>> {
    let event = parse_webhook(&state.settings.shopify.api_secret, &headers, &body)
        .inspect_err(|e| {
            WebhookMetrics::record_rejected(e.reason());
            state.relay.stats().record_rejected();
            tracing::warn!(error = %e, "Rejected Shopify webhook");
        })?;

    WebhookMetrics::record_received(event.topic.as_str());
    tracing::info!(shop = %event.shop, topic = %event.topic, "Shopify webhook verified");

    let delivery_id = state.relay.dispatch(event);

    Ok(Json(WebhookAck {
        accepted: true,
        delivery_id,
    }))
}
