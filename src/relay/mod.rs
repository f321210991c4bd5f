//! Relay: turns a verified webhook into an envelope for Wylto.
//!
//! For topics with a customer message the envelope also carries the rendered
//! WhatsApp text. A render failure never blocks the relay; the event is
//! forwarded without a message and the failure is logged.

mod stats;

pub use stats::{RelayStats, RelayStatsSnapshot};

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

use crate::connection::ConnectionManager;
use crate::events::{extract_message_input, ShopifyTopic};
use crate::forwarder::Forwarder;
use crate::metrics::{ForwardMetrics, RenderMetrics};
use crate::template::{TemplateError, TemplateRegistry};
use crate::webhook::WebhookEvent;
use crate::wylto::WyltoError;

/// Customer message composed for a relayed event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub template_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    pub text: String,
}

/// Body posted to Wylto for every relayed webhook
#[derive(Debug, Clone, Serialize)]
pub struct RelayEnvelope {
    pub delivery_id: Uuid,
    pub shop: String,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<String>,
    pub received_at: DateTime<Utc>,
    pub payload: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<OutboundMessage>,
}

pub struct Relay {
    registry: Arc<TemplateRegistry>,
    forwarder: Arc<dyn Forwarder>,
    connections: Arc<ConnectionManager>,
    stats: RelayStats,
}

impl Relay {
    pub fn new(
        registry: Arc<TemplateRegistry>,
        forwarder: Arc<dyn Forwarder>,
        connections: Arc<ConnectionManager>,
    ) -> Self {
        Self {
            registry,
            forwarder,
            connections,
            stats: RelayStats::default(),
        }
    }

    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    /// Render the customer message for an event, if its topic has one.
    pub fn compose(&self, event: &WebhookEvent) -> Option<OutboundMessage> {
        let input = extract_message_input(&event.topic, &event.shop, &event.payload)?;

        match self.registry.render(input.template_key, &input.data) {
            Ok(text) => {
                RenderMetrics::record_rendered();
                self.stats.record_rendered();
                Some(OutboundMessage {
                    template_key: input.template_key.to_string(),
                    recipient: input.recipient,
                    text,
                })
            }
            Err(e) => {
                let outcome = match &e {
                    TemplateError::MissingRequiredFields { .. } => "missing_fields",
                    TemplateError::NotFound(_) => "not_found",
                    _ => "invalid",
                };
                RenderMetrics::record_failed(outcome);
                self.stats.record_render_failed();
                warn!(
                    shop = %event.shop,
                    topic = %event.topic,
                    template_key = input.template_key,
                    error = %e,
                    "Message not rendered, relaying event without it"
                );
                None
            }
        }
    }

    /// Build the envelope for a verified event
    pub fn envelope(&self, event: WebhookEvent) -> RelayEnvelope {
        let message = self.compose(&event);

        RelayEnvelope {
            delivery_id: Uuid::new_v4(),
            topic: event.topic.as_str().to_string(),
            shop: event.shop,
            webhook_id: event.webhook_id,
            received_at: Utc::now(),
            payload: event.payload,
            message,
        }
    }

    /// Accept an event and forward it in the background.
    ///
    /// Returns the delivery id assigned to the envelope.
    pub fn dispatch(self: &Arc<Self>, event: WebhookEvent) -> Uuid {
        self.stats.record_received();

        if event.topic == ShopifyTopic::AppUninstalled {
            self.connections.forget(&event.shop);
        }

        let envelope = self.envelope(event);
        let delivery_id = envelope.delivery_id;
        let span = tracing::info_span!(
            "relay.forward",
            delivery_id = %delivery_id,
            shop = %envelope.shop,
            topic = %envelope.topic
        );

        let relay = Arc::clone(self);
        tokio::spawn(
            async move {
                // Failures are logged and counted inside deliver
                let _ = relay.deliver(&envelope).await;
            }
            .instrument(span),
        );

        delivery_id
    }

    /// Forward one envelope and record the outcome.
    pub async fn deliver(&self, envelope: &RelayEnvelope) -> Result<(), WyltoError> {
        let started = Instant::now();

        match self.forwarder.forward(envelope).await {
            Ok(()) => {
                ForwardMetrics::record_delivered(started.elapsed());
                self.stats.record_forwarded();
                info!(
                    has_message = envelope.message.is_some(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Event forwarded to Wylto"
                );
                Ok(())
            }
            Err(e) => {
                ForwardMetrics::record_failed(started.elapsed());
                self.stats.record_forward_failed();
                error!(error = %e, "Failed to forward event to Wylto");
                Err(e)
            }
        }
    }
}
