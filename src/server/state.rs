use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::connection::{ConnectionManager, WyltoApi};
use crate::error::Result;
use crate::forwarder::{Forwarder, HttpForwarder};
use crate::relay::Relay;
use crate::template::{create_template_registry, TemplateRegistry};
use crate::wylto::WyltoClient;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub registry: Arc<TemplateRegistry>,
    pub relay: Arc<Relay>,
    pub connections: Arc<ConnectionManager>,
    pub start_time: Instant,
}

impl AppState {
    /// Build the production state: one Wylto client shared by the
    /// forwarder and the connection manager.
    pub fn new(settings: Settings) -> Result<Self> {
        let registry = create_template_registry(settings.templates.clone())?;
        let client = WyltoClient::new(&settings.wylto)?;
        let forwarder = Arc::new(HttpForwarder::new(
            client.clone(),
            settings.wylto.max_retries,
        ));

        Ok(Self::with_components(
            settings,
            registry,
            forwarder,
            Arc::new(client),
        ))
    }

    /// Assemble the state from explicit components
    pub fn with_components(
        settings: Settings,
        registry: Arc<TemplateRegistry>,
        forwarder: Arc<dyn Forwarder>,
        api: Arc<dyn WyltoApi>,
    ) -> Self {
        let connections = Arc::new(ConnectionManager::new(api));
        let relay = Arc::new(Relay::new(
            registry.clone(),
            forwarder,
            connections.clone(),
        ));

        Self {
            settings: Arc::new(settings),
            registry,
            relay,
            connections,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
