// Shared infrastructure
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Domain (message composition and account links)
pub mod connection;
pub mod events;
pub mod template;

// Outbound to Wylto
pub mod forwarder;
pub mod relay;
pub mod wylto;

// Application layer
pub mod api;
pub mod server;
pub mod webhook;
