//! Wylto backend plumbing shared by the forwarder and the connection manager.

mod client;
mod error;

pub use client::WyltoClient;
pub use error::WyltoError;
