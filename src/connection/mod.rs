//! Connection manager: links a shop to a Wylto account.
//!
//! Linking takes two remote calls (register the shop's credential, then link
//! it to the merchant's account); a third call reports the current state.
//! The manager caches the result per shop for the settings UI.

mod manager;
mod types;

pub use manager::ConnectionManager;
pub use types::{
    is_valid_shop_domain, ConnectRequest, ConnectionState, ConnectionStats, LinkedAccount,
    RemoteStatus,
};

use async_trait::async_trait;

use crate::wylto::WyltoError;

/// Remote account operations offered by Wylto
#[async_trait]
pub trait WyltoApi: Send + Sync {
    /// Store the shop's Shopify access token with Wylto
    async fn register_credential(&self, shop: &str, access_token: &str) -> Result<(), WyltoError>;

    /// Attach the shop to the merchant's Wylto account
    async fn link_account(&self, shop: &str, account_token: &str)
        -> Result<LinkedAccount, WyltoError>;

    /// Current link state as known by Wylto
    async fn account_status(&self, shop: &str) -> Result<RemoteStatus, WyltoError>;
}
