//! Per-shop link state backed by the Wylto account API

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tracing::{info, instrument};

use crate::metrics::ConnectionMetrics;
use crate::wylto::WyltoError;

use super::types::{ConnectionState, ConnectionStats};
use super::WyltoApi;

/// Tracks which shops are linked to a Wylto account.
///
/// The cache only holds connected shops; anything absent is `NotConnected`.
pub struct ConnectionManager {
    api: Arc<dyn WyltoApi>,
    shops: DashMap<String, ConnectionState>,
}

impl ConnectionManager {
    pub fn new(api: Arc<dyn WyltoApi>) -> Self {
        Self {
            api,
            shops: DashMap::new(),
        }
    }

    /// Register the shop's credential, then link it to the merchant's account.
    ///
    /// Nothing is cached unless both calls succeed.
    #[instrument(skip(self, access_token, account_token))]
    pub async fn connect(
        &self,
        shop: &str,
        access_token: &str,
        account_token: &str,
    ) -> Result<ConnectionState, WyltoError> {
        let registered = self.api.register_credential(shop, access_token).await;
        ConnectionMetrics::record_call("register_credential", registered.is_ok());
        registered?;

        let linked = self.api.link_account(shop, account_token).await;
        ConnectionMetrics::record_call("link_account", linked.is_ok());
        let account = linked?;

        let state = ConnectionState::Connected {
            account_id: account.account_id,
            linked_at: Utc::now(),
        };
        self.shops.insert(shop.to_string(), state.clone());
        self.publish_gauge();

        info!(shop = %shop, "Shop linked to Wylto");
        Ok(state)
    }

    /// Locally known state, without calling Wylto
    pub fn status(&self, shop: &str) -> ConnectionState {
        self.shops
            .get(shop)
            .map(|entry| entry.value().clone())
            .unwrap_or(ConnectionState::NotConnected)
    }

    /// Ask Wylto for the current state and update the cache.
    #[instrument(skip(self))]
    pub async fn refresh(&self, shop: &str) -> Result<ConnectionState, WyltoError> {
        let remote = self.api.account_status(shop).await;
        ConnectionMetrics::record_call("account_status", remote.is_ok());
        let remote = remote?;

        let state = if remote.connected {
            // Keep the original link time when we already knew about the link
            let linked_at = match self.status(shop) {
                ConnectionState::Connected { linked_at, .. } => linked_at,
                ConnectionState::NotConnected => Utc::now(),
            };
            let state = ConnectionState::Connected {
                account_id: remote.account_id,
                linked_at,
            };
            self.shops.insert(shop.to_string(), state.clone());
            state
        } else {
            self.shops.remove(shop);
            ConnectionState::NotConnected
        };

        self.publish_gauge();
        Ok(state)
    }

    /// Drop local link state, e.g. after the app was uninstalled.
    ///
    /// Returns whether the shop was known to be connected.
    pub fn forget(&self, shop: &str) -> bool {
        let removed = self.shops.remove(shop).is_some();
        if removed {
            self.publish_gauge();
            info!(shop = %shop, "Shop link state cleared");
        }
        removed
    }

    pub fn stats(&self) -> ConnectionStats {
        ConnectionStats {
            connected_shops: self.shops.len(),
        }
    }

    fn publish_gauge(&self) {
        ConnectionMetrics::set_shops_connected(self.shops.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{LinkedAccount, RemoteStatus};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    #[derive(Default)]
    struct FakeApi {
        fail_register: AtomicBool,
        remote_connected: AtomicBool,
        link_calls: AtomicU32,
    }

    #[async_trait]
    impl WyltoApi for FakeApi {
        async fn register_credential(&self, _shop: &str, _token: &str) -> Result<(), WyltoError> {
            if self.fail_register.load(Ordering::SeqCst) {
                return Err(WyltoError::Status {
                    status: 401,
                    body: "bad token".to_string(),
                });
            }
            Ok(())
        }

        async fn link_account(
            &self,
            _shop: &str,
            _token: &str,
        ) -> Result<LinkedAccount, WyltoError> {
            self.link_calls.fetch_add(1, Ordering::SeqCst);
            Ok(LinkedAccount {
                account_id: Some("acc_42".to_string()),
            })
        }

        async fn account_status(&self, _shop: &str) -> Result<RemoteStatus, WyltoError> {
            Ok(RemoteStatus {
                connected: self.remote_connected.load(Ordering::SeqCst),
                account_id: Some("acc_42".to_string()),
            })
        }
    }

    const SHOP: &str = "acme.myshopify.com";

    #[tokio::test]
    async fn test_connect_caches_state() {
        let manager = ConnectionManager::new(Arc::new(FakeApi::default()));
        assert_eq!(manager.status(SHOP), ConnectionState::NotConnected);

        let state = manager.connect(SHOP, "shpat_x", "wylto_y").await.unwrap();
        assert!(state.is_connected());
        assert_eq!(manager.status(SHOP), state);
        assert_eq!(manager.stats().connected_shops, 1);
    }

    #[tokio::test]
    async fn test_failed_registration_skips_link() {
        let api = Arc::new(FakeApi::default());
        api.fail_register.store(true, Ordering::SeqCst);
        let manager = ConnectionManager::new(api.clone());

        let result = manager.connect(SHOP, "bad", "wylto_y").await;
        assert!(result.is_err());
        assert_eq!(api.link_calls.load(Ordering::SeqCst), 0);
        assert!(!manager.status(SHOP).is_connected());
    }

    #[tokio::test]
    async fn test_refresh_follows_remote_state() {
        let api = Arc::new(FakeApi::default());
        let manager = ConnectionManager::new(api.clone());

        manager.connect(SHOP, "a", "b").await.unwrap();
        let ConnectionState::Connected { linked_at, .. } = manager.status(SHOP) else {
            panic!("expected connected state");
        };

        api.remote_connected.store(true, Ordering::SeqCst);
        let refreshed = manager.refresh(SHOP).await.unwrap();
        assert!(
            matches!(refreshed, ConnectionState::Connected { linked_at: t, .. } if t == linked_at)
        );

        api.remote_connected.store(false, Ordering::SeqCst);
        let refreshed = manager.refresh(SHOP).await.unwrap();
        assert_eq!(refreshed, ConnectionState::NotConnected);
        assert_eq!(manager.stats().connected_shops, 0);
    }

    #[tokio::test]
    async fn test_forget() {
        let manager = ConnectionManager::new(Arc::new(FakeApi::default()));
        assert!(!manager.forget(SHOP));

        manager.connect(SHOP, "a", "b").await.unwrap();
        assert!(manager.forget(SHOP));
        assert_eq!(manager.status(SHOP), ConnectionState::NotConnected);
    }
}
