//! Connection state and request/response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Link state between a shop and a Wylto account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConnectionState {
    NotConnected,
    Connected {
        #[serde(skip_serializing_if = "Option::is_none")]
        account_id: Option<String>,
        linked_at: DateTime<Utc>,
    },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected { .. })
    }
}

/// Result of linking a shop to an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedAccount {
    pub account_id: Option<String>,
}

/// Link state as reported by Wylto
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStatus {
    pub connected: bool,
    pub account_id: Option<String>,
}

/// Request to connect a shop to a Wylto account
#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    /// Shopify Admin API access token for the shop
    pub access_token: String,
    /// Token identifying the merchant's Wylto account
    pub account_token: String,
}

/// Connection summary
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStats {
    pub connected_shops: usize,
}

/// `*.myshopify.com` domain made of lowercase alphanumerics and dashes.
pub fn is_valid_shop_domain(shop: &str) -> bool {
    let Some(handle) = shop.strip_suffix(".myshopify.com") else {
        return false;
    };

    !handle.is_empty()
        && handle.len() <= 63
        && !handle.starts_with('-')
        && handle
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shop_domain_validation() {
        assert!(is_valid_shop_domain("acme.myshopify.com"));
        assert!(is_valid_shop_domain("acme-store-2.myshopify.com"));
        assert!(!is_valid_shop_domain("acme.com"));
        assert!(!is_valid_shop_domain(".myshopify.com"));
        assert!(!is_valid_shop_domain("evil.com/x.myshopify.com"));
        assert!(!is_valid_shop_domain("ACME.myshopify.com"));
        assert!(!is_valid_shop_domain("-acme.myshopify.com"));
    }

    #[test]
    fn test_state_serialization() {
        let state = ConnectionState::NotConnected;
        assert_eq!(serde_json::to_value(&state).unwrap(), json!({"status": "not_connected"}));

        let state = ConnectionState::Connected {
            account_id: Some("acc_1".to_string()),
            linked_at: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["status"], "connected");
        assert_eq!(value["account_id"], "acc_1");
        assert!(state.is_connected());
    }
}
