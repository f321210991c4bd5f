//! HTTP client for the Wylto backend.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::WyltoConfig;
use crate::connection::{LinkedAccount, RemoteStatus, WyltoApi};
use crate::relay::RelayEnvelope;

use super::error::WyltoError;

const WEBHOOKS_PATH: &str = "/shopify/webhooks";
const CREDENTIALS_PATH: &str = "/shopify/credentials";
const LINK_PATH: &str = "/shopify/link";
const STATUS_PATH: &str = "/shopify/status";

/// Authenticated client for the Wylto API
#[derive(Clone)]
pub struct WyltoClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for WyltoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WyltoClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct CredentialRequest<'a> {
    shop: &'a str,
    access_token: &'a str,
}

#[derive(Serialize)]
struct LinkRequest<'a> {
    shop: &'a str,
    account_token: &'a str,
}

#[derive(Deserialize)]
struct LinkResponse {
    account_id: Option<String>,
}

#[derive(Deserialize)]
struct StatusResponse {
    connected: bool,
    #[serde(default)]
    account_id: Option<String>,
}

impl WyltoClient {
    /// Build a client with the configured request timeout.
    pub fn new(config: &WyltoConfig) -> Result<Self, WyltoError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("wylto-shopify-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// Deliver one relayed webhook event.
    #[instrument(skip(self, envelope), fields(shop = %envelope.shop, topic = %envelope.topic))]
    pub async fn post_event(&self, envelope: &RelayEnvelope) -> Result<(), WyltoError> {
        let request = self
            .authorized(self.client.post(self.url(WEBHOOKS_PATH)))
            .header("X-Shop-Domain", &envelope.shop)
            .header("X-Shopify-Topic", &envelope.topic)
            .json(envelope);

        let response = request.send().await?;
        check_status(response).await?;
        debug!(delivery_id = %envelope.delivery_id, "Event accepted by Wylto");
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, WyltoError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(WyltoError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, WyltoError> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| WyltoError::Decode(e.to_string()))
}

#[async_trait]
impl WyltoApi for WyltoClient {
    #[instrument(skip(self, access_token))]
    async fn register_credential(&self, shop: &str, access_token: &str) -> Result<(), WyltoError> {
        let response = self
            .authorized(self.client.post(self.url(CREDENTIALS_PATH)))
            .json(&CredentialRequest { shop, access_token })
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, account_token))]
    async fn link_account(
        &self,
        shop: &str,
        account_token: &str,
    ) -> Result<LinkedAccount, WyltoError> {
        let response = self
            .authorized(self.client.post(self.url(LINK_PATH)))
            .json(&LinkRequest {
                shop,
                account_token,
            })
            .send()
            .await?;

        let body: LinkResponse = decode(response).await?;
        Ok(LinkedAccount {
            account_id: body.account_id,
        })
    }

    #[instrument(skip(self))]
    async fn account_status(&self, shop: &str) -> Result<RemoteStatus, WyltoError> {
        let response = self
            .authorized(self.client.get(self.url(STATUS_PATH)))
            .query(&[("shop", shop)])
            .send()
            .await?;

        let body: StatusResponse = decode(response).await?;
        Ok(RemoteStatus {
            connected: body.connected,
            account_id: body.account_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = WyltoConfig {
            base_url: "https://api.wylto.test/".to_string(),
            ..WyltoConfig::default()
        };
        let client = WyltoClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://api.wylto.test");
        assert_eq!(client.url(LINK_PATH), "https://api.wylto.test/shopify/link");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = WyltoConfig {
            api_key: Some("secret-key".to_string()),
            ..WyltoConfig::default()
        };
        let client = WyltoClient::new(&config).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
