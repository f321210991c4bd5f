//! Shop connection endpoints for the settings UI.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::connection::{is_valid_shop_domain, ConnectRequest, ConnectionState};
use crate::error::{AppError, Result};
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ConnectionQuery {
    /// Ask Wylto instead of answering from the local cache
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize)]
pub struct ConnectionResponse {
    pub shop: String,
    #[serde(flatten)]
    pub state: ConnectionState,
}

#[derive(Debug, Serialize)]
pub struct DisconnectResponse {
    pub shop: String,
    pub was_connected: bool,
}

fn checked_shop(shop: String) -> Result<String> {
    let shop = shop.trim().to_ascii_lowercase();
    if is_valid_shop_domain(&shop) {
        Ok(shop)
    } else {
        Err(AppError::Validation(format!(
            "'{}' is not a myshopify.com domain",
            shop
        )))
    }
}

/// GET /api/v1/shops/{shop}/connection - Current link state
#[tracing::instrument(name = "http.shop_connection", skip(state))]
pub async fn shop_connection(
    State(state): State<AppState>,
    Path(shop): Path<String>,
    Query(query): Query<ConnectionQuery>,
) -> Result<Json<ConnectionResponse>> {
    let shop = checked_shop(shop)?;

    let connection = if query.refresh {
        state.connections.refresh(&shop).await?
    } else {
        state.connections.status(&shop)
    };

    Ok(Json(ConnectionResponse {
        shop,
        state: connection,
    }))
}

/// POST /api/v1/shops/{shop}/connection - Link a shop to a Wylto account
#[tracing::instrument(name = "http.connect_shop", skip(state, request))]
pub async fn connect_shop(
    State(state): State<AppState>,
    Path(shop): Path<String>,
    Json(request): Json<ConnectRequest>,
) -> Result<(StatusCode, Json<ConnectionResponse>)> {
    let shop = checked_shop(shop)?;
    if request.access_token.trim().is_empty() || request.account_token.trim().is_empty() {
        return Err(AppError::Validation(
            "access_token and account_token are required".to_string(),
        ));
    }

    let connection = state
        .connections
        .connect(&shop, &request.access_token, &request.account_token)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ConnectionResponse {
            shop,
            state: connection,
        }),
    ))
}

/// DELETE /api/v1/shops/{shop}/connection - Forget the local link state
#[tracing::instrument(name = "http.disconnect_shop", skip(state))]
pub async fn disconnect_shop(
    State(state): State<AppState>,
    Path(shop): Path<String>,
) -> Result<Json<DisconnectResponse>> {
    let shop = checked_shop(shop)?;
    let was_connected = state.connections.forget(&shop);

    Ok(Json(DisconnectResponse {
        shop,
        was_connected,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_shop_normalizes_case() {
        assert_eq!(
            checked_shop(" Acme.myshopify.com ".to_string()).unwrap(),
            "acme.myshopify.com"
        );
    }

    #[test]
    fn test_checked_shop_rejects_foreign_domain() {
        assert!(matches!(
            checked_shop("acme.example.com".to_string()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_connection_response_flattens_state() {
        let value = serde_json::to_value(ConnectionResponse {
            shop: "acme.myshopify.com".to_string(),
            state: ConnectionState::NotConnected,
        })
        .unwrap();

        assert_eq!(value["shop"], "acme.myshopify.com");
        assert_eq!(value["status"], "not_connected");
    }
}
