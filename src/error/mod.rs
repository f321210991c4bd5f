use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::template::TemplateError;
use crate::wylto::WyltoError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Wylto(#[from] WyltoError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing_fields: Option<Vec<String>>,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

fn hidden_in_production(log_msg: &str, public: &str) -> String {
    if is_production() {
        public.to_string()
    } else {
        log_msg.to_string()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let log_message = self.to_string();
        let mut missing_fields = None;

        let (status, code, client_message) = match &self {
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Template(err) => match err {
                TemplateError::NotFound(_) => (
                    StatusCode::NOT_FOUND,
                    "TEMPLATE_NOT_FOUND",
                    log_message.clone(),
                ),
                TemplateError::MissingRequiredFields {
                    missing_fields: fields,
                    ..
                } => {
                    missing_fields = Some(fields.clone());
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "MISSING_REQUIRED_FIELDS",
                        log_message.clone(),
                    )
                }
                TemplateError::DuplicateKey(_) | TemplateError::InvalidTemplate { .. } => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_TEMPLATE",
                    log_message.clone(),
                ),
            },
            AppError::Wylto(err) => (
                err.status_code(),
                "BACKEND_ERROR",
                hidden_in_production(&log_message, "Wylto backend unavailable"),
            ),
        };

        // Always log the detailed error server-side
        tracing::error!(
            code = %code,
            status = %status.as_u16(),
            message = %log_message,
            "API error"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: client_message,
                missing_fields,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_not_found_maps_to_404() {
        let response =
            AppError::from(TemplateError::NotFound("NOPE".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_missing_fields_maps_to_422() {
        let err = TemplateError::MissingRequiredFields {
            key: "ORDER_CREATED".to_string(),
            missing_fields: vec!["orderNumber".to_string()],
        };
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_auth_maps_to_401() {
        let response = AppError::Auth("bad signature".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
