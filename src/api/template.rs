//! Template lookup, validation and rendering endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::Result;
use crate::server::AppState;
use crate::template::{DataRecord, Template, ValidationResult};

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<Template>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub key: String,
    pub text: String,
}

/// GET /api/v1/templates - List all templates
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let templates: Vec<Template> = state.registry.list().into_iter().cloned().collect();
    let total = templates.len();

    Json(TemplateListResponse { templates, total })
}

/// GET /api/v1/templates/{key} - Get a specific template
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Template>> {
    let template = state.registry.get_template(&key)?;
    Ok(Json(template.clone()))
}

/// POST /api/v1/templates/{key}/validate - Check a data record against a template
#[tracing::instrument(name = "http.validate_template", skip(state, data))]
pub async fn validate_template(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(data): Json<DataRecord>,
) -> Result<Json<ValidationResult>> {
    Ok(Json(state.registry.validate(&key, &data)?))
}

/// POST /api/v1/templates/{key}/render - Render a template with a data record
#[tracing::instrument(name = "http.render_template", skip(state, data))]
pub async fn render_template(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(data): Json<DataRecord>,
) -> Result<Json<RenderResponse>> {
    let text = state.registry.render(&key, &data)?;
    Ok(Json(RenderResponse { key, text }))
}
