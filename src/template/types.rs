//! Template types and error definitions

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Flat field-name to scalar-value mapping supplied at render time.
pub type DataRecord = serde_json::Map<String, serde_json::Value>;

/// Template-specific error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Cannot render {key}: missing {}", .missing_fields.join(", "))]
    MissingRequiredFields {
        key: String,
        missing_fields: Vec<String>,
    },

    #[error("Duplicate template key: {0}")]
    DuplicateKey(String),

    #[error("Invalid template {key}: {reason}")]
    InvalidTemplate { key: String, reason: String },
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// A message template definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Unique template key (alphanumeric, dash, underscore)
    pub key: String,

    /// Text with `{{name}}` placeholders and `{{#name}}...{{/name}}` blocks
    pub body: String,

    /// Fields that must be present and non-empty
    #[serde(default)]
    pub required_fields: Vec<String>,

    /// Fields that may be absent
    #[serde(default)]
    pub optional_fields: Vec<String>,

    /// Template description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Template {
    pub fn new(key: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            body: body.into(),
            required_fields: Vec::new(),
            optional_fields: Vec::new(),
            description: None,
        }
    }

    pub fn required(mut self, fields: &[&str]) -> Self {
        self.required_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn optional(mut self, fields: &[&str]) -> Self {
        self.optional_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate the template definition
    pub fn validate(&self) -> TemplateResult<()> {
        let invalid = |reason: &str| TemplateError::InvalidTemplate {
            key: self.key.clone(),
            reason: reason.to_string(),
        };

        if self.key.is_empty() || self.key.len() > 64 {
            return Err(invalid("key must be 1-64 characters"));
        }

        if !self
            .key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(invalid(
                "key must contain only alphanumeric, dash, or underscore",
            ));
        }

        if self.body.trim().is_empty() {
            return Err(invalid("body must not be empty"));
        }

        for field in self.required_fields.iter().chain(&self.optional_fields) {
            if !is_field_name(field) {
                return Err(invalid(&format!("invalid field name '{}'", field)));
            }
        }

        let required: HashSet<&str> = self.required_fields.iter().map(String::as_str).collect();
        if let Some(both) = self
            .optional_fields
            .iter()
            .find(|f| required.contains(f.as_str()))
        {
            return Err(invalid(&format!(
                "field '{}' is both required and optional",
                both
            )));
        }

        Ok(())
    }
}

/// Field names are non-empty runs of ASCII word characters.
pub(crate) fn is_field_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Outcome of checking a data record against a template's required fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub missing_fields: Vec<String>,
}
