//! Immutable template registry and the render pipeline

use std::collections::BTreeMap;
use std::sync::Arc;

use super::builtin::builtin_templates;
use super::substitution::{
    is_present, normalize_whitespace, resolve_blocks, substitute_placeholders,
};
use super::types::{DataRecord, Template, TemplateError, TemplateResult, ValidationResult};

/// Read-only set of templates, built once at startup.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Template>,
}

impl TemplateRegistry {
    /// Build a registry from template definitions.
    ///
    /// Every definition is validated and keys must be unique.
    pub fn new(templates: impl IntoIterator<Item = Template>) -> TemplateResult<Self> {
        let mut map = BTreeMap::new();

        for template in templates {
            template.validate()?;
            if map.contains_key(&template.key) {
                return Err(TemplateError::DuplicateKey(template.key));
            }
            map.insert(template.key.clone(), template);
        }

        Ok(Self { templates: map })
    }

    /// Registry holding the built-in message templates only
    pub fn builtin() -> Self {
        Self {
            templates: builtin_templates()
                .into_iter()
                .map(|t| (t.key.clone(), t))
                .collect(),
        }
    }

    /// Built-in templates followed by additional definitions
    pub fn with_builtin(extra: impl IntoIterator<Item = Template>) -> TemplateResult<Self> {
        Self::new(builtin_templates().into_iter().chain(extra))
    }

    /// Get a template by key
    pub fn get_template(&self, key: &str) -> TemplateResult<&Template> {
        self.templates
            .get(key)
            .ok_or_else(|| TemplateError::NotFound(key.to_string()))
    }

    /// List all templates ordered by key
    pub fn list(&self) -> Vec<&Template> {
        self.templates.values().collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Report which required fields are absent or empty in `data`.
    pub fn validate(&self, key: &str, data: &DataRecord) -> TemplateResult<ValidationResult> {
        let template = self.get_template(key)?;
        let missing_fields = missing_fields(template, data);

        Ok(ValidationResult {
            valid: missing_fields.is_empty(),
            missing_fields,
        })
    }

    /// Render a template against a data record.
    ///
    /// Blocks are resolved before placeholders are substituted, and the
    /// result is whitespace-normalized.
    pub fn render(&self, key: &str, data: &DataRecord) -> TemplateResult<String> {
        let template = self.get_template(key)?;

        let missing = missing_fields(template, data);
        if !missing.is_empty() {
            return Err(TemplateError::MissingRequiredFields {
                key: key.to_string(),
                missing_fields: missing,
            });
        }

        let text = resolve_blocks(&template.body, data);
        let text = substitute_placeholders(&text, data);

        Ok(normalize_whitespace(&text))
    }
}

fn missing_fields(template: &Template, data: &DataRecord) -> Vec<String> {
    template
        .required_fields
        .iter()
        .filter(|field| !is_present(data.get(field.as_str())))
        .cloned()
        .collect()
}

/// Create an Arc-wrapped registry of built-in plus configured templates
pub fn create_template_registry(extra: Vec<Template>) -> TemplateResult<Arc<TemplateRegistry>> {
    TemplateRegistry::with_builtin(extra).map(Arc::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(value: Value) -> DataRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("record must be an object"),
        }
    }

    fn registry() -> TemplateRegistry {
        TemplateRegistry::new([
            Template::new(
                "GREETING",
                "Hi {{customerName}}, order #{{orderNumber}} confirmed.",
            )
            .required(&["customerName", "orderNumber"]),
            Template::new(
                "SHIPPED",
                "Shipped!{{#trackingNumber}} Tracking: {{trackingNumber}}{{/trackingNumber}}",
            )
            .optional(&["trackingNumber"]),
            Template::new("LINES", "Line one\n\n  Line two  \n"),
            Template::new("LENIENT", "Hello {{name}} {{nickname}}")
                .required(&["name"])
                .optional(&["nickname"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_basic_substitution() {
        let data = record(json!({"customerName": "John", "orderNumber": "1234"}));
        let out = registry().render("GREETING", &data).unwrap();
        assert_eq!(out, "Hi John, order #1234 confirmed.");
    }

    #[test]
    fn test_missing_required_field() {
        let data = record(json!({"customerName": "John"}));
        let err = registry().render("GREETING", &data).unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingRequiredFields {
                key: "GREETING".to_string(),
                missing_fields: vec!["orderNumber".to_string()],
            }
        );
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let data = record(json!({"customerName": "", "orderNumber": null}));
        let err = registry().render("GREETING", &data).unwrap_err();
        match err {
            TemplateError::MissingRequiredFields { missing_fields, .. } => {
                assert_eq!(missing_fields, vec!["customerName", "orderNumber"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_zero_and_false_count_as_present() {
        let data = record(json!({"customerName": false, "orderNumber": 0}));
        let out = registry().render("GREETING", &data).unwrap();
        assert_eq!(out, "Hi false, order #0 confirmed.");
    }

    #[test]
    fn test_conditional_block_present() {
        let data = record(json!({"trackingNumber": "TRACK123"}));
        let out = registry().render("SHIPPED", &data).unwrap();
        assert_eq!(out, "Shipped! Tracking: TRACK123");
    }

    #[test]
    fn test_conditional_block_absent() {
        let out = registry().render("SHIPPED", &DataRecord::new()).unwrap();
        assert_eq!(out, "Shipped!");
        assert!(!out.contains("Tracking"));
        assert!(!out.contains("{{"));
    }

    #[test]
    fn test_whitespace_normalization() {
        let out = registry().render("LINES", &DataRecord::new()).unwrap();
        assert_eq!(out, "Line one Line two");
    }

    #[test]
    fn test_unknown_template_key() {
        let registry = registry();
        let data = DataRecord::new();

        assert!(matches!(
            registry.render("NOT_A_TEMPLATE", &data),
            Err(TemplateError::NotFound(_))
        ));
        assert!(matches!(
            registry.validate("NOT_A_TEMPLATE", &data),
            Err(TemplateError::NotFound(_))
        ));
        assert!(matches!(
            registry.get_template("NOT_A_TEMPLATE"),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn test_unknown_placeholder_left_literal() {
        let data = record(json!({"name": "Ann"}));
        let out = registry().render("LENIENT", &data).unwrap();
        assert_eq!(out, "Hello Ann {{nickname}}");
    }

    #[test]
    fn test_validate_reports_without_error() {
        let registry = registry();

        let result = registry
            .validate("GREETING", &record(json!({"orderNumber": "1"})))
            .unwrap();
        assert!(!result.valid);
        assert_eq!(result.missing_fields, vec!["customerName"]);

        let result = registry.validate("SHIPPED", &DataRecord::new()).unwrap();
        assert!(result.valid);
        assert!(result.missing_fields.is_empty());
    }

    #[test]
    fn test_render_is_deterministic() {
        let registry = registry();
        let data = record(json!({"customerName": "John", "orderNumber": 7, "extra": "x"}));
        let first = registry.render("GREETING", &data).unwrap();
        let second = registry.render("GREETING", &data).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = TemplateRegistry::new([Template::new("A", "a"), Template::new("A", "b")]);
        assert_eq!(result.unwrap_err(), TemplateError::DuplicateKey("A".to_string()));
    }

    #[test]
    fn test_with_builtin_rejects_shadowing() {
        let result = TemplateRegistry::with_builtin([Template::new("ORDER_CREATED", "x")]);
        assert!(matches!(result, Err(TemplateError::DuplicateKey(_))));
    }

    #[test]
    fn test_builtin_definitions_are_valid() {
        let templates = builtin_templates();
        let count = templates.len();
        let registry = TemplateRegistry::new(templates).unwrap();
        assert_eq!(registry.len(), count);
        assert_eq!(TemplateRegistry::builtin().len(), count);
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TemplateRegistry>();
    }
}
