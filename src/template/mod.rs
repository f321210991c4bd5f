//! Message template engine.
//!
//! This module provides:
//! - Template definitions with `{{field}}` placeholders and
//!   `{{#field}}...{{/field}}` conditional blocks
//! - An immutable registry built once at startup
//! - Required-field validation and rendering to normalized single-line text
//!
//! # Example
//!
//! ```ignore
//! let registry = TemplateRegistry::new([
//!     Template::new("ORDER_SHIPPED", "Shipped!{{#tracking}} Tracking: {{tracking}}{{/tracking}}")
//!         .optional(&["tracking"]),
//! ])?;
//!
//! let data = json!({ "tracking": "TRACK123" });
//! let text = registry.render("ORDER_SHIPPED", data.as_object().unwrap())?;
//! assert_eq!(text, "Shipped! Tracking: TRACK123");
//! ```

pub mod builtin;
mod registry;
mod substitution;
mod types;

pub use registry::{create_template_registry, TemplateRegistry};
pub use substitution::{is_present, normalize_whitespace};
pub use types::{DataRecord, Template, TemplateError, TemplateResult, ValidationResult};
