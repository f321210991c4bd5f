//! Rendering passes: conditional blocks, placeholder substitution and
//! whitespace normalization.

use serde_json::Value;

use super::types::{is_field_name, DataRecord};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const BLOCK_OPEN: &str = "{{#";

/// A field is present when it is non-null and, for strings, non-empty.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Resolve `{{#name}}...{{/name}}` blocks against the record.
///
/// An opening marker pairs with the first closing marker of the same name.
/// Inner text is kept when the field is present and dropped otherwise; it is
/// not re-scanned for further blocks. Markers without a partner are left as
/// literal text.
pub fn resolve_blocks(body: &str, data: &DataRecord) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(start) = rest.find(BLOCK_OPEN) {
        let after_open = &rest[start + BLOCK_OPEN.len()..];
        let Some(name_end) = after_open.find(CLOSE) else {
            break;
        };
        let name = &after_open[..name_end];

        let closing = format!("{{{{/{}}}}}", name);
        let inner_and_rest = &after_open[name_end + CLOSE.len()..];

        match inner_and_rest.find(&closing) {
            Some(close_at) if is_field_name(name) => {
                out.push_str(&rest[..start]);
                if is_present(data.get(name)) {
                    out.push_str(&inner_and_rest[..close_at]);
                }
                rest = &inner_and_rest[close_at + closing.len()..];
            }
            _ => {
                // Step past the first brace only, so an overlapping marker is still seen.
                out.push_str(&rest[..start + 1]);
                rest = &rest[start + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Replace `{{key}}` for every key in the record.
///
/// Placeholders naming fields absent from the record are left untouched.
/// Substituted values are emitted verbatim and never scanned again.
pub fn substitute_placeholders(text: &str, data: &DataRecord) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(name_end) = after_open.find(CLOSE) else {
            break;
        };
        let name = &after_open[..name_end];

        match data.get(name) {
            Some(value) if !name.is_empty() => {
                out.push_str(&rest[..start]);
                out.push_str(&value_to_string(value));
                rest = &after_open[name_end + CLOSE.len()..];
            }
            _ => {
                out.push_str(&rest[..start + 1]);
                rest = &rest[start + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Trim every line, drop blank ones, join with single spaces and collapse
/// any remaining whitespace runs.
pub fn normalize_whitespace(text: &str) -> String {
    let joined = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // Nested values are not expected in a flat record; fall back to JSON
        _ => value.to_string(),
    }
}
