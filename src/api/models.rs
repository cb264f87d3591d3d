use std::collections::HashMap;

use serde_json::Value;

/// Field type marker used by Uspacy for enumerated fields
const LIST_FIELD_TYPE: &str = "list";

/// Field kind as dispatched by the payload builder.
///
/// Uspacy reports field types as free-form strings; only "list" changes how a
/// value is sent, so everything else collapses into `Scalar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Enumerated field with a closed title -> internal value map
    List { titles: HashMap<String, String> },
    /// Any other type; raw values pass through unchanged
    Scalar,
}

/// Field metadata for one entity type, keyed by field ID.
pub type FieldMap = HashMap<String, FieldKind>;

/// Render a JSON value the way it should appear in a cell or id position.
///
/// Strings are trimmed, null becomes empty, and anything else uses its JSON
/// rendering (numbers without quotes).
pub fn json_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Build the field map from the raw descriptors returned by `GET /fields`.
///
/// Descriptors without an id are dropped. For list fields, value entries with
/// a blank title are skipped.
pub fn field_map_from_descriptors(descriptors: &[Value]) -> FieldMap {
    let mut fields = FieldMap::new();
    for descriptor in descriptors {
        let Some(id) = descriptor.get("id").map(json_text) else {
            continue;
        };
        if id.is_empty() {
            continue;
        }

        let kind = if descriptor.get("type").and_then(Value::as_str) == Some(LIST_FIELD_TYPE) {
            let mut titles = HashMap::new();
            if let Some(values) = descriptor.get("values").and_then(Value::as_array) {
                for entry in values {
                    let title = json_text(entry.get("title").unwrap_or(&Value::Null));
                    let value = json_text(entry.get("value").unwrap_or(&Value::Null));
                    if !title.is_empty() {
                        titles.insert(title, value);
                    }
                }
            }
            FieldKind::List { titles }
        } else {
            FieldKind::Scalar
        };

        fields.insert(id, kind);
    }
    fields
}

/// Extract a usable entity id from a matched record.
///
/// Returns `None` when the id member is absent, null, empty, or the literal
/// string "None" (seen in exports passed back through search). String ids
/// are trimmed like any other cell text, so a whitespace-padded id still
/// yields a clean URL segment and a whitespace-only id counts as missing.
pub fn entity_id(record: &Value) -> Option<String> {
    let id = json_text(record.get("id")?);
    match id.as_str() {
        "" | "None" => None,
        _ => Some(id),
    }
}
