//! Update payload builder
//!
//! Pure translation from one spreadsheet row plus field metadata to the JSON
//! body of a PATCH. The search field and empty cells never make it into the
//! payload; list-typed values are translated from display title to internal
//! value and dropped with a warning when the title is unknown.

use log::warn;
use serde_json::{Map, Value};

use crate::api::{FieldKind, FieldMap};

/// One spreadsheet row as ordered (field id, raw value) pairs.
pub type Row = Vec<(String, String)>;

/// Build the update payload for a row.
///
/// Fields without metadata pass through as scalars; no other validation or
/// coercion happens here.
pub fn build_update_payload(row: &Row, search_field: &str, fields: &FieldMap) -> Map<String, Value> {
    let mut payload = Map::new();
    for (field_id, value) in row {
        if field_id == search_field || value.is_empty() {
            continue;
        }
        match fields.get(field_id) {
            Some(FieldKind::List { titles }) => match titles.get(value) {
                Some(mapped) => {
                    payload.insert(field_id.clone(), Value::String(mapped.clone()));
                }
                None => {
                    warn!(
                        "List field '{}' value '{}' not found in Uspacy list. Skipping.",
                        field_id, value
                    );
                }
            },
            Some(FieldKind::Scalar) | None => {
                payload.insert(field_id.clone(), Value::String(value.clone()));
            }
        }
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn fields_with_status_list() -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("name".to_string(), FieldKind::Scalar);
        fields.insert(
            "status".to_string(),
            FieldKind::List {
                titles: HashMap::from([("Active".to_string(), "1".to_string())]),
            },
        );
        fields
    }

    fn row(cells: &[(&str, &str)]) -> Row {
        cells
            .iter()
            .map(|(id, value)| (id.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn list_title_resolves_to_internal_value() {
        let row = row(&[("id", "42"), ("name", "Acme"), ("status", "Active")]);
        let payload = build_update_payload(&row, "id", &fields_with_status_list());

        assert_eq!(payload.len(), 2);
        assert_eq!(payload["name"], "Acme");
        assert_eq!(payload["status"], "1");
    }

    #[test]
    fn unknown_list_title_is_dropped() {
        let row = row(&[("id", "42"), ("name", "Acme"), ("status", "Pending")]);
        let payload = build_update_payload(&row, "id", &fields_with_status_list());

        assert_eq!(payload.len(), 1);
        assert_eq!(payload["name"], "Acme");
        assert!(!payload.contains_key("status"));
    }

    #[test]
    fn search_field_never_appears_in_payload() {
        let row = row(&[("id", "42"), ("name", "Acme")]);
        let payload = build_update_payload(&row, "id", &fields_with_status_list());
        assert!(!payload.contains_key("id"));
    }

    #[test]
    fn empty_values_are_skipped() {
        let row = row(&[("id", "42"), ("name", ""), ("status", "")]);
        let payload = build_update_payload(&row, "id", &fields_with_status_list());
        assert!(payload.is_empty());
    }

    #[test]
    fn fields_without_metadata_pass_through() {
        let row = row(&[("id", "42"), ("custom_field", "hello")]);
        let payload = build_update_payload(&row, "id", &FieldMap::new());
        assert_eq!(payload.len(), 1);
        assert_eq!(payload["custom_field"], "hello");
    }

    #[test]
    fn payload_is_a_pure_function_of_its_inputs() {
        let row = row(&[("id", "42"), ("name", "Acme"), ("status", "Active")]);
        let fields = fields_with_status_list();
        let first = build_update_payload(&row, "id", &fields);
        let second = build_update_payload(&row, "id", &fields);
        assert_eq!(first, second);
    }
}
