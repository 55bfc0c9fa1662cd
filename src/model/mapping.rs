//! The mapping description: the declarative input document a dataset is
//! built from.
//!
//! ```json
//! {
//!   "dataset": {"name": "test", "label": "Test Case Model"},
//!   "mapping": {
//!     "amount":   {"type": "value", "column": "amount", "datatype": "float"},
//!     "time":     {"type": "value", "column": "year", "datatype": "date"},
//!     "to":       {"type": "entity", "fields": [
//!                    {"name": "name", "column": "to_name"},
//!                    {"name": "label", "column": "to_label"}]},
//!     "function": {"type": "classifier", "taxonomy": "funny", "fields": [...]}
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sql::ddl::DataType;

/// Top-level mapping document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelSpec {
    pub dataset: DatasetInfo,
    pub mapping: BTreeMap<String, FieldSpec>,
}

/// Descriptive header of a dataset.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetInfo {
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub currency: Option<String>,
}

/// One field of the mapping: a metric, a value dimension or a complex
/// dimension, depending on its `type` and name.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,

    /// Source column in the raw input rows. Mutually exclusive with
    /// `constant` by convention; when neither is set the value is null.
    pub column: Option<String>,
    /// Constant literal used instead of a source column.
    pub constant: Option<String>,
    /// Fallback literal when the source column is missing.
    pub default: Option<String>,
    pub datatype: Option<String>,

    /// Reference-table name for complex dimensions; dimensions with the
    /// same scheme share one table.
    pub scheme: Option<String>,
    /// Legacy alias for `scheme`.
    pub taxonomy: Option<String>,

    /// Attribute list of a complex dimension.
    pub attributes: Option<Vec<AttributeEntry>>,
    /// Legacy alias for `attributes`.
    pub fields: Option<Vec<AttributeEntry>>,
}

/// One attribute of a complex dimension's reference table.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AttributeEntry {
    pub name: String,
    pub column: Option<String>,
    pub constant: Option<String>,
    pub default: Option<String>,
    pub datatype: Option<String>,
    pub description: Option<String>,
}

/// How a field spec is routed into the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Metric,
    Value,
    Complex,
}

impl FieldSpec {
    /// Route this field. A field named `amount` is always the metric;
    /// `value` (the default) gives an inline dimension; anything else
    /// (entity, classifier, ...) owns a reference table.
    pub fn route(&self, name: &str) -> FieldKind {
        let kind = self.kind.as_deref();
        if kind == Some("metric") || name == "amount" {
            FieldKind::Metric
        } else if kind.unwrap_or("value") == "value" {
            FieldKind::Value
        } else {
            FieldKind::Complex
        }
    }

    /// Reference-table scheme: `scheme`, then `taxonomy`, then "entity".
    pub fn scheme(&self) -> &str {
        self.scheme
            .as_deref()
            .or(self.taxonomy.as_deref())
            .unwrap_or("entity")
    }

    /// Attribute entries: `attributes`, falling back to `fields`.
    pub fn attribute_entries(&self) -> &[AttributeEntry] {
        self.attributes
            .as_deref()
            .or(self.fields.as_deref())
            .unwrap_or(&[])
    }
}

/// Map a declared datatype onto a storage type. Dates are stored as
/// opaque text; unknown datatypes default to text.
pub fn parse_datatype(datatype: Option<&str>) -> DataType {
    match datatype {
        Some("float") => DataType::Float,
        _ => DataType::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing() {
        let metric = FieldSpec {
            kind: Some("metric".into()),
            ..Default::default()
        };
        assert_eq!(metric.route("tax"), FieldKind::Metric);

        // A field named amount is the metric even when typed as value.
        let amount = FieldSpec {
            kind: Some("value".into()),
            ..Default::default()
        };
        assert_eq!(amount.route("amount"), FieldKind::Metric);

        let untyped = FieldSpec::default();
        assert_eq!(untyped.route("field"), FieldKind::Value);

        let entity = FieldSpec {
            kind: Some("entity".into()),
            ..Default::default()
        };
        assert_eq!(entity.route("to"), FieldKind::Complex);

        let classifier = FieldSpec {
            kind: Some("classifier".into()),
            ..Default::default()
        };
        assert_eq!(classifier.route("function"), FieldKind::Complex);
    }

    #[test]
    fn test_scheme_fallbacks() {
        let spec = FieldSpec {
            scheme: Some("org".into()),
            taxonomy: Some("funny".into()),
            ..Default::default()
        };
        assert_eq!(spec.scheme(), "org");

        let spec = FieldSpec {
            taxonomy: Some("funny".into()),
            ..Default::default()
        };
        assert_eq!(spec.scheme(), "funny");

        assert_eq!(FieldSpec::default().scheme(), "entity");
    }

    #[test]
    fn test_datatype_parsing() {
        assert_eq!(parse_datatype(Some("float")), DataType::Float);
        assert_eq!(parse_datatype(Some("string")), DataType::Text);
        assert_eq!(parse_datatype(Some("date")), DataType::Text);
        assert_eq!(parse_datatype(Some("constant")), DataType::Text);
        assert_eq!(parse_datatype(Some("geometry")), DataType::Text);
        assert_eq!(parse_datatype(None), DataType::Text);
    }

    #[test]
    fn test_deserialize_document() {
        let doc = serde_json::json!({
            "dataset": {"name": "test", "label": "Test Case Model"},
            "mapping": {
                "amount": {"type": "value", "column": "amount", "datatype": "float"},
                "to": {
                    "type": "entity",
                    "fields": [
                        {"name": "name", "column": "to_name"},
                        {"name": "const", "constant": "true", "datatype": "constant"}
                    ]
                }
            }
        });

        let spec: ModelSpec = serde_json::from_value(doc).unwrap();
        assert_eq!(spec.dataset.name, "test");
        assert_eq!(spec.mapping.len(), 2);

        let to = &spec.mapping["to"];
        assert_eq!(to.scheme(), "entity");
        let entries = to.attribute_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "name");
        assert_eq!(entries[1].constant.as_deref(), Some("true"));
    }
}
