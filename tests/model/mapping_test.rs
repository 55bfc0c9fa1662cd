//! Building datasets from mapping documents.

mod common;

use cubist::model::field::FieldDef;
use cubist::model::mapping::{FieldKind, ModelSpec};
use cubist::{Dataset, ModelError};

#[test]
fn test_document_parses_and_routes() {
    let spec: ModelSpec = serde_json::from_value(common::model_doc()).unwrap();
    assert_eq!(spec.dataset.name, "test");
    assert_eq!(spec.dataset.label.as_deref(), Some("Test Case Model"));
    assert_eq!(spec.dataset.currency.as_deref(), Some("USD"));

    assert_eq!(spec.mapping["amount"].route("amount"), FieldKind::Metric);
    assert_eq!(spec.mapping["time"].route("time"), FieldKind::Value);
    assert_eq!(spec.mapping["field"].route("field"), FieldKind::Value);
    assert_eq!(spec.mapping["to"].route("to"), FieldKind::Complex);
    assert_eq!(spec.mapping["function"].route("function"), FieldKind::Complex);

    // The scheme falls back to the taxonomy, then to "entity".
    assert_eq!(spec.mapping["to"].scheme(), "entity");
    assert_eq!(spec.mapping["function"].scheme(), "funny");
}

#[test]
fn test_dataset_from_json() {
    let dataset = Dataset::from_json(common::model_doc()).unwrap();
    assert_eq!(dataset.name, "test");
    assert_eq!(dataset.fact_table_name(), "test_entry");
    assert_eq!(dataset.fields().len(), 5);

    let names: Vec<&str> = dataset.fields().iter().map(FieldDef::name).collect();
    assert_eq!(names, ["amount", "field", "function", "time", "to"]);
}

#[test]
fn test_complex_fields_carry_attributes() {
    let dataset = Dataset::from_json(common::model_doc()).unwrap();
    let to = dataset
        .fields()
        .iter()
        .find(|f| f.name() == "to")
        .unwrap();

    match to {
        FieldDef::Complex(def) => {
            assert_eq!(def.scheme, "entity");
            let attrs: Vec<&str> = def.attributes.iter().map(|a| a.name.as_str()).collect();
            assert_eq!(attrs, ["name", "label", "const"]);
            // A constant doubles as the default value.
            assert_eq!(def.attributes[2].default.as_deref(), Some("true"));
            assert!(def.attributes[2].source_column.is_none());
        }
        other => panic!("expected complex field, got {:?}", other),
    }
}

#[test]
fn test_missing_dataset_name_rejected() {
    let doc = serde_json::json!({
        "dataset": {},
        "mapping": {"amount": {"type": "value", "column": "amount"}}
    });
    assert!(matches!(
        Dataset::from_json(doc),
        Err(ModelError::MissingName)
    ));
}

#[test]
fn test_duplicate_field_rejected() {
    let spec: ModelSpec = serde_json::from_value(common::model_doc()).unwrap();
    let mut fields: Vec<FieldDef> = spec
        .mapping
        .iter()
        .map(|(name, field_spec)| FieldDef::from_spec(name, field_spec))
        .collect();
    fields.push(fields[0].clone());

    assert!(matches!(
        Dataset::new(spec.dataset, fields),
        Err(ModelError::DuplicateField(name)) if name == "amount"
    ));
}
