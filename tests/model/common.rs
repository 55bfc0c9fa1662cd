//! Shared fixture: a small spending model with two complex dimensions
//! and six raw rows.

#![allow(dead_code)]

use cubist::model::RawRow;
use cubist::{Cube, Dataset, Store};

/// Mapping document used across the model tests.
pub fn model_doc() -> serde_json::Value {
    serde_json::json!({
        "dataset": {
            "name": "test",
            "label": "Test Case Model",
            "description": "I contain many values!",
            "currency": "USD"
        },
        "mapping": {
            "amount": {"type": "value", "column": "amount", "datatype": "float"},
            "time": {"type": "value", "column": "year", "datatype": "date"},
            "field": {"type": "value", "column": "field", "datatype": "string"},
            "to": {
                "type": "entity",
                "fields": [
                    {"name": "name", "column": "to_name", "datatype": "string"},
                    {"name": "label", "column": "to_label", "datatype": "string"},
                    {"name": "const", "constant": "true", "datatype": "constant"}
                ]
            },
            "function": {
                "type": "classifier",
                "taxonomy": "funny",
                "fields": [
                    {"name": "name", "column": "func_name", "datatype": "string"},
                    {"name": "label", "column": "func_label", "datatype": "string"}
                ]
            }
        }
    })
}

/// Six raw rows: amounts sum to 2690.0.
pub fn raw_rows() -> Vec<RawRow> {
    let header = [
        "year",
        "amount",
        "field",
        "to_name",
        "to_label",
        "func_name",
        "func_label",
    ];
    let data = [
        ["2010", "200", "foo", "bcorp", "Big Corp", "food", "Food & Nutrition"],
        ["2009", "190", "bar", "bcorp", "Big Corp", "food", "Food & Nutrition"],
        ["2010", "500", "foo", "acorp", "Another Corp", "food", "Food & Nutrition"],
        ["2009", "900", "qux", "acorp", "Another Corp", "food", "Food & Nutrition"],
        ["2010", "300", "foo", "ccorp", "Central Corp", "school", "Schools & Education"],
        ["2009", "600", "qux", "ccorp", "Central Corp", "school", "Schools & Education"],
    ];
    data.iter()
        .map(|row| {
            header
                .iter()
                .zip(row.iter())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        })
        .collect()
}

/// Generate the schema and load the six rows into a scratch store.
pub fn loaded_cube(store: &Store) -> Cube {
    let dataset = Dataset::from_json(model_doc()).unwrap();
    let cube = dataset.generate(store).unwrap();
    cube.load_all(store, &raw_rows()).unwrap();
    cube
}
