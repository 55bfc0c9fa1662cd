//! Schema generation, loading and materialization against a scratch
//! store.

mod common;

use cubist::sql::expr::{table_col, ExprExt};
use cubist::{Dataset, ModelError, Store, Value};

#[test]
fn test_generate_creates_star_schema() {
    let store = Store::open_in_memory().unwrap();
    let dataset = Dataset::from_json(common::model_doc()).unwrap();
    dataset.generate(&store).unwrap();

    assert!(store.has_table("test_entry").unwrap());
    assert!(store.has_table("test_entity").unwrap());
    assert!(store.has_table("test_funny").unwrap());

    let fact = store.table_columns("test_entry").unwrap();
    assert!(fact.contains(&"id".to_string()));
    assert!(fact.contains(&"amount".to_string()));
    assert!(fact.contains(&"time".to_string()));
    assert!(fact.contains(&"field".to_string()));
    assert!(fact.contains(&"to_id".to_string()));
    assert!(fact.contains(&"function_id".to_string()));

    assert_eq!(
        store.table_columns("test_entity").unwrap(),
        ["id", "name", "label", "const"]
    );
    assert_eq!(
        store.table_columns("test_funny").unwrap(),
        ["id", "name", "label"]
    );
}

#[test]
fn test_generate_is_idempotent() {
    let store = Store::open_in_memory().unwrap();
    let dataset = Dataset::from_json(common::model_doc()).unwrap();
    dataset.generate(&store).unwrap();
    let before = store.table_columns("test_entry").unwrap();

    dataset.generate(&store).unwrap();
    assert_eq!(store.table_columns("test_entry").unwrap(), before);
}

#[test]
fn test_load_dedups_reference_rows() {
    let store = Store::open_in_memory().unwrap();
    common::loaded_cube(&store);

    let count = |sql: &str| {
        let (_, rows) = store.query_rows(sql).unwrap();
        rows[0][0].clone()
    };

    assert_eq!(count("SELECT COUNT(*) FROM test_entry"), Value::Integer(6));
    // Three distinct entities, two distinct classifiers.
    assert_eq!(count("SELECT COUNT(*) FROM test_entity"), Value::Integer(3));
    assert_eq!(count("SELECT COUNT(*) FROM test_funny"), Value::Integer(2));
}

#[test]
fn test_load_returns_fresh_fact_ids() {
    let store = Store::open_in_memory().unwrap();
    let dataset = Dataset::from_json(common::model_doc()).unwrap();
    let cube = dataset.generate(&store).unwrap();

    let rows = common::raw_rows();
    let first = cube.load(&store, &rows[0]).unwrap();
    let second = cube.load(&store, &rows[0]).unwrap();
    // Fact rows carry no natural key, so identical input inserts again.
    assert_ne!(first, second);
}

#[test]
fn test_materialize_nests_complex_dimensions() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    let records = cube.materialize_all(&store, None).unwrap();
    assert_eq!(records.len(), 6);

    let record = records
        .iter()
        .find(|r| r["amount"] == serde_json::json!(200.0))
        .unwrap();
    assert_eq!(record["time"], serde_json::json!("2010"));
    assert_eq!(record["field"], serde_json::json!("foo"));
    assert_eq!(record["to"]["name"], serde_json::json!("bcorp"));
    assert_eq!(record["to"]["label"], serde_json::json!("Big Corp"));
    assert_eq!(record["to"]["const"], serde_json::json!("true"));
    assert_eq!(record["function"]["name"], serde_json::json!("food"));
    assert_eq!(
        record["function"]["label"],
        serde_json::json!("Food & Nutrition")
    );
}

#[test]
fn test_materialize_filter_and_order() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    let filter = table_col("entry", "field").eq(cubist::sql::expr::lit_str("foo"));
    let mut amounts = Vec::new();
    cube.materialize(&store, Some(filter), &[("amount", true)], |record| {
        amounts.push(record["amount"].clone());
        Ok(())
    })
    .unwrap();

    assert_eq!(
        amounts,
        vec![
            serde_json::json!(500.0),
            serde_json::json!(300.0),
            serde_json::json!(200.0)
        ]
    );
}

#[test]
fn test_key_resolution() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    assert_eq!(
        cube.key("amount").unwrap(),
        ("entry".to_string(), "amount".to_string())
    );
    assert_eq!(
        cube.key("to.label").unwrap(),
        ("to".to_string(), "label".to_string())
    );
    assert_eq!(
        cube.key("function").unwrap(),
        ("function".to_string(), "id".to_string())
    );
    assert!(matches!(
        cube.key("nope"),
        Err(ModelError::UnknownField(_))
    ));
    assert!(matches!(
        cube.key("to.nope"),
        Err(ModelError::UnknownAttribute(_, _))
    ));
}

#[test]
fn test_flush_keeps_schema() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    cube.flush(&store).unwrap();

    let (_, rows) = store.query_rows("SELECT COUNT(*) FROM test_entry").unwrap();
    assert_eq!(rows[0][0], Value::Integer(0));
    let (_, rows) = store.query_rows("SELECT COUNT(*) FROM test_entity").unwrap();
    assert_eq!(rows[0][0], Value::Integer(0));
    assert!(store.has_table("test_entry").unwrap());
    assert!(store.has_table("test_funny").unwrap());
}

#[test]
fn test_drop_removes_tables() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    cube.drop(&store).unwrap();

    assert!(!store.has_table("test_entry").unwrap());
    assert!(!store.has_table("test_entity").unwrap());
    assert!(!store.has_table("test_funny").unwrap());
}
