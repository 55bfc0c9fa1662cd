//! Aggregation over the loaded star schema: drilldowns, cuts, ordering
//! and paging.

mod common;

use cubist::{AggregateRequest, ModelError, Store};

#[test]
fn test_total_summary() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    let result = cube
        .aggregate(&store, &AggregateRequest::new())
        .unwrap();

    assert_eq!(result.summary["amount"], serde_json::json!(2690.0));
    assert_eq!(result.summary["num_entries"], serde_json::json!(6));
    assert_eq!(result.drilldown.len(), 1);
    assert_eq!(result.drilldown[0]["amount"], serde_json::json!(2690.0));
    assert_eq!(result.drilldown[0]["num_entries"], serde_json::json!(6));
}

#[test]
fn test_cut_filters_entries() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    let request = AggregateRequest::new().cut("field", "foo");
    let result = cube.aggregate(&store, &request).unwrap();

    assert_eq!(result.summary["amount"], serde_json::json!(1000.0));
    assert_eq!(result.summary["num_entries"], serde_json::json!(3));
}

#[test]
fn test_cuts_on_one_key_are_alternatives() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    let request = AggregateRequest::new()
        .cut("field", "foo")
        .cut("field", "qux");
    let result = cube.aggregate(&store, &request).unwrap();

    assert_eq!(result.summary["amount"], serde_json::json!(2500.0));
    assert_eq!(result.summary["num_entries"], serde_json::json!(5));
}

#[test]
fn test_cuts_across_keys_are_conjunctive() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    let request = AggregateRequest::new()
        .cut("field", "qux")
        .cut("to.name", "acorp");
    let result = cube.aggregate(&store, &request).unwrap();

    assert_eq!(result.summary["amount"], serde_json::json!(900.0));
    assert_eq!(result.summary["num_entries"], serde_json::json!(1));
}

#[test]
fn test_cut_on_complex_attribute() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    let request = AggregateRequest::new().cut("function.name", "school");
    let result = cube.aggregate(&store, &request).unwrap();

    assert_eq!(result.summary["amount"], serde_json::json!(900.0));
    assert_eq!(result.summary["num_entries"], serde_json::json!(2));
}

#[test]
fn test_drilldown_on_complex_dimension() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    let request = AggregateRequest::new().drilldown("function");
    let result = cube.aggregate(&store, &request).unwrap();

    // Two classifiers, metric descending by default.
    assert_eq!(result.drilldown.len(), 2);
    let food = &result.drilldown[0];
    assert_eq!(food["function"]["name"], serde_json::json!("food"));
    assert_eq!(food["amount"], serde_json::json!(1790.0));
    assert_eq!(food["num_entries"], serde_json::json!(4));

    let school = &result.drilldown[1];
    assert_eq!(school["function"]["name"], serde_json::json!("school"));
    assert_eq!(school["amount"], serde_json::json!(900.0));
    assert_eq!(school["num_entries"], serde_json::json!(2));

    // The summary covers the whole result set.
    assert_eq!(result.summary["amount"], serde_json::json!(2690.0));
    assert_eq!(result.summary["num_entries"], serde_json::json!(6));
}

#[test]
fn test_drilldown_on_sub_attribute() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    let request = AggregateRequest::new().drilldown("to.name");
    let result = cube.aggregate(&store, &request).unwrap();

    assert_eq!(result.drilldown.len(), 3);
    let names: Vec<&serde_json::Value> = result
        .drilldown
        .iter()
        .map(|r| &r["to"]["name"])
        .collect();
    assert_eq!(
        names,
        [
            &serde_json::json!("acorp"),
            &serde_json::json!("ccorp"),
            &serde_json::json!("bcorp")
        ]
    );
    assert_eq!(result.drilldown[0]["amount"], serde_json::json!(1400.0));
}

#[test]
fn test_drilldown_on_value_dimension() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    let request = AggregateRequest::new()
        .drilldown("time")
        .order("time", false);
    let result = cube.aggregate(&store, &request).unwrap();

    assert_eq!(result.drilldown.len(), 2);
    assert_eq!(result.drilldown[0]["time"], serde_json::json!("2009"));
    assert_eq!(result.drilldown[0]["amount"], serde_json::json!(1690.0));
    assert_eq!(result.drilldown[1]["time"], serde_json::json!("2010"));
    assert_eq!(result.drilldown[1]["amount"], serde_json::json!(1000.0));
}

#[test]
fn test_drilldown_with_cut() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    let request = AggregateRequest::new()
        .drilldown("function")
        .cut("field", "foo");
    let result = cube.aggregate(&store, &request).unwrap();

    assert_eq!(result.summary["amount"], serde_json::json!(1000.0));
    assert_eq!(result.summary["num_entries"], serde_json::json!(3));
}

#[test]
fn test_pagination_slices_after_summary() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    let request = AggregateRequest::new()
        .drilldown("to.name")
        .pagesize(2)
        .page(2);
    let result = cube.aggregate(&store, &request).unwrap();

    // Page 2 of 3 rows at pagesize 2 holds the last row.
    assert_eq!(result.drilldown.len(), 1);
    assert_eq!(
        result.drilldown[0]["to"]["name"],
        serde_json::json!("bcorp")
    );
    // The summary is unaffected by paging.
    assert_eq!(result.summary["amount"], serde_json::json!(2690.0));
    assert_eq!(result.summary["num_entries"], serde_json::json!(6));
}

#[test]
fn test_unknown_names_are_rejected() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    let request = AggregateRequest::new().drilldown("nope");
    assert!(matches!(
        cube.aggregate(&store, &request),
        Err(ModelError::UnknownField(_))
    ));

    let request = AggregateRequest::new().cut("to.nope", "x");
    assert!(matches!(
        cube.aggregate(&store, &request),
        Err(ModelError::UnknownAttribute(_, _))
    ));
}

#[test]
fn test_result_to_json_shape() {
    let store = Store::open_in_memory().unwrap();
    let cube = common::loaded_cube(&store);

    let result = cube
        .aggregate(&store, &AggregateRequest::new().drilldown("function"))
        .unwrap();
    let json = result.to_json();

    assert!(json["drilldown"].is_array());
    assert_eq!(json["summary"]["num_entries"], serde_json::json!(6));
}
