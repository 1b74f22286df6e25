//! Shape of the serialized results handed to the host UI.
//!
//! The grid consumes camelCase JSON; these tests pin the field names and the
//! optional fields that are left out.
#![cfg(feature = "serde")]

use result_diff_rs::{
    DiffRun, Field, MonospaceMeasure, ResultSet, RunPolicy, ScanOptions, SourceError, Value,
    ViewMaterializer, ViewOptions, diff_all,
};
use serde_json::json;

fn people(second: &str) -> ResultSet {
    ResultSet::read(
        vec![Field::new("id"), Field::new("name")],
        vec![
            vec![Value::from(1), Value::from("Alice")],
            vec![Value::from(2), Value::from(second)],
        ],
    )
}

#[test]
fn test_view_serializes_camel_case() {
    let view = ViewMaterializer::new(MonospaceMeasure::new(10.0))
        .diff_and_map_to_view(people("Bob"), people("Bobby"));
    let json = serde_json::to_value(&view).unwrap();

    assert_eq!(json["diffCount"], 1);
    assert_eq!(json["rowCount"], 2);
    let left = &json["viewValues"][0];
    assert_eq!(left["success"], true);
    assert!(left.get("error").is_none());
    assert!(left.get("rowsAffected").is_none());
    assert_eq!(
        left["columns"][0],
        json!({ "name": "", "id": "-1", "width": 51, "sticky": "left" })
    );
    assert_eq!(left["columns"][2], json!({ "name": "name", "id": "1", "width": 91 }));
    assert_eq!(
        left["rows"][0],
        json!({ "data": [1, 1, "Alice"], "containsError": false })
    );
    assert_eq!(
        left["rows"][1],
        json!({
            "data": [2, 2, "Bob"],
            "containsError": true,
            "errorArray": [false, false, true],
        })
    );
    assert_eq!(json["viewValues"][1]["rows"][1]["data"][2], "Bobby");
}

#[test]
fn test_failed_source_serializes_error() {
    let error = SourceError::new("table or view does not exist").with_code("ORA-00942");
    let view = ViewMaterializer::new(MonospaceMeasure::default())
        .diff_and_map_to_view(ResultSet::failed(error), ResultSet::write(4));
    let json = serde_json::to_value(&view).unwrap();
    let [failed, write] = [&json["viewValues"][0], &json["viewValues"][1]];
    assert_eq!(failed["success"], false);
    assert_eq!(
        failed["error"],
        json!({ "message": "table or view does not exist", "code": "ORA-00942" })
    );
    assert_eq!(write["rowsAffected"], 4);
    assert_eq!(write["columns"], json!([]));
}

#[test]
fn test_scan_result_serializes_sparse_maps() {
    let result = diff_all(vec![people("Bob"), people("Bobby")], ScanOptions::default()).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["diffRowCount"], 1);
    assert_eq!(json["divergentRows"], json!([1]));
    assert_eq!(json["diffMaps"], json!([{ "1": [1] }, { "1": [1] }]));

    let same = diff_all(vec![people("Bob"), people("Bob")], ScanOptions::default()).unwrap();
    assert_eq!(serde_json::to_value(&same).unwrap()["diffMaps"], json!(null));
}

#[test]
fn test_result_sets_deserialize_from_host_json() {
    let raw = json!([
        {
            "fields": [{ "name": "ID" }, { "name": "AMOUNT", "typeName": "NUMBER" }],
            "rows": [[1, 2.5], [2, null]],
        },
        {
            "fields": [{ "name": "id" }, { "name": "amount" }],
            "rows": [[1, "2.5"], [2, null]],
        },
    ]);
    let sources: Vec<ResultSet> = serde_json::from_value(raw).unwrap();
    assert_eq!(sources[0].rows.as_ref().unwrap()[1][1], Value::Null);

    let result = diff_all(sources, ScanOptions::default()).unwrap();
    assert!(result.is_identical());
}

#[test]
fn test_options_deserialize_with_defaults() {
    let options: ViewOptions = serde_json::from_value(json!({ "sortResults": true })).unwrap();
    assert!(options.sort_results);
    assert_eq!(options, ViewOptions::default().with_sort(true));

    let scan: ScanOptions = serde_json::from_value(json!({ "chunkSize": 10 })).unwrap();
    assert_eq!(scan, ScanOptions::default().with_chunk_size(10));

    let policy: RunPolicy = serde_json::from_value(json!("stopOnFirstDivergence")).unwrap();
    let pages = vec![
        Ok::<_, core::convert::Infallible>(vec![people("Bob"), people("Bobby")]),
        Ok(vec![people("Bob"), people("Bob")]),
    ];
    let summary = DiffRun::new(pages, ScanOptions::default(), policy)
        .unwrap()
        .summarize()
        .unwrap();
    assert_eq!(summary.pages, 1);
    assert!(summary.stopped_early);
}
