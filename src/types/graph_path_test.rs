//! Tests for path record decoding.

use super::{PropertyValue, parse_path_records};

#[test]
fn decodes_driver_shaped_json() {
  let json = r#"[
    {
      "path1": {
        "nodes": [
          {"id": 1, "labels": ["Process"], "properties": {"timestamp": 10, "cmdline": "sh"}},
          {"id": 2, "labels": ["File", "Global"], "properties": {"timestamp": 5, "name": ["/tmp/x"]}}
        ],
        "relationships": [
          {"id": 7, "start": 1, "end": 2, "type": "PROC_OBJ", "properties": {"state": "RaW"}}
        ]
      },
      "path2": {"nodes": [{"id": 3, "labels": ["Socket"]}]}
    }
  ]"#;
  let records = parse_path_records(json).unwrap();
  assert_eq!(records.len(), 1);
  let p1 = &records[0]["path1"];
  assert_eq!(p1.nodes.len(), 2);
  assert_eq!(p1.nodes[1].labels.len(), 2);
  assert_eq!(
    p1.nodes[1].property("name"),
    Some(&PropertyValue::List(vec!["/tmp/x".into()]))
  );
  assert_eq!(p1.relationships[0].kind, "PROC_OBJ");
  assert_eq!(p1.relationships[0].state(), Some("RaW"));
  let p2 = &records[0]["path2"];
  assert!(p2.relationships.is_empty());
  assert!(p2.nodes[0].properties.is_empty());
}

#[test]
fn rejects_malformed_json() {
  assert!(parse_path_records("{\"not\": \"a list\"}").is_err());
}
