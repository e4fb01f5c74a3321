//! Tests for `Node`.

use super::{Node, PropertyValue};

#[test]
fn timestamp_requires_integer() {
  let n = Node::new(1).with_property("timestamp", 100);
  assert_eq!(n.timestamp(), Some(100));

  let n = Node::new(2).with_property("timestamp", "100");
  assert_eq!(n.timestamp(), None);

  assert_eq!(Node::new(3).timestamp(), None);
}

#[test]
fn anomalous_flag() {
  assert!(Node::new(1).with_property("anomalous", true).is_anomalous());
  assert!(!Node::new(2).with_property("anomalous", false).is_anomalous());
  assert!(!Node::new(3).is_anomalous());
}

#[test]
fn labels_and_properties() {
  let n = Node::new(5)
    .with_label("Process")
    .with_property("cmdline", "wget http://x");
  assert!(n.has_label("Process"));
  assert!(!n.has_label("File"));
  assert_eq!(
    n.property("cmdline"),
    Some(&PropertyValue::from("wget http://x"))
  );
}
