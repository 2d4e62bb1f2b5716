//! Integration tests for reading workflow documents.

use serde_json::{Value, json};
use wfdef_builder::{FailureCause, LoadError, LoadOptions};
use wfdef_config::{
  CipherField, ConfigValue, CredentialField, DocumentError, LinkField, NodeField, PointField,
  ReadError, WorkflowDef, WorkflowField, parse_workflow, read_workflow,
};

fn valid_document() -> Value {
  json!({
    "name": "ingest",
    "version": 3,
    "author": "ops",
    "nodes": [
      {
        "node_id": 1,
        "name": "Reader",
        "factory": "io.reader",
        "position": { "x": 10, "y": 20 },
        "settings": {
          "path": "/data/in.csv",
          "retries": { "value": 3, "description": "attempts before giving up" }
        }
      },
      {
        "node_id": 2,
        "name": "Writer",
        "factory": "io.writer",
        "position": { "x": 200, "y": 20 },
        "annotation": {
          "text": "writes the output table",
          "bounds": { "x": 190, "y": 60, "width": 120, "height": 40 },
          "font_size": 12,
          "alignment": "center"
        }
      }
    ],
    "links": [
      {
        "source_id": 1,
        "source_port": 0,
        "dest_id": 2,
        "dest_port": 0,
        "bendpoints": [{ "x": 100, "y": 40 }]
      }
    ],
    "template": {
      "template_id": "base",
      "uri": "https://example.org/templates/base",
      "linked": true
    },
    "cipher": { "algorithm": "AES-256-GCM", "iterations": 10000, "salt": "c2FsdA==" },
    "credentials": { "db": { "name": "warehouse", "login": "etl" } },
    "config": { "threshold": 0.5, "tags": ["a", "b"] }
  })
}

fn leaf_paths(document: &Value) -> Vec<String> {
  let loaded = read_workflow(document, LoadOptions::default()).expect("lenient read");
  loaded
    .failures()
    .leaves()
    .into_iter()
    .map(|(path, _)| path.to_string())
    .collect()
}

#[test]
fn test_read_valid_document() {
  let loaded = read_workflow(&valid_document(), LoadOptions::default()).expect("read");

  assert!(!loaded.has_failures(), "unexpected failures:\n{}", loaded.failures());

  assert_eq!(loaded.name, "ingest");
  assert_eq!(loaded.version, Some(3));
  assert_eq!(loaded.nodes.len(), 2);

  let reader = loaded.get_node(1).expect("reader node");
  assert_eq!(reader.position.x, 10);
  assert_eq!(
    reader.settings["path"].value,
    ConfigValue::String("/data/in.csv".to_string())
  );
  assert_eq!(reader.settings["retries"].value, ConfigValue::Integer(3));
  assert_eq!(
    reader.settings["retries"].description.as_deref(),
    Some("attempts before giving up")
  );

  let writer = loaded.get_node(2).expect("writer node");
  let annotation = writer.annotation.as_ref().expect("annotation");
  assert_eq!(annotation.bounds.width, 120);
  assert_eq!(annotation.font_size, Some(12));

  assert_eq!(loaded.links[0].bendpoints.len(), 1);
  assert!(!loaded.links[0].is_self_loop());
  assert_eq!(loaded.dangling_links().count(), 0);

  let template = loaded.template.as_ref().expect("template");
  assert!(template.linked);
  assert_eq!(template.version, None);

  assert_eq!(loaded.credentials["db"].login.as_deref(), Some("etl"));
  assert_eq!(loaded.config["threshold"].value, ConfigValue::Double(0.5));
}

#[test]
fn test_nested_failure_path() {
  let mut document = valid_document();
  document["nodes"][1]["position"]["x"] = json!("far left");

  let loaded = read_workflow(&document, LoadOptions::default()).expect("read");

  assert_eq!(leaf_paths(&document), vec!["nodes[1].position.x"]);

  let failure = loaded
    .subtree(WorkflowField::Nodes)
    .and_then(|nodes| nodes.index(1))
    .and_then(|node| node.subtree(NodeField::Position))
    .and_then(|position| position.failure(PointField::X))
    .expect("position.x failure");
  let error = failure
    .source_error()
    .and_then(|error| error.downcast_ref::<ReadError>())
    .expect("read error");
  assert!(matches!(
    error,
    ReadError::Mismatch {
      expected: "integer",
      found: "string"
    }
  ));

  // the failed field takes its default, the rest of the document survives
  assert_eq!(loaded.nodes[1].position.x, 0);
  assert_eq!(loaded.nodes[1].position.y, 20);
  assert_eq!(loaded.nodes[0].position.x, 10);
}

#[test]
fn test_many_failures_are_collected() {
  let mut document = valid_document();
  document["name"] = json!("   ");
  document["nodes"][0]
    .as_object_mut()
    .expect("node object")
    .remove("factory");
  document["links"][0]["dest_port"] = json!(5000);
  document["cipher"]["iterations"] = json!(0);
  document["credentials"]["db"]["name"] = json!("");

  assert_eq!(
    leaf_paths(&document),
    vec![
      "cipher.iterations",
      "credentials[\"db\"].name",
      "links[0].dest_port",
      "name",
      "nodes[0].factory",
    ]
  );

  let loaded = read_workflow(&document, LoadOptions::default()).expect("read");
  assert_eq!(loaded.failures().len(), 5);

  let factory = loaded
    .subtree(WorkflowField::Nodes)
    .and_then(|nodes| nodes.index(0))
    .and_then(|node| node.failure(NodeField::Factory))
    .expect("factory failure");
  assert!(factory.is_required_absent());

  let iterations = loaded
    .subtree(WorkflowField::Cipher)
    .and_then(|cipher| cipher.failure(CipherField::Iterations))
    .expect("iterations failure");
  assert!(matches!(iterations.cause(), FailureCause::Validation(_)));

  let dest_port = loaded
    .subtree(WorkflowField::Links)
    .and_then(|links| links.index(0))
    .and_then(|link| link.failure(LinkField::DestPort))
    .expect("dest_port failure");
  assert!(matches!(dest_port.cause(), FailureCause::Validation(_)));

  assert!(
    loaded
      .subtree(WorkflowField::Credentials)
      .and_then(|credentials| credentials.key("db"))
      .and_then(|credential| credential.failure(CredentialField::Name))
      .is_some()
  );
}

#[test]
fn test_wrong_typed_composite_is_substituted() {
  let mut document = valid_document();
  document["nodes"][0]["position"] = json!("top left");
  document["template"] = json!(42);

  assert_eq!(leaf_paths(&document), vec!["nodes[0].position", "template"]);

  let loaded = read_workflow(&document, LoadOptions::default()).expect("read");

  let position = loaded
    .subtree(WorkflowField::Nodes)
    .and_then(|nodes| nodes.index(0))
    .and_then(|node| node.subtree(NodeField::Position))
    .expect("position subtree");
  let own = position.own_failure().expect("own failure");
  assert_eq!(own.field(), "point");
  assert_eq!(loaded.nodes[0].position.x, 0);

  // substituted, not dropped
  let template = loaded.template.as_ref().expect("substituted template");
  assert_eq!(template.template_id, "");
}

#[test]
fn test_wrong_typed_collection() {
  let mut document = valid_document();
  document["links"] = json!({ "first": 1 });

  let loaded = read_workflow(&document, LoadOptions::default()).expect("read");
  let failure = loaded.failure(WorkflowField::Links).expect("links failure");
  assert!(failure.source_error().is_some());
  assert!(loaded.links.is_empty());
  assert_eq!(loaded.nodes.len(), 2);
}

#[test]
fn test_null_and_absent_values() {
  let mut document = valid_document();
  document["credentials"]["db"]["login"] = Value::Null;
  document["author"] = Value::Null;
  document.as_object_mut().expect("object").remove("cipher");

  let loaded = read_workflow(&document, LoadOptions::default()).expect("read");
  assert!(!loaded.has_failures(), "unexpected failures:\n{}", loaded.failures());
  assert_eq!(loaded.credentials["db"].login, None);
  assert_eq!(loaded.author, None);
  assert_eq!(loaded.cipher, None);

  document["name"] = Value::Null;
  let loaded = read_workflow(&document, LoadOptions::default()).expect("read");
  let name = loaded.failure(WorkflowField::Name).expect("name failure");
  assert!(name.is_required_absent());
}

#[test]
fn test_document_must_be_an_object() {
  let loaded = read_workflow(&json!([1, 2, 3]), LoadOptions::default()).expect("read");
  let own = loaded.own_failure().expect("own failure");
  assert_eq!(own.field(), "workflow");
  assert_eq!(*loaded.value(), WorkflowDef::default());
  assert_eq!(loaded.failures().to_string(), "<root>: expected object, found array\n");
}

#[test]
fn test_strict_mode_aborts() {
  let mut document = valid_document();
  document["nodes"][1]["position"]["x"] = json!("far left");
  document["name"] = json!("");

  let err = read_workflow(&document, LoadOptions::strict()).unwrap_err();
  let LoadError::Aborted(failure) = &err;
  // fields are read in declaration order, so the name fails first
  assert_eq!(failure.field(), "name");

  document["name"] = json!("ingest");
  let err = read_workflow(&document, LoadOptions::strict()).unwrap_err();
  assert_eq!(err.failure().field(), "x");

  let loaded = read_workflow(&valid_document(), LoadOptions::strict()).expect("clean document");
  assert!(!loaded.has_failures());
}

#[test]
fn test_parse_workflow() {
  let text = serde_json::to_string(&valid_document()).unwrap();
  let loaded = parse_workflow(&text, LoadOptions::default()).expect("parse");
  assert_eq!(loaded.name, "ingest");

  let err = parse_workflow("{ not json", LoadOptions::default()).unwrap_err();
  assert!(matches!(err, DocumentError::Json(_)));

  let err = parse_workflow(r#"{"name": 7}"#, LoadOptions::strict()).unwrap_err();
  assert!(matches!(err, DocumentError::Load(LoadError::Aborted(_))));
}

#[test]
fn test_normalized_document_reads_back_unchanged() {
  let first = read_workflow(&valid_document(), LoadOptions::default()).expect("read");
  let normalized = serde_json::to_value(first.value()).unwrap();

  let second = read_workflow(&normalized, LoadOptions::default()).expect("read normalized");
  assert!(!second.has_failures());
  assert_eq!(second.value(), first.value());
}

#[test]
fn test_dangling_links() {
  let mut document = valid_document();
  document["links"][0]["dest_id"] = json!(9);

  let loaded = read_workflow(&document, LoadOptions::default()).expect("read");
  assert!(!loaded.has_failures());
  let dangling: Vec<_> = loaded.dangling_links().collect();
  assert_eq!(dangling.len(), 1);
  assert_eq!(dangling[0].dest_id, 9);
}
