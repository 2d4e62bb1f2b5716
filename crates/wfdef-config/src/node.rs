use std::collections::BTreeMap;

use serde::Serialize;
use wfdef_builder::{Constraint, Def, Field, FieldKey, FieldSpec, FieldValue, Slot};

use crate::config_value::ConfigValueDef;
use crate::geometry::{BoundsDef, PointDef};

/// A node of the workflow graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeDef {
  pub node_id: u32,
  pub name: String,
  /// Identifier of the implementation that executes the node,
  /// e.g. "org.example.csv-reader".
  pub factory: String,
  pub position: PointDef,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub settings: BTreeMap<String, ConfigValueDef>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub annotation: Option<AnnotationDef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeField {
  NodeId,
  Name,
  Factory,
  Position,
  Settings,
  Annotation,
}

impl FieldKey for NodeField {
  fn name(self) -> &'static str {
    match self {
      NodeField::NodeId => "node_id",
      NodeField::Name => "name",
      NodeField::Factory => "factory",
      NodeField::Position => "position",
      NodeField::Settings => "settings",
      NodeField::Annotation => "annotation",
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct NodeDraft {
  node_id: Slot<u32>,
  name: Slot<String>,
  factory: Slot<String>,
  position: Slot<PointDef>,
  settings: Slot<BTreeMap<String, ConfigValueDef>>,
  annotation: Slot<Option<AnnotationDef>>,
}

impl NodeDef {
  pub const NODE_ID: Field<Self, u32> =
    Field::<Self, u32>::new(NodeField::NodeId, |d, s| d.node_id = s);
  pub const NAME: Field<Self, String> =
    Field::<Self, String>::new(NodeField::Name, |d, s| d.name = s);
  pub const FACTORY: Field<Self, String> =
    Field::<Self, String>::new(NodeField::Factory, |d, s| d.factory = s);
  pub const POSITION: Field<Self, PointDef> =
    Field::<Self, PointDef>::new(NodeField::Position, |d, s| d.position = s);
  pub const SETTINGS: Field<Self, BTreeMap<String, ConfigValueDef>> =
    Field::<Self, BTreeMap<String, ConfigValueDef>>::new(
      NodeField::Settings,
      |d, s| d.settings = s,
    );
  pub const ANNOTATION: Field<Self, Option<AnnotationDef>> =
    Field::<Self, Option<AnnotationDef>>::new(NodeField::Annotation, |d, s| d.annotation = s);
}

impl Def for NodeDef {
  type Field = NodeField;
  type Draft = NodeDraft;

  const KIND: &'static str = "node";
  const FIELDS: &'static [FieldSpec<NodeField>] = &[
    FieldSpec::required(NodeField::NodeId),
    FieldSpec::required(NodeField::Name).with(&[Constraint::NonBlank, Constraint::MaxLen(256)]),
    FieldSpec::required(NodeField::Factory).with(&[Constraint::NonBlank]),
    FieldSpec::required(NodeField::Position),
    FieldSpec::optional(NodeField::Settings),
    FieldSpec::optional(NodeField::Annotation),
  ];

  fn assemble(draft: &NodeDraft) -> Self {
    Self {
      node_id: draft.node_id.resolve(),
      name: draft.name.resolve(),
      factory: draft.factory.resolve(),
      position: draft.position.resolve(),
      settings: draft.settings.resolve(),
      annotation: draft.annotation.resolve(),
    }
  }

  fn to_draft(&self) -> NodeDraft {
    NodeDraft {
      node_id: Slot::Value(self.node_id),
      name: Slot::Value(self.name.clone()),
      factory: Slot::Value(self.factory.clone()),
      position: Slot::Value(self.position.clone()),
      settings: Slot::Value(self.settings.clone()),
      annotation: Slot::Value(self.annotation.clone()),
    }
  }
}

impl FieldValue for NodeDef {}

pub const ALIGNMENTS: &[&str] = &["left", "center", "right"];

/// Free-text note drawn on the canvas, optionally attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationDef {
  pub text: String,
  pub bounds: BoundsDef,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub font_size: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub alignment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnnotationField {
  Text,
  Bounds,
  FontSize,
  Alignment,
}

impl FieldKey for AnnotationField {
  fn name(self) -> &'static str {
    match self {
      AnnotationField::Text => "text",
      AnnotationField::Bounds => "bounds",
      AnnotationField::FontSize => "font_size",
      AnnotationField::Alignment => "alignment",
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct AnnotationDraft {
  text: Slot<String>,
  bounds: Slot<BoundsDef>,
  font_size: Slot<Option<u32>>,
  alignment: Slot<Option<String>>,
}

impl AnnotationDef {
  pub const TEXT: Field<Self, String> =
    Field::<Self, String>::new(AnnotationField::Text, |d, s| d.text = s);
  pub const BOUNDS: Field<Self, BoundsDef> =
    Field::<Self, BoundsDef>::new(AnnotationField::Bounds, |d, s| d.bounds = s);
  pub const FONT_SIZE: Field<Self, Option<u32>> =
    Field::<Self, Option<u32>>::new(AnnotationField::FontSize, |d, s| d.font_size = s);
  pub const ALIGNMENT: Field<Self, Option<String>> =
    Field::<Self, Option<String>>::new(AnnotationField::Alignment, |d, s| d.alignment = s);
}

impl Def for AnnotationDef {
  type Field = AnnotationField;
  type Draft = AnnotationDraft;

  const KIND: &'static str = "annotation";
  const FIELDS: &'static [FieldSpec<AnnotationField>] = &[
    FieldSpec::optional(AnnotationField::Text).with(&[Constraint::MaxLen(10_000)]),
    FieldSpec::required(AnnotationField::Bounds),
    FieldSpec::optional(AnnotationField::FontSize).with(&[Constraint::Range { min: 1, max: 256 }]),
    FieldSpec::optional(AnnotationField::Alignment).with(&[Constraint::OneOf(ALIGNMENTS)]),
  ];

  fn assemble(draft: &AnnotationDraft) -> Self {
    Self {
      text: draft.text.resolve(),
      bounds: draft.bounds.resolve(),
      font_size: draft.font_size.resolve(),
      alignment: draft.alignment.resolve(),
    }
  }

  fn to_draft(&self) -> AnnotationDraft {
    AnnotationDraft {
      text: Slot::Value(self.text.clone()),
      bounds: Slot::Value(self.bounds.clone()),
      font_size: Slot::Value(self.font_size),
      alignment: Slot::Value(self.alignment.clone()),
    }
  }
}

impl FieldValue for AnnotationDef {}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geometry::PointField;
  use wfdef_builder::Loaded;

  fn position(x: i64, y: i64) -> Loaded<PointDef> {
    PointDef::builder()
      .set(PointDef::X, || Ok(x), 0)
      .unwrap()
      .set(PointDef::Y, || Ok(y), 0)
      .unwrap()
      .build()
      .unwrap()
  }

  #[test]
  fn test_node_without_position() {
    let loaded = NodeDef::builder()
      .set(NodeDef::NODE_ID, || Ok(4), 0)
      .unwrap()
      .set(NodeDef::NAME, || Ok("Read CSV".to_string()), String::new())
      .unwrap()
      .set(NodeDef::FACTORY, || Ok("org.example.csv-reader".to_string()), String::new())
      .unwrap()
      .build()
      .unwrap();

    assert_eq!(loaded.value().position, PointDef::default());
    let failure = loaded.failure(NodeField::Position).expect("position failure");
    assert!(failure.is_required_absent());
    assert_eq!(loaded.failures().len(), 1);
  }

  #[test]
  fn test_nested_position_failures() {
    let broken = PointDef::builder()
      .set(PointDef::X, || Ok(10), 0)
      .unwrap()
      .build()
      .unwrap();

    let mut builder = NodeDef::builder();
    builder
      .set(NodeDef::NODE_ID, || Ok(1), 0)
      .unwrap()
      .set(NodeDef::NAME, || Ok("Filter".to_string()), String::new())
      .unwrap()
      .set(NodeDef::FACTORY, || Ok("org.example.filter".to_string()), String::new())
      .unwrap()
      .set_nested(NodeDef::POSITION, || Ok(broken), PointDef::default())
      .unwrap();
    let loaded = builder.build().unwrap();

    assert!(loaded.has_failures());
    assert_eq!(loaded.value().position, PointDef { x: 10, y: 0 });
    let subtree = loaded.subtree(NodeField::Position).expect("position subtree");
    assert!(subtree.failure(PointField::Y).is_some_and(|f| f.is_required_absent()));

    builder
      .set_nested(NodeDef::POSITION, || Ok(position(3, 4)), PointDef::default())
      .unwrap();
    assert!(!builder.build().unwrap().has_failures());
  }

  #[test]
  fn test_annotation_constraints() {
    let loaded = AnnotationDef::builder()
      .set(
        AnnotationDef::BOUNDS,
        || {
          Ok(BoundsDef {
            x: 0,
            y: 0,
            width: 100,
            height: 20,
          })
        },
        BoundsDef::default(),
      )
      .unwrap()
      .set(AnnotationDef::FONT_SIZE, || Ok(Some(0)), Some(12))
      .unwrap()
      .set(AnnotationDef::ALIGNMENT, || Ok(Some("justify".to_string())), None)
      .unwrap()
      .build()
      .unwrap();

    assert_eq!(loaded.value().font_size, Some(12));
    assert_eq!(loaded.value().alignment, None);
    assert_eq!(loaded.failures().len(), 2);
  }
}
