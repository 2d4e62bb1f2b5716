use serde::Serialize;
use wfdef_builder::{Constraint, Def, Field, FieldKey, FieldSpec, FieldValue, Slot};

use crate::geometry::PointDef;

const PORT_RANGE: Constraint = Constraint::Range { min: 0, max: 1024 };

/// A connection from an output port of one node to an input port of another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkDef {
  pub source_id: u32,
  pub source_port: u32,
  pub dest_id: u32,
  pub dest_port: u32,
  /// Intermediate points the link is routed through on the canvas.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub bendpoints: Vec<PointDef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LinkField {
  SourceId,
  SourcePort,
  DestId,
  DestPort,
  Bendpoints,
}

impl FieldKey for LinkField {
  fn name(self) -> &'static str {
    match self {
      LinkField::SourceId => "source_id",
      LinkField::SourcePort => "source_port",
      LinkField::DestId => "dest_id",
      LinkField::DestPort => "dest_port",
      LinkField::Bendpoints => "bendpoints",
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct LinkDraft {
  source_id: Slot<u32>,
  source_port: Slot<u32>,
  dest_id: Slot<u32>,
  dest_port: Slot<u32>,
  bendpoints: Slot<Vec<PointDef>>,
}

impl LinkDef {
  pub const SOURCE_ID: Field<Self, u32> =
    Field::<Self, u32>::new(LinkField::SourceId, |d, s| d.source_id = s);
  pub const SOURCE_PORT: Field<Self, u32> =
    Field::<Self, u32>::new(LinkField::SourcePort, |d, s| d.source_port = s);
  pub const DEST_ID: Field<Self, u32> =
    Field::<Self, u32>::new(LinkField::DestId, |d, s| d.dest_id = s);
  pub const DEST_PORT: Field<Self, u32> =
    Field::<Self, u32>::new(LinkField::DestPort, |d, s| d.dest_port = s);
  pub const BENDPOINTS: Field<Self, Vec<PointDef>> =
    Field::<Self, Vec<PointDef>>::new(LinkField::Bendpoints, |d, s| d.bendpoints = s);

  /// True when both ends are the same node.
  pub fn is_self_loop(&self) -> bool {
    self.source_id == self.dest_id
  }
}

impl Def for LinkDef {
  type Field = LinkField;
  type Draft = LinkDraft;

  const KIND: &'static str = "link";
  const FIELDS: &'static [FieldSpec<LinkField>] = &[
    FieldSpec::required(LinkField::SourceId),
    FieldSpec::required(LinkField::SourcePort).with(&[PORT_RANGE]),
    FieldSpec::required(LinkField::DestId),
    FieldSpec::required(LinkField::DestPort).with(&[PORT_RANGE]),
    FieldSpec::optional(LinkField::Bendpoints).with(&[Constraint::MaxLen(64)]),
  ];

  fn assemble(draft: &LinkDraft) -> Self {
    Self {
      source_id: draft.source_id.resolve(),
      source_port: draft.source_port.resolve(),
      dest_id: draft.dest_id.resolve(),
      dest_port: draft.dest_port.resolve(),
      bendpoints: draft.bendpoints.resolve(),
    }
  }

  fn to_draft(&self) -> LinkDraft {
    LinkDraft {
      source_id: Slot::Value(self.source_id),
      source_port: Slot::Value(self.source_port),
      dest_id: Slot::Value(self.dest_id),
      dest_port: Slot::Value(self.dest_port),
      bendpoints: Slot::Value(self.bendpoints.clone()),
    }
  }
}

impl FieldValue for LinkDef {}
