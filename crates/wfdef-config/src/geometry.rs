use serde::Serialize;
use wfdef_builder::{Constraint, Def, Field, FieldKey, FieldSpec, FieldValue, Slot};

const MAX_EXTENT: Constraint = Constraint::Range {
  min: 0,
  max: 100_000,
};

/// A point on the workflow canvas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PointDef {
  pub x: i64,
  pub y: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PointField {
  X,
  Y,
}

impl FieldKey for PointField {
  fn name(self) -> &'static str {
    match self {
      PointField::X => "x",
      PointField::Y => "y",
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct PointDraft {
  x: Slot<i64>,
  y: Slot<i64>,
}

impl PointDef {
  pub const X: Field<Self, i64> = Field::<Self, i64>::new(PointField::X, |d, s| d.x = s);
  pub const Y: Field<Self, i64> = Field::<Self, i64>::new(PointField::Y, |d, s| d.y = s);
}

impl Def for PointDef {
  type Field = PointField;
  type Draft = PointDraft;

  const KIND: &'static str = "point";
  const FIELDS: &'static [FieldSpec<PointField>] = &[
    FieldSpec::required(PointField::X),
    FieldSpec::required(PointField::Y),
  ];

  fn assemble(draft: &PointDraft) -> Self {
    Self {
      x: draft.x.resolve(),
      y: draft.y.resolve(),
    }
  }

  fn to_draft(&self) -> PointDraft {
    PointDraft {
      x: Slot::Value(self.x),
      y: Slot::Value(self.y),
    }
  }
}

impl FieldValue for PointDef {}

/// A rectangle on the workflow canvas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoundsDef {
  pub x: i64,
  pub y: i64,
  pub width: u32,
  pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BoundsField {
  X,
  Y,
  Width,
  Height,
}

impl FieldKey for BoundsField {
  fn name(self) -> &'static str {
    match self {
      BoundsField::X => "x",
      BoundsField::Y => "y",
      BoundsField::Width => "width",
      BoundsField::Height => "height",
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct BoundsDraft {
  x: Slot<i64>,
  y: Slot<i64>,
  width: Slot<u32>,
  height: Slot<u32>,
}

impl BoundsDef {
  pub const X: Field<Self, i64> = Field::<Self, i64>::new(BoundsField::X, |d, s| d.x = s);
  pub const Y: Field<Self, i64> = Field::<Self, i64>::new(BoundsField::Y, |d, s| d.y = s);
  pub const WIDTH: Field<Self, u32> =
    Field::<Self, u32>::new(BoundsField::Width, |d, s| d.width = s);
  pub const HEIGHT: Field<Self, u32> =
    Field::<Self, u32>::new(BoundsField::Height, |d, s| d.height = s);
}

impl Def for BoundsDef {
  type Field = BoundsField;
  type Draft = BoundsDraft;

  const KIND: &'static str = "bounds";
  const FIELDS: &'static [FieldSpec<BoundsField>] = &[
    FieldSpec::required(BoundsField::X),
    FieldSpec::required(BoundsField::Y),
    FieldSpec::required(BoundsField::Width).with(&[MAX_EXTENT]),
    FieldSpec::required(BoundsField::Height).with(&[MAX_EXTENT]),
  ];

  fn assemble(draft: &BoundsDraft) -> Self {
    Self {
      x: draft.x.resolve(),
      y: draft.y.resolve(),
      width: draft.width.resolve(),
      height: draft.height.resolve(),
    }
  }

  fn to_draft(&self) -> BoundsDraft {
    BoundsDraft {
      x: Slot::Value(self.x),
      y: Slot::Value(self.y),
      width: Slot::Value(self.width),
      height: Slot::Value(self.height),
    }
  }
}

impl FieldValue for BoundsDef {}
