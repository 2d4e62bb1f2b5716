use serde::Serialize;
use wfdef_builder::{Constraint, Def, Field, FieldKey, FieldSpec, FieldValue, Slot};

/// Link from a workflow to the template it was instantiated from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateDef {
  pub template_id: String,
  pub uri: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  /// Whether the workflow still tracks updates of the template.
  pub linked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateField {
  TemplateId,
  Uri,
  Version,
  Linked,
}

impl FieldKey for TemplateField {
  fn name(self) -> &'static str {
    match self {
      TemplateField::TemplateId => "template_id",
      TemplateField::Uri => "uri",
      TemplateField::Version => "version",
      TemplateField::Linked => "linked",
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateDraft {
  template_id: Slot<String>,
  uri: Slot<String>,
  version: Slot<Option<String>>,
  linked: Slot<bool>,
}

impl TemplateDef {
  pub const TEMPLATE_ID: Field<Self, String> =
    Field::<Self, String>::new(TemplateField::TemplateId, |d, s| d.template_id = s);
  pub const URI: Field<Self, String> =
    Field::<Self, String>::new(TemplateField::Uri, |d, s| d.uri = s);
  pub const VERSION: Field<Self, Option<String>> =
    Field::<Self, Option<String>>::new(TemplateField::Version, |d, s| d.version = s);
  pub const LINKED: Field<Self, bool> =
    Field::<Self, bool>::new(TemplateField::Linked, |d, s| d.linked = s);
}

impl Def for TemplateDef {
  type Field = TemplateField;
  type Draft = TemplateDraft;

  const KIND: &'static str = "template";
  const FIELDS: &'static [FieldSpec<TemplateField>] = &[
    FieldSpec::required(TemplateField::TemplateId).with(&[Constraint::NonBlank]),
    FieldSpec::required(TemplateField::Uri).with(&[Constraint::NonBlank, Constraint::MaxLen(2048)]),
    FieldSpec::optional(TemplateField::Version),
    FieldSpec::optional(TemplateField::Linked),
  ];

  fn assemble(draft: &TemplateDraft) -> Self {
    Self {
      template_id: draft.template_id.resolve(),
      uri: draft.uri.resolve(),
      version: draft.version.resolve(),
      linked: draft.linked.resolve(),
    }
  }

  fn to_draft(&self) -> TemplateDraft {
    TemplateDraft {
      template_id: Slot::Value(self.template_id.clone()),
      uri: Slot::Value(self.uri.clone()),
      version: Slot::Value(self.version.clone()),
      linked: Slot::Value(self.linked),
    }
  }
}

impl FieldValue for TemplateDef {}
