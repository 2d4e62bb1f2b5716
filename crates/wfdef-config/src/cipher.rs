use serde::Serialize;
use wfdef_builder::{Constraint, Def, Field, FieldKey, FieldSpec, FieldValue, Slot};

pub const CIPHER_ALGORITHMS: &[&str] = &["AES-128-CBC", "AES-256-CBC", "AES-256-GCM"];

/// Parameters used to encrypt secret values stored in the workflow. The key
/// itself is never part of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CipherDef {
  pub algorithm: String,
  pub iterations: u32,
  pub salt: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub key_length: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CipherField {
  Algorithm,
  Iterations,
  Salt,
  KeyLength,
}

impl FieldKey for CipherField {
  fn name(self) -> &'static str {
    match self {
      CipherField::Algorithm => "algorithm",
      CipherField::Iterations => "iterations",
      CipherField::Salt => "salt",
      CipherField::KeyLength => "key_length",
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct CipherDraft {
  algorithm: Slot<String>,
  iterations: Slot<u32>,
  salt: Slot<String>,
  key_length: Slot<Option<u32>>,
}

impl CipherDef {
  pub const ALGORITHM: Field<Self, String> =
    Field::<Self, String>::new(CipherField::Algorithm, |d, s| d.algorithm = s);
  pub const ITERATIONS: Field<Self, u32> =
    Field::<Self, u32>::new(CipherField::Iterations, |d, s| d.iterations = s);
  pub const SALT: Field<Self, String> =
    Field::<Self, String>::new(CipherField::Salt, |d, s| d.salt = s);
  pub const KEY_LENGTH: Field<Self, Option<u32>> =
    Field::<Self, Option<u32>>::new(CipherField::KeyLength, |d, s| d.key_length = s);
}

impl Def for CipherDef {
  type Field = CipherField;
  type Draft = CipherDraft;

  const KIND: &'static str = "cipher";
  const FIELDS: &'static [FieldSpec<CipherField>] = &[
    FieldSpec::required(CipherField::Algorithm).with(&[Constraint::OneOf(CIPHER_ALGORITHMS)]),
    FieldSpec::required(CipherField::Iterations).with(&[Constraint::Range {
      min: 1,
      max: 10_000_000,
    }]),
    FieldSpec::required(CipherField::Salt).with(&[Constraint::NonBlank]),
    FieldSpec::optional(CipherField::KeyLength).with(&[Constraint::Range { min: 128, max: 512 }]),
  ];

  fn assemble(draft: &CipherDraft) -> Self {
    Self {
      algorithm: draft.algorithm.resolve(),
      iterations: draft.iterations.resolve(),
      salt: draft.salt.resolve(),
      key_length: draft.key_length.resolve(),
    }
  }

  fn to_draft(&self) -> CipherDraft {
    CipherDraft {
      algorithm: Slot::Value(self.algorithm.clone()),
      iterations: Slot::Value(self.iterations),
      salt: Slot::Value(self.salt.clone()),
      key_length: Slot::Value(self.key_length),
    }
  }
}

impl FieldValue for CipherDef {}
