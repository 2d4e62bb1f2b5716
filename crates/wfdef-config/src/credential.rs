use serde::Serialize;
use wfdef_builder::{Constraint, Def, Field, FieldKey, FieldSpec, FieldValue, Slot};

/// A reference to a credential that is resolved when the workflow runs. Only
/// the name and an optional login are stored in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CredentialPlaceholderDef {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub login: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CredentialField {
  Name,
  Login,
}

impl FieldKey for CredentialField {
  fn name(self) -> &'static str {
    match self {
      CredentialField::Name => "name",
      CredentialField::Login => "login",
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct CredentialDraft {
  name: Slot<String>,
  login: Slot<Option<String>>,
}

impl CredentialPlaceholderDef {
  pub const NAME: Field<Self, String> =
    Field::<Self, String>::new(CredentialField::Name, |d, s| d.name = s);
  pub const LOGIN: Field<Self, Option<String>> =
    Field::<Self, Option<String>>::new(CredentialField::Login, |d, s| d.login = s);
}

impl Def for CredentialPlaceholderDef {
  type Field = CredentialField;
  type Draft = CredentialDraft;

  const KIND: &'static str = "credential";
  const FIELDS: &'static [FieldSpec<CredentialField>] = &[
    FieldSpec::required(CredentialField::Name).with(&[Constraint::NonBlank]),
    FieldSpec::optional(CredentialField::Login),
  ];

  fn assemble(draft: &CredentialDraft) -> Self {
    Self {
      name: draft.name.resolve(),
      login: draft.login.resolve(),
    }
  }

  fn to_draft(&self) -> CredentialDraft {
    CredentialDraft {
      name: Slot::Value(self.name.clone()),
      login: Slot::Value(self.login.clone()),
    }
  }
}

impl FieldValue for CredentialPlaceholderDef {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_login_is_optional() {
    let loaded = CredentialPlaceholderDef::builder()
      .set(CredentialPlaceholderDef::NAME, || Ok("db-creds".to_string()), String::new())
      .unwrap()
      .build()
      .unwrap();

    assert_eq!(
      *loaded.value(),
      CredentialPlaceholderDef {
        name: "db-creds".to_string(),
        login: None,
      }
    );
    assert!(!loaded.has_failures());
  }

  #[test]
  fn test_blank_name_is_rejected() {
    let loaded = CredentialPlaceholderDef::builder()
      .set(CredentialPlaceholderDef::NAME, || Ok("   ".to_string()), "unnamed".to_string())
      .unwrap()
      .build()
      .unwrap();

    assert_eq!(loaded.value().name, "unnamed");
    assert!(loaded.failure(CredentialField::Name).is_some());
  }
}
