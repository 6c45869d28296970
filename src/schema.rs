use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::engine::{Field, FieldName, FieldSet};
use super::rules::RuleSet;
use super::value::FieldValue;

/// Named description of one form mode ("login", "signup", ...): which fields
/// exist and which rules guard each of them. Plain serializable data; the
/// engine stays generic over any schema.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    name: String,
    fields: BTreeMap<FieldName, RuleSet>,
}

impl FormSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<FieldName>, rules: impl Into<RuleSet>) -> Self {
        self.fields.insert(name.into(), rules.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules_for(&self, name: &FieldName) -> Option<&RuleSet> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &FieldName> {
        self.fields.keys()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&FieldName, &RuleSet)> {
        self.fields.iter()
    }

    /// Field set for a freshly mounted form: every value empty, validity
    /// already judged by each field's rules.
    pub fn blank_fields(&self) -> FieldSet {
        self.fields
            .iter()
            .map(|(name, rules)| {
                let field = Field::new(FieldValue::Empty, rules.check(&FieldValue::Empty));
                (name.clone(), field)
            })
            .collect()
    }

    /// Turns a typed model into a field set. Model fields the schema does
    /// not name carry no rules and come out valid.
    pub fn assemble<M: FormModel>(&self, model: M) -> FieldSet {
        model
            .field_values()
            .into_iter()
            .map(|(name, value)| {
                let is_valid = self
                    .rules_for(&name)
                    .is_none_or(|rules| rules.check(&value));
                (name, Field { value, is_valid })
            })
            .collect()
    }
}

/// A typed model whose fields decompose into named form values. Implemented
/// via `#[derive(FormModel)]` for non-generic structs with named fields whose
/// types convert `Into<FieldValue>`.
pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;

    fn field_values(self) -> Vec<(FieldName, FieldValue)>;
}
