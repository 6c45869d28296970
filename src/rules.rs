use email_address::EmailAddress;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::value::FieldValue;

/// A named, parameterized predicate applied to one field's value. Plain data
/// (kind + params), not a closure, so a field's validation spec can be
/// stored, compared and serialized on its own.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum Rule {
    Required,
    MinLength { min: usize },
    MaxLength { max: usize },
    NumericRange { min: Decimal, max: Decimal },
    Email,
}

impl Rule {
    /// A value of the wrong shape fails closed rather than panicking.
    pub fn check(&self, value: &FieldValue) -> bool {
        match self {
            Rule::Required => value.is_present(),
            Rule::MinLength { min } => value.char_count().is_some_and(|count| count >= *min),
            Rule::MaxLength { max } => value.char_count().is_some_and(|count| count <= *max),
            Rule::NumericRange { min, max } => value
                .as_decimal()
                .is_some_and(|number| *min <= number && number <= *max),
            Rule::Email => value.as_text().is_some_and(EmailAddress::is_valid),
        }
    }
}

/// Rules bound to one field; every rule must pass, an empty set always does.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet(Vec<Rule>);

impl RuleSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with(mut self, rule: Rule) -> Self {
        self.0.push(rule);
        self
    }

    pub fn check(&self, value: &FieldValue) -> bool {
        self.0.iter().all(|rule| rule.check(value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.0
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self(rules)
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
