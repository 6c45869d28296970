mod binding;
mod engine;
mod rules;
mod schema;
mod value;


pub use formwork_derive::FormModel;

pub use binding::BoundForm;
pub use engine::{
    Field, FieldName, FieldSet, FormEngine, FormError, FormEvent, FormId, FormResult, FormSnapshot,
};
pub use rules::{Rule, RuleSet};
pub use schema::{FormModel, FormSchema};
pub use value::{Attachment, FieldValue};
