use std::collections::BTreeMap;

use super::engine::{Field, FieldName, FieldSet, FormEngine, FormResult, FormSnapshot};
use super::schema::FormSchema;
use super::value::FieldValue;

/// A form engine wired to a schema: raw input comes in, the schema's rules
/// judge it, the engine records it. Also owns the value-preserving schema
/// switch.
pub struct BoundForm {
    schema: FormSchema,
    engine: FormEngine,
}

impl BoundForm {
    pub fn new(schema: FormSchema) -> Self {
        let fields = schema.blank_fields();
        let is_valid = aggregate_of(&fields);
        Self {
            engine: FormEngine::new(fields, is_valid),
            schema,
        }
    }

    pub fn engine(&self) -> &FormEngine {
        &self.engine
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Handles one raw input event: evaluates the field's rules against the
    /// new value, hands the verdict to the engine, and returns it. A name the
    /// schema does not know carries no rules and is accepted as valid.
    pub fn input(
        &self,
        name: impl Into<FieldName>,
        value: impl Into<FieldValue>,
    ) -> FormResult<bool> {
        let name = name.into();
        let value = value.into();
        let is_valid = self
            .schema
            .rules_for(&name)
            .is_none_or(|rules| rules.check(&value));
        self.engine.field_changed(name, value, is_valid)?;
        Ok(is_valid)
    }

    /// Swaps the form to a different schema in one step. Shared fields keep
    /// their entered value and verdict; introduced fields start blank;
    /// dropped fields vanish. The aggregate handed to the engine is
    /// recomputed from the set built here.
    pub fn switch_schema(&mut self, next: FormSchema) -> FormResult<()> {
        let current = self.engine.snapshot()?;
        let mut fields = FieldSet::new();
        for (name, rules) in next.entries() {
            let field = match current.fields.get(name) {
                Some(existing) => existing.clone(),
                None => Field::new(FieldValue::Empty, rules.check(&FieldValue::Empty)),
            };
            fields.insert(name.clone(), field);
        }
        let is_valid = aggregate_of(&fields);
        self.engine.replace_fields(fields, is_valid)?;
        self.schema = next;
        Ok(())
    }

    pub fn is_valid(&self) -> FormResult<bool> {
        self.engine.is_valid()
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot> {
        self.engine.snapshot()
    }

    /// Values a submit handler may send, present only while the whole form
    /// is valid.
    pub fn submit_payload(&self) -> FormResult<Option<BTreeMap<FieldName, FieldValue>>> {
        let snapshot = self.engine.snapshot()?;
        if !snapshot.is_valid {
            return Ok(None);
        }
        let values = snapshot
            .fields
            .into_iter()
            .map(|(name, field)| (name, field.value))
            .collect();
        Ok(Some(values))
    }
}

fn aggregate_of(fields: &FieldSet) -> bool {
    fields.values().all(|field| field.is_valid)
}
