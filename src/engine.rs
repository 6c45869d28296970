use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use super::value::FieldValue;

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

/// Name of one field. Arbitrary runtime strings; two schemas in the same
/// form's lifetime may carry different name sets.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldName(Arc<str>);

impl FieldName {
    pub fn new(value: impl Into<Arc<str>>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FieldName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<FieldName> for String {
    fn from(name: FieldName) -> Self {
        name.0.to_string()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    pub value: FieldValue,
    pub is_valid: bool,
}

impl Field {
    pub fn new(value: impl Into<FieldValue>, is_valid: bool) -> Self {
        Self {
            value: value.into(),
            is_valid,
        }
    }

    pub fn valid(value: impl Into<FieldValue>) -> Self {
        Self::new(value, true)
    }

    pub fn invalid(value: impl Into<FieldValue>) -> Self {
        Self::new(value, false)
    }
}

// Ordering carries no meaning; the map just keeps iteration deterministic.
pub type FieldSet = BTreeMap<FieldName, Field>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormSnapshot {
    pub fields: FieldSet,
    pub is_valid: bool,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    StatePoisoned(&'static str),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::StatePoisoned(context) => {
                write!(f, "form state lock poisoned while {context}")
            }
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

/// Transition notification for caller-owned observers; the engine never logs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormEvent {
    FieldChanged {
        form: FormId,
        field: FieldName,
        is_valid: bool,
        form_is_valid: bool,
    },
    FieldsReplaced {
        form: FormId,
        field_count: usize,
        form_is_valid: bool,
    },
}

type FormObserver = Arc<dyn Fn(&FormEvent) + Send + Sync>;

struct EngineState {
    id: FormId,
    fields: FieldSet,
    is_valid: bool,
}

/// Owns one form's field set and aggregate validity. The sole mutation path
/// is the two transition operations; a field failing validation is data
/// (`is_valid: false`), never an error, and the engine validates nothing
/// itself.
#[derive(Clone)]
pub struct FormEngine {
    state: Arc<RwLock<EngineState>>,
    observers: Arc<RwLock<Vec<FormObserver>>>,
}

impl FormEngine {
    pub fn new(fields: FieldSet, is_valid: bool) -> Self {
        Self {
            state: Arc::new(RwLock::new(EngineState {
                id: FormId::next(),
                fields,
                is_valid,
            })),
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn form_id(&self) -> FormResult<FormId> {
        Ok(read_lock(&self.state, "reading form id")?.id)
    }

    // Observers run after the state lock is released, so they may read the
    // engine freely.
    pub fn observe(&self, observer: impl Fn(&FormEvent) + Send + Sync + 'static) -> FormResult<()> {
        let mut observers = write_lock(&self.observers, "registering form observer")?;
        observers.push(Arc::new(observer));
        Ok(())
    }

    /// Records one field's new value and the caller's validity verdict, then
    /// recomputes the aggregate over the post-mutation set. A name not
    /// present yet is introduced rather than rejected.
    pub fn field_changed(
        &self,
        name: impl Into<FieldName>,
        value: impl Into<FieldValue>,
        is_valid: bool,
    ) -> FormResult<()> {
        let name = name.into();
        let event = {
            let mut state = write_lock(&self.state, "applying field change")?;
            state.fields.insert(name.clone(), Field::new(value, is_valid));
            state.is_valid = state.fields.values().all(|field| field.is_valid);
            FormEvent::FieldChanged {
                form: state.id,
                field: name,
                is_valid,
                form_is_valid: state.is_valid,
            }
        };
        self.emit(&event)
    }

    /// Discards the previous field set and aggregate wholesale and installs
    /// the new ones verbatim. No recomputation happens here: the caller
    /// constructing the set states the aggregate itself.
    /// [`BoundForm`](crate::BoundForm) derives it honestly before calling
    /// this.
    pub fn replace_fields(&self, fields: FieldSet, is_valid: bool) -> FormResult<()> {
        let event = {
            let mut state = write_lock(&self.state, "replacing field set")?;
            state.fields = fields;
            state.is_valid = is_valid;
            FormEvent::FieldsReplaced {
                form: state.id,
                field_count: state.fields.len(),
                form_is_valid: state.is_valid,
            }
        };
        self.emit(&event)
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            fields: state.fields.clone(),
            is_valid: state.is_valid,
        })
    }

    pub fn is_valid(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading aggregate validity")?.is_valid)
    }

    pub fn field(&self, name: &FieldName) -> FormResult<Option<Field>> {
        Ok(read_lock(&self.state, "reading single field")?
            .fields
            .get(name)
            .cloned())
    }

    fn emit(&self, event: &FormEvent) -> FormResult<()> {
        let observers = read_lock(&self.observers, "reading form observers")?.clone();
        for observer in observers {
            observer(event);
        }
        Ok(())
    }
}

pub(crate) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(crate) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
