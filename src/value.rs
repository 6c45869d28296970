use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

/// Raw payload of one field. The engine stores it untouched; only the rules
/// module probes its shape.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Number(Decimal),
    Toggle(bool),
    Attachment(Attachment),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }
}

impl FieldValue {
    // Whitespace-only text counts as absent.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Empty => false,
            FieldValue::Text(text) => !text.trim().is_empty(),
            FieldValue::Number(_) | FieldValue::Toggle(_) | FieldValue::Attachment(_) => true,
        }
    }

    // Only text is measurable.
    pub fn char_count(&self) -> Option<usize> {
        match self {
            FieldValue::Text(text) => Some(text.chars().count()),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(number) => Some(*number),
            FieldValue::Text(text) => Decimal::from_str(text.trim()).ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Toggle(value)
    }
}

impl From<Attachment> for FieldValue {
    fn from(value: Attachment) -> Self {
        FieldValue::Attachment(value)
    }
}
