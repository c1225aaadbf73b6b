//! The flat submission as it arrives from the form boundary
//!
//! Values are stored as received and trimmed on read. A key may carry a
//! single value or, for repeated/multi-select inputs, a list.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Values accepted as "checked" for checkbox and agreement inputs
const TRUTHY: &[&str] = &["on", "true", "yes", "1", "checked"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// First non-blank value, trimmed
    fn first(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text.trim()).filter(|t| !t.is_empty()),
            FieldValue::List(items) => items.iter().map(|s| s.trim()).find(|s| !s.is_empty()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldsError {
    #[error("Submission must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatSubmission {
    fields: BTreeMap<String, FieldValue>,
}

impl FlatSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style single value insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value; repeating a key turns it into a list
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = fold_list_suffix(key.into());
        let value = value.into();
        match self.fields.remove(&key) {
            None => {
                self.fields.insert(key, FieldValue::Text(value));
            }
            Some(FieldValue::Text(previous)) => {
                self.fields.insert(key, FieldValue::List(vec![previous, value]));
            }
            Some(FieldValue::List(mut items)) => {
                items.push(value);
                self.fields.insert(key, FieldValue::List(items));
            }
        }
    }

    pub fn insert_list(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.fields
            .insert(fold_list_suffix(key.into()), FieldValue::List(values));
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    /// Build from `(name, value)` pairs as decoded from a urlencoded body
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut submission = Self::new();
        for (key, value) in pairs {
            submission.insert(key, value);
        }
        submission
    }

    /// Build from a JSON object body
    ///
    /// Scalars become text (`true` becomes `"true"`), arrays of scalars become
    /// lists, and nested objects or arrays of objects are kept as their JSON
    /// text so structured fields such as `damageMarkers` survive intact.
    /// `null` values are dropped.
    pub fn from_json(body: &Value) -> Result<Self, FieldsError> {
        let object = match body {
            Value::Object(object) => object,
            other => return Err(FieldsError::NotAnObject(json_kind(other))),
        };

        let mut submission = Self::new();
        for (key, value) in object {
            match value {
                Value::Null => {}
                Value::Array(items) if items.iter().all(is_scalar) => {
                    let values = items.iter().filter_map(scalar_text).collect();
                    submission.insert_list(key.clone(), values);
                }
                Value::Array(_) | Value::Object(_) => {
                    submission.insert(key.clone(), value.to_string());
                }
                scalar => {
                    if let Some(text) = scalar_text(scalar) {
                        submission.insert(key.clone(), text);
                    }
                }
            }
        }
        Ok(submission)
    }

    /// Trimmed, non-blank value for `key`
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(FieldValue::first)
    }

    /// Trimmed value or the empty string
    pub fn text_or_empty(&self, key: &str) -> String {
        self.text(key).unwrap_or_default().to_string()
    }

    pub fn has_value(&self, key: &str) -> bool {
        self.text(key).is_some()
    }

    /// All non-blank values; a single text value may be comma separated
    pub fn values(&self, key: &str) -> Vec<&str> {
        match self.fields.get(key) {
            None => Vec::new(),
            Some(FieldValue::Text(text)) => text
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect(),
            Some(FieldValue::List(items)) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// The `index`-th raw value of a key, trimmed; text counts as index 0
    pub fn nth(&self, key: &str, index: usize) -> Option<&str> {
        let value = match self.fields.get(key)? {
            FieldValue::Text(text) if index == 0 => text.as_str(),
            FieldValue::Text(_) => return None,
            FieldValue::List(items) => items.get(index)?.as_str(),
        };
        Some(value.trim()).filter(|v| !v.is_empty())
    }

    /// Checkbox semantics: a truthy literal is checked, anything else is not
    pub fn is_truthy(&self, key: &str) -> bool {
        self.text(key)
            .map(|v| TRUTHY.iter().any(|t| t.eq_ignore_ascii_case(v)))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

fn fold_list_suffix(key: String) -> String {
    match key.strip_suffix("[]") {
        Some(bare) => bare.to_string(),
        None => key,
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Bool(_) | Value::Number(_))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
