//! Request-scoped key/value context
//!
//! Merges query parameters and decoded form fields into a single lookup
//! table that handlers can read without caring about the content type.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Field map produced by the form and multipart decoders
pub type Fields = BTreeMap<String, FieldValue>;

/// A field value: either a single string or every value of a repeated field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    /// First value, or `""` for an empty list
    pub fn first(&self) -> &str {
        match self {
            Self::Single(value) => value,
            Self::Multiple(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// All values in the order they were received
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multiple(values) => values,
        }
    }

    /// Append another occurrence, turning a single value into a list
    pub fn push(&mut self, value: String) {
        match self {
            Self::Single(existing) => {
                let first = std::mem::take(existing);
                *self = Self::Multiple(vec![first, value]);
            }
            Self::Multiple(values) => values.push(value),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

/// Record one occurrence of `key`, keeping a single string until it repeats
pub(crate) fn accumulate(fields: &mut Fields, key: String, value: String) {
    match fields.get_mut(&key) {
        Some(existing) => existing.push(value),
        None => {
            fields.insert(key, FieldValue::Single(value));
        }
    }
}

/// Per-request context holding query parameters and decoded body fields
///
/// Serializes as a flat JSON object whose values are strings or arrays of
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Context {
    fields: Fields,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a context from query parameters, each stored as a single value
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let fields = query
            .iter()
            .map(|(key, value)| (key.clone(), FieldValue::Single(value.clone())))
            .collect();
        Self { fields }
    }

    /// Get the context attached to a request, or an empty one
    ///
    /// Requests that never went through the body pipeline have nothing
    /// attached; they get a fresh empty context rather than an error.
    pub fn from_extensions(extensions: &http::Extensions) -> Self {
        extensions.get::<Context>().cloned().unwrap_or_default()
    }

    /// Attach this context to a request's extensions, replacing any previous one
    pub fn attach(self, extensions: &mut http::Extensions) {
        extensions.insert(self);
    }

    /// Get a value as a single string
    ///
    /// Returns `""` when the key is missing, and the first value when the
    /// field was repeated. Use [`Context::get_all`] to see every value.
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(FieldValue::first).unwrap_or("")
    }

    /// Get every value for a key (empty when missing)
    pub fn get_all(&self, key: &str) -> &[String] {
        self.fields
            .get(key)
            .map(FieldValue::as_slice)
            .unwrap_or(&[])
    }

    /// Get the raw field value
    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Set a field, overwriting any existing value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Merge decoded fields in; decoded values win on key collision
    pub fn merge(&mut self, fields: Fields) {
        self.fields.extend(fields);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }
}
