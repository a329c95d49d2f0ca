//! JSON body classification

use crate::error::BodyError;
use serde::Serialize;
use serde_json::{Map, Value};

/// A JSON body in one of the two accepted top-level shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsonBody {
    Object(Map<String, Value>),
    List(Vec<Map<String, Value>>),
}

impl JsonBody {
    /// Parse and classify a JSON body
    ///
    /// Accepts an object, or an array whose every element is an object.
    /// The first non-object element rejects the whole array.
    pub fn parse(bytes: &[u8]) -> Result<Self, BodyError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| BodyError::json(e.to_string()))?;
        Self::classify(value)
    }

    fn classify(value: Value) -> Result<Self, BodyError> {
        match value {
            Value::Object(map) => Ok(Self::Object(map)),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Object(map) => Ok(map),
                    _ => Err(BodyError::InvalidArrayItem { index }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            other => Err(BodyError::UnsupportedStructure {
                shape: shape_name(&other),
            }),
        }
    }
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
