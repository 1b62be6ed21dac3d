// crates/component-acceptance-core/src/outputs.rs
// ============================================================================
// Module: Output Set
// Description: Declared outputs captured from a deployed component.
// Purpose: Provide typed, read-only access to scalar and structured outputs.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! An [`OutputSet`] maps output names to JSON values. It is built once after
//! deploy, either from `terraform output -json` (where each entry carries
//! `value`, `type`, and `sensitive`) or from a flat name-to-value map.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when reading outputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputError {
    /// Output name is not present.
    #[error("output {0} is missing")]
    Missing(String),
    /// Output is structured where a scalar was expected.
    #[error("output {name} is not a scalar (found {found})")]
    NotScalar {
        /// Output name.
        name: String,
        /// JSON kind that was found.
        found: &'static str,
    },
    /// Output could not be decoded into the requested type.
    #[error("output {name} failed to decode: {reason}")]
    Decode {
        /// Output name.
        name: String,
        /// Decoder message.
        reason: String,
    },
    /// Raw output document was malformed.
    #[error("output document malformed: {0}")]
    Malformed(String),
}

// ============================================================================
// SECTION: Output Set
// ============================================================================

/// Declared outputs of a deployed component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputSet {
    /// Output values keyed by output name.
    values: BTreeMap<String, Value>,
}

impl OutputSet {
    /// Builds an output set from a flat name-to-value map.
    #[must_use]
    pub const fn from_values(values: BTreeMap<String, Value>) -> Self {
        Self {
            values,
        }
    }

    /// Builds an output set from a `terraform output -json` document.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Malformed`] when the document is not a JSON
    /// object or an entry lacks a `value` field.
    pub fn from_terraform_json(document: &Value) -> Result<Self, OutputError> {
        let Value::Object(entries) = document else {
            return Err(OutputError::Malformed(format!(
                "expected object, found {}",
                json_kind(document)
            )));
        };
        let mut values = BTreeMap::new();
        for (name, entry) in entries {
            let value = entry
                .get("value")
                .ok_or_else(|| OutputError::Malformed(format!("output {name} has no value")))?;
            values.insert(name.clone(), value.clone());
        }
        Ok(Self {
            values,
        })
    }

    /// Returns true when no outputs are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of declared outputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns output names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns the raw value of an output.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the number of outputs holding a value.
    ///
    /// `null`, empty strings, empty lists, and empty maps count as unset, as
    /// disabled components export those placeholders.
    #[must_use]
    pub fn populated_count(&self) -> usize {
        self.values.values().filter(|value| is_populated(value)).count()
    }

    /// Returns a scalar output rendered as a string.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] when the output is missing or structured.
    pub fn string(&self, name: &str) -> Result<String, OutputError> {
        let value = self.require(name)?;
        match value {
            Value::String(text) => Ok(text.clone()),
            Value::Number(number) => Ok(number.to_string()),
            Value::Bool(flag) => Ok(flag.to_string()),
            other => Err(OutputError::NotScalar {
                name: name.to_string(),
                found: json_kind(other),
            }),
        }
    }

    /// Decodes a structured output into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] when the output is missing or fails to decode.
    pub fn decode<T: DeserializeOwned>(&self, name: &str) -> Result<T, OutputError> {
        let value = self.require(name)?;
        T::deserialize(value).map_err(|err| OutputError::Decode {
            name: name.to_string(),
            reason: err.to_string(),
        })
    }

    /// Returns an output as a mapping of key to JSON object.
    ///
    /// A `null` output decodes as an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] when the output is missing, is not an object, or
    /// holds a non-object entry.
    pub fn map_of_objects(
        &self,
        name: &str,
    ) -> Result<BTreeMap<String, Map<String, Value>>, OutputError> {
        match self.require(name)? {
            Value::Null => Ok(BTreeMap::new()),
            Value::Object(entries) => entries
                .iter()
                .map(|(key, entry)| match entry {
                    Value::Object(fields) => Ok((key.clone(), fields.clone())),
                    other => Err(OutputError::Decode {
                        name: name.to_string(),
                        reason: format!("entry {key} is {}, expected object", json_kind(other)),
                    }),
                })
                .collect(),
            other => Err(OutputError::Decode {
                name: name.to_string(),
                reason: format!("expected object, found {}", json_kind(other)),
            }),
        }
    }

    /// Returns the value of a required output.
    fn require(&self, name: &str) -> Result<&Value, OutputError> {
        self.values.get(name).ok_or_else(|| OutputError::Missing(name.to_string()))
    }
}

/// Returns true when a value is not an unset placeholder.
fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Returns a short label for the JSON value kind.
const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
