// crates/component-acceptance-core/src/descriptor.rs
// ============================================================================
// Module: Component Descriptor
// Description: Identifies the deployable unit and stack a scenario targets.
// Purpose: Provide validated, immutable component and stack identifiers.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`ComponentDescriptor`] names the component (for example
//! `sns-topic/basic`), the stack it is deployed into (for example
//! `default-test`), and the input variables passed to the deployment engine.
//! The descriptor is fixed at scenario start and never mutated afterwards.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when constructing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Identifier was empty.
    #[error("{kind} must not be empty")]
    Empty {
        /// Identifier kind (component or stack).
        kind: &'static str,
    },
    /// Identifier contained whitespace.
    #[error("{kind} must not contain whitespace: {value}")]
    Whitespace {
        /// Identifier kind (component or stack).
        kind: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Validates an identifier string for the given kind.
fn validate_identifier(kind: &'static str, value: &str) -> Result<(), DescriptorError> {
    if value.is_empty() {
        return Err(DescriptorError::Empty {
            kind,
        });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(DescriptorError::Whitespace {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Component identifier (for example `sns-topic/basic`).
///
/// # Invariants
/// - Non-empty and free of whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentId(String);

impl ComponentId {
    /// Creates a component identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] when the value is empty or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, DescriptorError> {
        let value = value.into();
        validate_identifier("component", &value)?;
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ComponentId {
    type Error = DescriptorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ComponentId> for String {
    fn from(value: ComponentId) -> Self {
        value.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stack name (for example `default-test`).
///
/// # Invariants
/// - Non-empty and free of whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StackName(String);

impl StackName {
    /// Creates a stack name.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] when the value is empty or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, DescriptorError> {
        let value = value.into();
        validate_identifier("stack", &value)?;
        Ok(Self(value))
    }

    /// Returns the stack name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StackName {
    type Error = DescriptorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StackName> for String {
    fn from(value: StackName) -> Self {
        value.0
    }
}

impl fmt::Display for StackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Descriptor
// ============================================================================

/// Component, stack, and input variables for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Component to deploy.
    pub component: ComponentId,
    /// Stack the component is deployed into.
    pub stack: StackName,
    /// Input variables passed to the deployment engine.
    #[serde(default)]
    pub vars: BTreeMap<String, Value>,
}

impl ComponentDescriptor {
    /// Creates a descriptor with no input variables.
    #[must_use]
    pub const fn new(component: ComponentId, stack: StackName) -> Self {
        Self {
            component,
            stack,
            vars: BTreeMap::new(),
        }
    }

    /// Returns a copy of the descriptor with an additional input variable.
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: Value) -> Self {
        self.vars.insert(name.into(), value);
        self
    }
}

impl fmt::Display for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.component, self.stack)
    }
}
