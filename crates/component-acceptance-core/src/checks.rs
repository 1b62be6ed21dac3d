// crates/component-acceptance-core/src/checks.rs
// ============================================================================
// Module: Assertion Engine
// Description: Collects expected-versus-actual checks for a scenario.
// Purpose: Report every independent mismatch instead of stopping at the first.
// Dependencies: serde, tracing
// ============================================================================

//! ## Overview
//! A [`CheckReport`] accumulates [`CheckOutcome`] values. Each `expect_*`
//! method records exactly one outcome and never aborts, so a scenario reports
//! all independent mismatches at once. The one dependent case is integer
//! attributes: a value that fails to parse is recorded as
//! [`CheckStatus::ParseFailure`] and the equality comparison is not attempted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::scenario::ScenarioError;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    /// Expected and actual values matched.
    Passed,
    /// Values differed.
    Mismatch {
        /// Expected value, rendered.
        expected: String,
        /// Actual value, rendered.
        actual: String,
    },
    /// A required live attribute was absent.
    Missing {
        /// Attribute name.
        attribute: String,
    },
    /// An attribute expected to hold an integer did not parse.
    ParseFailure {
        /// Attribute name.
        attribute: String,
        /// Raw attribute value.
        raw: String,
        /// Parser message.
        reason: String,
    },
    /// A boolean condition did not hold.
    Failed {
        /// Failure detail.
        detail: String,
    },
}

/// Named check outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    /// Check name.
    pub name: String,
    /// Check result.
    #[serde(flatten)]
    pub status: CheckStatus,
}

impl CheckOutcome {
    /// Returns true when the check passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.status, CheckStatus::Passed)
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            CheckStatus::Passed => write!(f, "{}: passed", self.name),
            CheckStatus::Mismatch {
                expected,
                actual,
            } => write!(f, "{}: expected \"{expected}\", got \"{actual}\"", self.name),
            CheckStatus::Missing {
                attribute,
            } => write!(f, "{}: attribute {attribute} missing", self.name),
            CheckStatus::ParseFailure {
                attribute,
                raw,
                reason,
            } => write!(
                f,
                "{}: attribute {attribute} value \"{raw}\" is not an integer ({reason})",
                self.name
            ),
            CheckStatus::Failed {
                detail,
            } => write!(f, "{}: {detail}", self.name),
        }
    }
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Ordered collection of check outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CheckReport {
    /// Outcomes in the order checks were recorded.
    outcomes: Vec<CheckOutcome>,
}

impl CheckReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }

    /// Records an equality check.
    pub fn expect_eq<T>(&mut self, name: &str, expected: T, actual: T) -> bool
    where
        T: PartialEq + fmt::Display,
    {
        let status = if expected == actual {
            CheckStatus::Passed
        } else {
            CheckStatus::Mismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            }
        };
        self.record(name, status)
    }

    /// Records that `condition` holds, with `detail` describing a failure.
    pub fn expect_true(&mut self, name: &str, condition: bool, detail: impl Into<String>) -> bool {
        let status = if condition {
            CheckStatus::Passed
        } else {
            CheckStatus::Failed {
                detail: detail.into(),
            }
        };
        self.record(name, status)
    }

    /// Records that a string attribute is present and equals `expected`.
    pub fn expect_attr_eq(
        &mut self,
        name: &str,
        attributes: &BTreeMap<String, String>,
        key: &str,
        expected: &str,
    ) -> bool {
        match attributes.get(key) {
            Some(actual) => self.expect_eq(name, expected, actual.as_str()),
            None => self.record(
                name,
                CheckStatus::Missing {
                    attribute: key.to_string(),
                },
            ),
        }
    }

    /// Records that an attribute parses as an integer equal to `expected`.
    ///
    /// A missing or unparsable attribute is recorded instead of the equality
    /// comparison.
    pub fn expect_attr_int(
        &mut self,
        name: &str,
        attributes: &BTreeMap<String, String>,
        key: &str,
        expected: i64,
    ) -> bool {
        let Some(raw) = attributes.get(key) else {
            return self.record(
                name,
                CheckStatus::Missing {
                    attribute: key.to_string(),
                },
            );
        };
        match raw.trim().parse::<i64>() {
            Ok(actual) => self.expect_eq(name, expected, actual),
            Err(err) => self.record(
                name,
                CheckStatus::ParseFailure {
                    attribute: key.to_string(),
                    raw: raw.clone(),
                    reason: err.to_string(),
                },
            ),
        }
    }

    /// Returns true when every recorded check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(CheckOutcome::passed)
    }

    /// Returns all recorded outcomes.
    #[must_use]
    pub fn outcomes(&self) -> &[CheckOutcome] {
        &self.outcomes
    }

    /// Returns the failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.passed())
    }

    /// Returns the number of recorded checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true when no checks were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Returns an error carrying every failed outcome, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Assertions`] when at least one check failed.
    pub fn ensure_passed(&self) -> Result<(), ScenarioError> {
        if self.passed() {
            return Ok(());
        }
        Err(ScenarioError::Assertions(self.failures().cloned().collect()))
    }

    /// Appends an outcome and returns whether it passed.
    fn record(&mut self, name: &str, status: CheckStatus) -> bool {
        let outcome = CheckOutcome {
            name: name.to_string(),
            status,
        };
        let passed = outcome.passed();
        if !passed {
            warn!(check = name, failure = %outcome, "check failed");
        }
        self.outcomes.push(outcome);
        passed
    }
}
