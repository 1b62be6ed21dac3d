// crates/component-acceptance-core/src/arn.rs
// ============================================================================
// Module: Amazon Resource Names
// Description: Parsing and construction of ARNs.
// Purpose: Reconstruct expected topic ARNs from region, owner, and name.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! ARNs have the shape `arn:<partition>:<service>:<region>:<account>:<resource>`.
//! The resource segment may itself contain colons, so parsing splits on the
//! first five separators only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when parsing an ARN.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArnError {
    /// Input did not start with `arn:`.
    #[error("arn must start with \"arn:\": {0}")]
    MissingPrefix(String),
    /// Input had fewer than six segments.
    #[error("arn has too few segments: {0}")]
    TooFewSegments(String),
    /// A required segment was empty.
    #[error("arn {segment} must not be empty: {input}")]
    EmptySegment {
        /// Segment name.
        segment: &'static str,
        /// Rejected input.
        input: String,
    },
}

// ============================================================================
// SECTION: ARN
// ============================================================================

/// Parsed Amazon Resource Name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arn {
    /// Partition (`aws`, `aws-cn`, `aws-us-gov`).
    pub partition: String,
    /// Service namespace (`sns`).
    pub service: String,
    /// Region; empty for global resources.
    pub region: String,
    /// Account identifier; empty for some resource types.
    pub account: String,
    /// Resource segment, possibly containing `:` or `/`.
    pub resource: String,
}

impl Arn {
    /// Builds the ARN of an SNS topic.
    #[must_use]
    pub fn sns_topic(partition: &str, region: &str, owner: &str, name: &str) -> Self {
        Self {
            partition: partition.to_string(),
            service: "sns".to_string(),
            region: region.to_string(),
            account: owner.to_string(),
            resource: name.to_string(),
        }
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account, self.resource
        )
    }
}

impl FromStr for Arn {
    type Err = ArnError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let Some(rest) = input.strip_prefix("arn:") else {
            return Err(ArnError::MissingPrefix(input.to_string()));
        };
        let segments: Vec<&str> = rest.splitn(5, ':').collect();
        let [partition, service, region, account, resource] = segments.as_slice() else {
            return Err(ArnError::TooFewSegments(input.to_string()));
        };
        for (segment, value) in [("partition", partition), ("service", service)] {
            if value.is_empty() {
                return Err(ArnError::EmptySegment {
                    segment,
                    input: input.to_string(),
                });
            }
        }
        Ok(Self {
            partition: (*partition).to_string(),
            service: (*service).to_string(),
            region: (*region).to_string(),
            account: (*account).to_string(),
            resource: (*resource).to_string(),
        })
    }
}
