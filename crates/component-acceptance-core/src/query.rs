// crates/component-acceptance-core/src/query.rs
// ============================================================================
// Module: Provider Query
// Description: Contract for reading live resource attributes, with bounded retry.
// Purpose: Observe provider state for a deployed resource.
// Dependencies: thiserror, tracing
// ============================================================================

//! ## Overview
//! [`ResourceQueryClient`] returns the live attributes of a resource by ARN.
//! Provider APIs are eventually consistent right after creation, so
//! [`query_with_retry`] retries [`QueryError::NotFound`] and
//! [`QueryError::Throttled`] with capped exponential backoff. Every other
//! error is returned immediately.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use tracing::warn;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Live attribute name-to-value mapping reported by the provider.
pub type ResourceAttributes = BTreeMap<String, String>;

/// Errors returned by a provider query client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Resource does not exist (yet).
    #[error("resource not found: {0}")]
    NotFound(String),
    /// Provider throttled the request.
    #[error("request throttled: {0}")]
    Throttled(String),
    /// Request could not be delivered.
    #[error("transport error: {0}")]
    Transport(String),
    /// Provider rejected the request.
    #[error("service error: {0}")]
    Service(String),
}

impl QueryError {
    /// Returns true when the error may clear on its own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Throttled(_))
    }
}

/// Provider contract consumed by the harness.
pub trait ResourceQueryClient {
    /// Returns the live attributes of the resource identified by `arn`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the query fails.
    fn resource_attributes(&self, arn: &str) -> Result<ResourceAttributes, QueryError>;
}

// ============================================================================
// SECTION: Retry
// ============================================================================

/// Bounded exponential backoff for provider queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (at least 1).
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Default attempt count.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
    /// Default first delay.
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);
    /// Default delay cap.
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(8);

    /// Returns a policy that makes exactly one attempt.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Returns the delay to wait after the given failed attempt (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let factor = 1u32 << exponent;
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
        }
    }
}

/// Queries resource attributes, retrying retryable errors per `policy`.
///
/// # Errors
///
/// Returns the last [`QueryError`] once attempts are exhausted, or the first
/// non-retryable error.
pub fn query_with_retry<C: ResourceQueryClient + ?Sized>(
    client: &C,
    arn: &str,
    policy: &RetryPolicy,
) -> Result<ResourceAttributes, QueryError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        debug!(arn, attempt, "querying resource attributes");
        match client.resource_attributes(arn) {
            Ok(attributes) => return Ok(attributes),
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                let delay = policy.delay_after(attempt);
                let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                warn!(arn, attempt, error = %err, delay_ms, "retrying query");
                std::thread::sleep(delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
