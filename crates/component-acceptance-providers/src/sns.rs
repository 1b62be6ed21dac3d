// crates/component-acceptance-providers/src/sns.rs
// ============================================================================
// Module: SNS Topic Client
// Description: Live topic attribute queries against the AWS SNS API.
// Purpose: Implement the provider query contract with aws-sdk-sns.
// Dependencies: component-acceptance-core, aws-config, aws-sdk-sns, tokio
// ============================================================================

//! ## Overview
//! [`SnsTopicClient`] fetches `GetTopicAttributes` for a topic ARN. The
//! harness is synchronous, so the client owns a Tokio runtime and blocks on
//! each request; inside a multi-thread runtime it uses `block_in_place`
//! instead. Errors are classified so that only eventual-consistency and
//! throttling failures are retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_sdk_sns::Client;
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::error::ProvideErrorMetadata;
use aws_sdk_sns::error::SdkError;
use aws_sdk_sns::operation::get_topic_attributes::GetTopicAttributesError;
use component_acceptance_core::QueryError;
use component_acceptance_core::ResourceAttributes;
use component_acceptance_core::ResourceQueryClient;
use tokio::runtime::Handle;
use tokio::runtime::Runtime;
use tokio::runtime::RuntimeFlavor;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Error code SNS returns for an unknown topic.
const NOT_FOUND_CODE: &str = "NotFound";
/// Error codes that indicate request throttling.
const THROTTLING_CODES: [&str; 4] =
    ["Throttling", "ThrottlingException", "ThrottledException", "RequestLimitExceeded"];

// ============================================================================
// SECTION: Runtime Helpers
// ============================================================================

/// Blocks on an SNS future using a compatible runtime.
fn block_on_with_runtime<F, T>(runtime: &Runtime, future: F) -> Result<T, QueryError>
where
    F: Future<Output = Result<T, QueryError>> + Send + 'static,
    T: Send + 'static,
{
    if let Ok(handle) = Handle::try_current() {
        if matches!(handle.runtime_flavor(), RuntimeFlavor::MultiThread) {
            return tokio::task::block_in_place(|| handle.block_on(future));
        }
        let (tx, rx) = std::sync::mpsc::sync_channel(1);
        std::thread::spawn(move || {
            let result = Runtime::new()
                .map_err(|err| QueryError::Transport(err.to_string()))
                .and_then(|runtime| runtime.block_on(future));
            let _ = tx.send(result);
        });
        return rx
            .recv()
            .unwrap_or_else(|_| Err(QueryError::Transport("sns client thread join failed".to_string())));
    }

    runtime.block_on(future)
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Connection settings for the SNS client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnsClientConfig {
    /// Region to query.
    pub region: String,
    /// Optional named credentials profile.
    pub profile: Option<String>,
    /// Optional endpoint override.
    pub endpoint_url: Option<String>,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// SNS-backed provider query client.
pub struct SnsTopicClient {
    /// Underlying SNS client.
    client: Client,
    /// Tokio runtime for blocking SNS operations.
    runtime: Option<Arc<Runtime>>,
}

impl Drop for SnsTopicClient {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            let _ = std::thread::spawn(move || drop(runtime));
        }
    }
}

impl SnsTopicClient {
    /// Builds a client from the default credential chain and `config`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Transport`] when the runtime cannot be created.
    pub fn new(config: &SnsClientConfig) -> Result<Self, QueryError> {
        let runtime = Runtime::new().map_err(|err| QueryError::Transport(err.to_string()))?;
        let settings = config.clone();
        let shared_config = block_on_with_runtime(&runtime, async move {
            let mut loader =
                aws_config::defaults(BehaviorVersion::latest()).region(Region::new(settings.region));
            if let Some(profile) = settings.profile {
                loader = loader.profile_name(profile);
            }
            if let Some(endpoint) = settings.endpoint_url {
                loader = loader.endpoint_url(endpoint);
            }
            Ok(loader.load().await)
        })?;
        debug!(region = %config.region, "sns client configured");
        Ok(Self {
            client: Client::new(&shared_config),
            runtime: Some(Arc::new(runtime)),
        })
    }

    /// Returns the runtime or an error if shut down.
    fn runtime(&self) -> Result<&Runtime, QueryError> {
        self.runtime
            .as_ref()
            .map(AsRef::as_ref)
            .ok_or_else(|| QueryError::Transport("sns client runtime closed".to_string()))
    }
}

impl ResourceQueryClient for SnsTopicClient {
    fn resource_attributes(&self, arn: &str) -> Result<ResourceAttributes, QueryError> {
        let client = self.client.clone();
        let arn = arn.to_string();
        block_on_with_runtime(self.runtime()?, async move {
            let output =
                client.get_topic_attributes().topic_arn(arn).send().await.map_err(map_sdk_error)?;
            Ok(output
                .attributes()
                .map(|attributes| {
                    attributes.iter().map(|(key, value)| (key.clone(), value.clone())).collect()
                })
                .unwrap_or_default())
        })
    }
}

// ============================================================================
// SECTION: Error Mapping
// ============================================================================

/// Maps an SDK failure onto the query error taxonomy.
fn map_sdk_error<R>(err: SdkError<GetTopicAttributesError, R>) -> QueryError
where
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::ServiceError(context) => {
            let service = context.err();
            if service.is_not_found_exception() {
                return QueryError::NotFound(message);
            }
            classify_service_error(service.code(), message)
        }
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) | SdkError::ResponseError(_) => {
            QueryError::Transport(message)
        }
        _ => QueryError::Service(message),
    }
}

/// Classifies a service error by its error code.
pub(crate) fn classify_service_error(code: Option<&str>, message: String) -> QueryError {
    match code {
        Some(NOT_FOUND_CODE) => QueryError::NotFound(message),
        Some(code) if THROTTLING_CODES.contains(&code) => QueryError::Throttled(message),
        _ => QueryError::Service(message),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use component_acceptance_core::QueryError;

    use super::classify_service_error;

    #[test]
    fn not_found_code_is_retryable() {
        let err = classify_service_error(Some("NotFound"), "Topic does not exist".to_string());
        assert_eq!(err, QueryError::NotFound("Topic does not exist".to_string()));
        assert!(err.is_retryable());
    }

    #[test]
    fn throttling_codes_are_retryable() {
        for code in ["Throttling", "ThrottlingException", "ThrottledException"] {
            assert!(classify_service_error(Some(code), String::new()).is_retryable());
        }
    }

    #[test]
    fn other_service_errors_are_terminal() {
        let err = classify_service_error(Some("AuthorizationError"), "denied".to_string());
        assert!(matches!(err, QueryError::Service(_)));
        assert!(!err.is_retryable());
        assert!(matches!(classify_service_error(None, String::new()), QueryError::Service(_)));
    }
}
