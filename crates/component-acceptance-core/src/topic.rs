// crates/component-acceptance-core/src/topic.rs
// ============================================================================
// Module: SNS Topic Outputs
// Description: Output contract and live-state checks for the SNS topic component.
// Purpose: Decode the topic record and compare it with provider attributes.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The SNS topic component exports a structured record under
//! [`outputs::TOPIC`] plus scalar identifiers. [`TopicOutputs`] reads them
//! once; its `check_*` methods record internal-consistency and live-state
//! checks into a [`CheckReport`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Deserializer;
use serde_json::Map;
use serde_json::Value;

use crate::arn::Arn;
use crate::checks::CheckReport;
use crate::outputs::OutputError;
use crate::outputs::OutputSet;

// ============================================================================
// SECTION: Output Names
// ============================================================================

/// Output names exported by the SNS topic component.
pub mod outputs {
    /// Full topic attribute record.
    pub const TOPIC: &str = "sns_topic_name";
    /// Topic identifier (the topic name).
    pub const ID: &str = "sns_topic_id";
    /// Owning account identifier.
    pub const OWNER: &str = "sns_topic_owner";
    /// Topic ARN.
    pub const ARN: &str = "sns_topic_arn";
    /// Mapping of subscription records.
    pub const SUBSCRIPTIONS: &str = "sns_topic_subscriptions";
}

// ============================================================================
// SECTION: Feedback Channels
// ============================================================================

/// Delivery-status feedback channels supported by SNS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackChannel {
    /// Mobile application endpoints.
    Application,
    /// Kinesis Data Firehose.
    Firehose,
    /// HTTP/S endpoints.
    Http,
    /// Lambda functions.
    Lambda,
    /// SQS queues.
    Sqs,
}

impl FeedbackChannel {
    /// Every channel in attribute order.
    pub const ALL: [Self; 5] = [Self::Application, Self::Firehose, Self::Http, Self::Lambda, Self::Sqs];

    /// Returns the lowercase channel name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Firehose => "firehose",
            Self::Http => "http",
            Self::Lambda => "lambda",
            Self::Sqs => "sqs",
        }
    }

    /// Returns the live attribute name holding the success sample rate.
    #[must_use]
    pub const fn success_sample_rate_attribute(self) -> &'static str {
        match self {
            Self::Application => "ApplicationSuccessFeedbackSampleRate",
            Self::Firehose => "FirehoseSuccessFeedbackSampleRate",
            Self::Http => "HTTPSuccessFeedbackSampleRate",
            Self::Lambda => "LambdaSuccessFeedbackSampleRate",
            Self::Sqs => "SQSSuccessFeedbackSampleRate",
        }
    }

    /// Returns true when SNS always reports this channel's sample rate.
    ///
    /// HTTP and SQS sample rates only appear once a feedback role is set.
    #[must_use]
    pub const fn always_reported(self) -> bool {
        matches!(self, Self::Application | Self::Firehose | Self::Lambda)
    }
}

// ============================================================================
// SECTION: Topic Record
// ============================================================================

/// Deserializes `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Structured SNS topic record exported under [`outputs::TOPIC`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SnsTopicRecord {
    /// Topic name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Resource identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Owning account identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub owner: String,
    /// Topic ARN.
    #[serde(deserialize_with = "null_as_default")]
    pub arn: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    /// Access policy document.
    #[serde(deserialize_with = "null_as_default")]
    pub policy: String,
    /// Delivery policy document.
    #[serde(deserialize_with = "null_as_default")]
    pub delivery_policy: String,
    /// Message archive policy (FIFO topics).
    #[serde(deserialize_with = "null_as_default")]
    pub archive_policy: String,
    /// Earliest archived message timestamp.
    #[serde(deserialize_with = "null_as_default")]
    pub beginning_archive_time: String,
    /// KMS key used for server-side encryption.
    #[serde(deserialize_with = "null_as_default")]
    pub kms_master_key_id: String,
    /// FIFO topic flag.
    #[serde(deserialize_with = "null_as_default")]
    pub fifo_topic: bool,
    /// Content-based deduplication flag.
    #[serde(deserialize_with = "null_as_default")]
    pub content_based_deduplication: bool,
    /// Tracing mode (`PassThrough` or `Active`).
    #[serde(deserialize_with = "null_as_default")]
    pub tracing_config: String,
    /// Signature version.
    #[serde(deserialize_with = "null_as_default")]
    pub signature_version: i64,
    /// Name prefix used when the name was generated.
    #[serde(deserialize_with = "null_as_default")]
    pub name_prefix: String,
    /// Tags set on the resource.
    #[serde(deserialize_with = "null_as_default")]
    pub tags: BTreeMap<String, Value>,
    /// Tags including provider defaults.
    #[serde(deserialize_with = "null_as_default")]
    pub tags_all: BTreeMap<String, Value>,
    /// Application failure feedback role.
    #[serde(deserialize_with = "null_as_default")]
    pub application_failure_feedback_role_arn: String,
    /// Application success feedback role.
    #[serde(deserialize_with = "null_as_default")]
    pub application_success_feedback_role_arn: String,
    /// Application success sample rate.
    #[serde(deserialize_with = "null_as_default")]
    pub application_success_feedback_sample_rate: i64,
    /// Firehose failure feedback role.
    #[serde(deserialize_with = "null_as_default")]
    pub firehose_failure_feedback_role_arn: String,
    /// Firehose success feedback role.
    #[serde(deserialize_with = "null_as_default")]
    pub firehose_success_feedback_role_arn: String,
    /// Firehose success sample rate.
    #[serde(deserialize_with = "null_as_default")]
    pub firehose_success_feedback_sample_rate: i64,
    /// HTTP failure feedback role.
    #[serde(deserialize_with = "null_as_default")]
    pub http_failure_feedback_role_arn: String,
    /// HTTP success feedback role.
    #[serde(deserialize_with = "null_as_default")]
    pub http_success_feedback_role_arn: String,
    /// HTTP success sample rate.
    #[serde(deserialize_with = "null_as_default")]
    pub http_success_feedback_sample_rate: i64,
    /// Lambda failure feedback role.
    #[serde(deserialize_with = "null_as_default")]
    pub lambda_failure_feedback_role_arn: String,
    /// Lambda success feedback role.
    #[serde(deserialize_with = "null_as_default")]
    pub lambda_success_feedback_role_arn: String,
    /// Lambda success sample rate.
    #[serde(deserialize_with = "null_as_default")]
    pub lambda_success_feedback_sample_rate: i64,
    /// SQS failure feedback role.
    #[serde(deserialize_with = "null_as_default")]
    pub sqs_failure_feedback_role_arn: String,
    /// SQS success feedback role.
    #[serde(deserialize_with = "null_as_default")]
    pub sqs_success_feedback_role_arn: String,
    /// SQS success sample rate.
    #[serde(deserialize_with = "null_as_default")]
    pub sqs_success_feedback_sample_rate: i64,
}

impl SnsTopicRecord {
    /// Returns the configured success sample rate for a channel.
    #[must_use]
    pub const fn success_sample_rate(&self, channel: FeedbackChannel) -> i64 {
        match channel {
            FeedbackChannel::Application => self.application_success_feedback_sample_rate,
            FeedbackChannel::Firehose => self.firehose_success_feedback_sample_rate,
            FeedbackChannel::Http => self.http_success_feedback_sample_rate,
            FeedbackChannel::Lambda => self.lambda_success_feedback_sample_rate,
            FeedbackChannel::Sqs => self.sqs_success_feedback_sample_rate,
        }
    }
}

// ============================================================================
// SECTION: Topic Outputs
// ============================================================================

/// Subscription records keyed by subscription name.
pub type Subscriptions = BTreeMap<String, Map<String, Value>>;

/// Outputs read from a deployed SNS topic component.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicOutputs {
    /// Structured topic record.
    pub record: SnsTopicRecord,
    /// Value of [`outputs::ID`].
    pub id: String,
    /// Value of [`outputs::OWNER`].
    pub owner: String,
    /// Value of [`outputs::ARN`].
    pub arn: String,
    /// Decoded [`outputs::SUBSCRIPTIONS`], kept as a result so a bad value is
    /// reported as a check failure rather than aborting the scenario.
    pub subscriptions: Result<Subscriptions, OutputError>,
}

impl TopicOutputs {
    /// Reads the topic outputs from an output set.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] when the record or a scalar output is missing
    /// or malformed.
    pub fn read(set: &OutputSet) -> Result<Self, OutputError> {
        Ok(Self {
            record: set.decode(outputs::TOPIC)?,
            id: set.string(outputs::ID)?,
            owner: set.string(outputs::OWNER)?,
            arn: set.string(outputs::ARN)?,
            subscriptions: set.map_of_objects(outputs::SUBSCRIPTIONS),
        })
    }

    /// Records checks that the outputs agree with each other and with the
    /// ARN derived from partition, region, owner, and id.
    pub fn check_consistency(&self, report: &mut CheckReport, partition: &str, region: &str) {
        let record = &self.record;
        report.expect_eq("topic id matches record name", record.name.as_str(), self.id.as_str());
        report.expect_eq("topic owner matches record owner", record.owner.as_str(), self.owner.as_str());
        let expected = Arn::sns_topic(partition, region, &self.owner, &self.id).to_string();
        report.expect_eq("topic arn matches derived arn", expected.as_str(), self.arn.as_str());
        let parsed = self.arn.parse::<Arn>().map_err(|err| err.to_string()).and_then(|arn| {
            if arn.service == "sns" { Ok(()) } else { Err(format!("service is {}", arn.service)) }
        });
        let arn_detail = parsed.as_ref().err().cloned().unwrap_or_default();
        report.expect_true("topic arn parses as an sns arn", parsed.is_ok(), arn_detail);
        report.expect_eq("record arn matches topic arn", record.arn.as_str(), self.arn.as_str());
        let detail = self.subscriptions.as_ref().err().map(ToString::to_string).unwrap_or_default();
        report.expect_true("subscriptions decode as objects", self.subscriptions.is_ok(), detail);
    }

    /// Records checks comparing the record with live provider attributes.
    pub fn check_live(&self, report: &mut CheckReport, attributes: &BTreeMap<String, String>) {
        let record = &self.record;
        report.expect_attr_eq("live display name matches name", attributes, "DisplayName", &record.name);
        report.expect_attr_eq("live owner matches owner", attributes, "Owner", &record.owner);
        report.expect_attr_eq("live topic arn matches arn", attributes, "TopicArn", &record.arn);
        report.expect_attr_eq(
            "live display name matches display name",
            attributes,
            "DisplayName",
            &record.display_name,
        );
        for channel in FeedbackChannel::ALL {
            let key = channel.success_sample_rate_attribute();
            if !channel.always_reported() && !attributes.contains_key(key) {
                continue;
            }
            let name = format!("{} success sample rate", channel.as_str());
            report.expect_attr_int(&name, attributes, key, record.success_sample_rate(channel));
        }
    }
}
