// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rules::{ComplianceType, Result, Verdict};

pub const DEFAULT_RESOURCE_TYPE: &str = "AWS::::Account";

/// AWS Config rejects annotations longer than this.
pub const MAX_ANNOTATION_LENGTH: usize = 256;

pub const SCHEDULED_NOTIFICATION: &str = "ScheduledNotification";

/// The decoded `invokingEvent` of an AWS Config rule invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokingEvent {
    pub notification_creation_time: String,
    #[serde(default)]
    pub message_type: Option<String>,
}

impl InvokingEvent {
    pub fn from_json(invoking_event: &str) -> Result<Self> {
        Ok(serde_json::from_str(invoking_event)?)
    }

    pub fn ordering_timestamp(&self) -> Result<DateTime<Utc>> {
        Ok(DateTime::parse_from_rfc3339(&self.notification_creation_time)?.with_timezone(&Utc))
    }

    pub fn is_scheduled(&self) -> bool {
        self.message_type.as_deref() == Some(SCHEDULED_NOTIFICATION)
    }
}

/// One compliance record handed to AWS Config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Evaluation {
    pub compliance_resource_type: String,
    pub compliance_resource_id: String,
    pub compliance_type: ComplianceType,
    pub ordering_timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl Evaluation {
    pub fn new(
        resource_id: impl Into<String>,
        verdict: Verdict,
        ordering_timestamp: DateTime<Utc>,
    ) -> Self {
        Evaluation {
            compliance_resource_type: DEFAULT_RESOURCE_TYPE.to_string(),
            compliance_resource_id: resource_id.into(),
            compliance_type: verdict.compliance,
            ordering_timestamp,
            annotation: verdict.annotation.map(truncate_annotation),
        }
    }
}

/// Evaluation for the account itself, ordered by the notification that
/// triggered the rule.
pub fn build_evaluation(
    resource_id: &str,
    verdict: Verdict,
    invoking_event: &InvokingEvent,
) -> Result<Evaluation> {
    Ok(Evaluation::new(
        resource_id,
        verdict,
        invoking_event.ordering_timestamp()?,
    ))
}

fn truncate_annotation(annotation: String) -> String {
    if annotation.chars().count() <= MAX_ANNOTATION_LENGTH {
        return annotation;
    }
    annotation.chars().take(MAX_ANNOTATION_LENGTH).collect()
}
