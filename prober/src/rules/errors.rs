// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported rule `{0}`")]
    UnsupportedRule(String),
    #[error("Rule parameters do not name a check to run. Parameters = `{0}`")]
    MissingRuleParameter(String),
    #[error("Account is not a member of an AWS Organization: {0}")]
    NotInOrganization(String),
    #[error("Access denied calling {service}: {message}")]
    AccessDenied {
        service: &'static str,
        message: String,
    },
    #[error("Call to {service}:{operation} failed: {message}")]
    ServiceError {
        service: &'static str,
        operation: &'static str,
        message: String,
    },
    #[error("AWS Config rejected {0} of the submitted evaluations")]
    EvaluationsRejected(usize),
    #[error("Invalid invocation event: {0}")]
    InvalidEvent(String),
    #[error("Error parsing incoming JSON context {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid notification timestamp {0}")]
    InvalidTimestamp(#[from] chrono::ParseError),
    #[error("I/O error when writing {0}")]
    IoError(#[from] std::io::Error),
    #[error("Output is not valid UTF-8 {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    #[error("Could not initialise logging {0}")]
    LoggerError(#[from] log::SetLoggerError),
    #[error("{0}")]
    IllegalArguments(String),
}

impl Error {
    /// True for failures that mean "the account's organization membership could
    /// not be established", as opposed to transport or throttling failures.
    pub fn is_membership_undeterminable(&self) -> bool {
        matches!(self, Error::NotInOrganization(_) | Error::AccessDenied { .. })
    }
}

/// Wraps any AWS SDK error, keeping the full error chain in the message.
pub(crate) fn service_error<E>(service: &'static str, operation: &'static str, err: E) -> Error
where
    E: std::error::Error,
{
    Error::ServiceError {
        service,
        operation,
        message: aws_sdk_config::error::DisplayErrorContext(&err).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_undeterminable_only_for_organization_failures() {
        assert!(Error::NotInOrganization(String::from("no org")).is_membership_undeterminable());
        assert!(Error::AccessDenied {
            service: "organizations",
            message: String::from("denied"),
        }
        .is_membership_undeterminable());
        assert!(!Error::ServiceError {
            service: "organizations",
            operation: "DescribeOrganization",
            message: String::from("Rate exceeded"),
        }
        .is_membership_undeterminable());
    }
}
