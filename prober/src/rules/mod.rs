// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub mod catalog;
pub mod errors;
pub mod evaluation;
pub mod evaluator;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::rules::errors::Error;

pub type Result<R> = std::result::Result<R, Error>;

/// The custom checks this crate knows how to evaluate. Each maps to one
/// AWS Config custom rule deployed as `<prefix><identifier>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Check {
    BillingInvoiceByEmailEnabled,
    BillingComputeOptimizerEnabled,
    BillingIamAccessEnabled,
    BillingTaxInheritanceEnabled,
    BillingBudgetCreated,
    BillingCostAnomalyDetectorCreated,
    SecurityAccountIsOrganizationsManagementAccount,
    SecurityAccountHasNoIamUsers,
}

impl Check {
    pub const ALL: [Check; 8] = [
        Check::BillingInvoiceByEmailEnabled,
        Check::BillingComputeOptimizerEnabled,
        Check::BillingIamAccessEnabled,
        Check::BillingTaxInheritanceEnabled,
        Check::BillingBudgetCreated,
        Check::BillingCostAnomalyDetectorCreated,
        Check::SecurityAccountIsOrganizationsManagementAccount,
        Check::SecurityAccountHasNoIamUsers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Check::BillingInvoiceByEmailEnabled => "billing-invoice-by-email-enabled",
            Check::BillingComputeOptimizerEnabled => "billing-compute-optimizer-enabled",
            Check::BillingIamAccessEnabled => "billing-iam-access-enabled",
            Check::BillingTaxInheritanceEnabled => "billing-tax-inheritance-enabled",
            Check::BillingBudgetCreated => "billing-budget-created",
            Check::BillingCostAnomalyDetectorCreated => "billing-cost-anomaly-detector-created",
            Check::SecurityAccountIsOrganizationsManagementAccount => {
                "security-account-is-organizations-management-account"
            }
            Check::SecurityAccountHasNoIamUsers => "security-account-has-no-iam-users",
        }
    }
}

impl Display for Check {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Check {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for Check {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Check::ALL
            .iter()
            .find(|check| check.as_str() == s)
            .copied()
            .ok_or_else(|| Error::UnsupportedRule(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceType {
    Compliant,
    NonCompliant,
    NotApplicable,
}

impl ComplianceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceType::Compliant => "COMPLIANT",
            ComplianceType::NonCompliant => "NON_COMPLIANT",
            ComplianceType::NotApplicable => "NOT_APPLICABLE",
        }
    }

    /// Maps AWS Config's compliance strings. `INSUFFICIENT_DATA` and anything
    /// unknown have no verdict.
    pub fn from_config(value: &str) -> Option<ComplianceType> {
        match value {
            "COMPLIANT" => Some(ComplianceType::Compliant),
            "NON_COMPLIANT" => Some(ComplianceType::NonCompliant),
            "NOT_APPLICABLE" => Some(ComplianceType::NotApplicable),
            _ => None,
        }
    }
}

impl Display for ComplianceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of running one check against one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub compliance: ComplianceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl Verdict {
    pub fn from_bool(compliant: bool) -> Self {
        Verdict {
            compliance: if compliant {
                ComplianceType::Compliant
            } else {
                ComplianceType::NonCompliant
            },
            annotation: None,
        }
    }

    pub fn not_applicable(annotation: impl Into<String>) -> Self {
        Verdict {
            compliance: ComplianceType::NotApplicable,
            annotation: Some(annotation.into()),
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn is_compliant(&self) -> bool {
        self.compliance == ComplianceType::Compliant
    }
}
