// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Read-only views of account state consumed by the evaluator, and the AWS
//! Config compliance registry the results are handed to.

pub mod aws;

use std::fmt::{Display, Formatter};

use async_trait::async_trait;

use crate::rules::evaluation::Evaluation;
use crate::rules::{ComplianceType, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillingPreference {
    /// PDF invoices are delivered by email.
    InvoiceByEmail,
    /// IAM users and roles may access the billing console.
    IamAccess,
    /// Member accounts inherit the management account's tax settings.
    TaxInheritance,
}

impl Display for BillingPreference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BillingPreference::InvoiceByEmail => "invoice delivery by email",
            BillingPreference::IamAccess => "IAM access to billing",
            BillingPreference::TaxInheritance => "tax inheritance",
        })
    }
}

#[async_trait]
pub trait AccountStatus: Send + Sync {
    /// Account the credentials in use belong to.
    async fn caller_account_id(&self) -> Result<String>;

    async fn iam_user_names(&self) -> Result<Vec<String>>;

    /// Management account of the caller's organization. Fails with
    /// `Error::NotInOrganization` when the account has no organization.
    async fn organization_management_account_id(&self) -> Result<String>;

    async fn budget_names(&self, account_id: &str) -> Result<Vec<String>>;

    async fn anomaly_monitor_names(&self) -> Result<Vec<String>>;

    /// Raw Compute Optimizer enrollment status, e.g. `Active` or `Inactive`.
    async fn compute_optimizer_enrollment_status(&self) -> Result<String>;

    /// `None` when the preference cannot be read through this provider.
    async fn billing_preference(&self, preference: BillingPreference) -> Result<Option<bool>>;
}

/// Compliance as last recorded by AWS Config for one rule. `None` means no
/// verdict is available yet (e.g. `INSUFFICIENT_DATA`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCompliance {
    pub config_rule_name: String,
    pub compliance_type: Option<ComplianceType>,
}

impl RuleCompliance {
    pub fn is_compliant(&self) -> bool {
        self.compliance_type == Some(ComplianceType::Compliant)
    }
}

#[async_trait]
pub trait ComplianceStore: Send + Sync {
    async fn put_evaluations(&self, evaluations: &[Evaluation], result_token: &str) -> Result<()>;

    async fn describe_compliance(&self, config_rule_names: &[String])
        -> Result<Vec<RuleCompliance>>;

    /// Asks AWS Config to re-run a rule. Returns once the request is
    /// accepted, not when the evaluation is done.
    async fn start_evaluation(&self, config_rule_name: &str) -> Result<()>;
}

/// Result token AWS Config hands out when a rule is invoked in test mode.
pub const TEST_MODE_RESULT_TOKEN: &str = "TESTMODE";
