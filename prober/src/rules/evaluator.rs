// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use log::{debug, info, warn};

use crate::providers::{AccountStatus, BillingPreference};
use crate::rules::errors::Error;
use crate::rules::{Check, Result, Verdict};

pub const COMPUTE_OPTIMIZER_ACTIVE: &str = "Active";

/// How a failed organization lookup is turned into a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MembershipPolicy {
    /// An account whose organization cannot be looked up is not the
    /// management account. Every lookup failure is NON_COMPLIANT.
    #[default]
    FailClosed,
    /// Only "not in an organization" and access denied are NON_COMPLIANT,
    /// any other failure is returned to the caller.
    Propagate,
}

impl MembershipPolicy {
    fn apply(&self, err: Error) -> Result<Verdict> {
        match self {
            MembershipPolicy::Propagate if !err.is_membership_undeterminable() => Err(err),
            _ => {
                warn!(
                    "Organization membership could not be determined, reporting NON_COMPLIANT: {err}"
                );
                Ok(Verdict::from_bool(false).with_annotation(format!(
                    "Organization membership could not be determined: {err}"
                )))
            }
        }
    }
}

/// Runs checks against the account state exposed by an [`AccountStatus`].
#[derive(Clone)]
pub struct Evaluator {
    status: Arc<dyn AccountStatus>,
    membership_policy: MembershipPolicy,
}

impl Evaluator {
    pub fn new(status: Arc<dyn AccountStatus>) -> Self {
        Self::with_policy(status, MembershipPolicy::default())
    }

    pub fn with_policy(status: Arc<dyn AccountStatus>, membership_policy: MembershipPolicy) -> Self {
        Evaluator {
            status,
            membership_policy,
        }
    }

    pub fn status(&self) -> &Arc<dyn AccountStatus> {
        &self.status
    }

    /// Looks up the check by identifier first; unknown identifiers fail with
    /// [`Error::UnsupportedRule`] before any account state is read.
    pub async fn evaluate_rule(&self, identifier: &str, account_id: &str) -> Result<Verdict> {
        let check = identifier.parse::<Check>()?;
        self.evaluate(check, account_id).await
    }

    pub async fn evaluate(&self, check: Check, account_id: &str) -> Result<Verdict> {
        debug!("Evaluating {check} for account {account_id}");
        let verdict = match check {
            Check::BillingBudgetCreated => {
                let budgets = self.status.budget_names(account_id).await?;
                Verdict::from_bool(!budgets.is_empty())
            }
            Check::BillingCostAnomalyDetectorCreated => {
                let monitors = self.status.anomaly_monitor_names().await?;
                Verdict::from_bool(!monitors.is_empty())
            }
            Check::SecurityAccountHasNoIamUsers => {
                let users = self.status.iam_user_names().await?;
                if users.is_empty() {
                    Verdict::from_bool(true)
                } else {
                    Verdict::from_bool(false)
                        .with_annotation(format!("{} IAM user(s) found", users.len()))
                }
            }
            Check::SecurityAccountIsOrganizationsManagementAccount => {
                match self.status.organization_management_account_id().await {
                    Ok(management_account_id) => {
                        Verdict::from_bool(management_account_id == account_id)
                    }
                    Err(err) => self.membership_policy.apply(err)?,
                }
            }
            Check::BillingComputeOptimizerEnabled => {
                let status = self.status.compute_optimizer_enrollment_status().await?;
                Verdict::from_bool(status == COMPUTE_OPTIMIZER_ACTIVE)
            }
            Check::BillingInvoiceByEmailEnabled => {
                self.billing_preference(BillingPreference::InvoiceByEmail)
                    .await?
            }
            Check::BillingIamAccessEnabled => {
                self.billing_preference(BillingPreference::IamAccess).await?
            }
            Check::BillingTaxInheritanceEnabled => {
                self.billing_preference(BillingPreference::TaxInheritance)
                    .await?
            }
        };
        info!("{check} evaluated to {}", verdict.compliance);
        Ok(verdict)
    }

    async fn billing_preference(&self, preference: BillingPreference) -> Result<Verdict> {
        Ok(match self.status.billing_preference(preference).await? {
            Some(enabled) => Verdict::from_bool(enabled),
            None => Verdict::not_applicable(format!("The {preference} setting is not readable")),
        })
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod evaluator_tests;
