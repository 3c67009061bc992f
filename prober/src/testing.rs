// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! In-memory [`AccountStatus`] and [`ComplianceStore`] implementations used
//! by the test suites of this workspace.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::providers::{AccountStatus, BillingPreference, ComplianceStore, RuleCompliance};
use crate::rules::errors::Error;
use crate::rules::evaluation::Evaluation;
use crate::rules::{ComplianceType, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeFailure {
    NotInOrganization,
    AccessDenied,
    Throttled,
}

impl FakeFailure {
    fn to_error(self, service: &'static str, operation: &'static str) -> Error {
        match self {
            FakeFailure::NotInOrganization => Error::NotInOrganization(format!(
                "{operation}: your account is not a member of an organization"
            )),
            FakeFailure::AccessDenied => Error::AccessDenied {
                service,
                message: format!("not authorized to perform {operation}"),
            },
            FakeFailure::Throttled => Error::ServiceError {
                service,
                operation,
                message: String::from("Rate exceeded"),
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeAccountStatus {
    pub account_id: String,
    pub iam_users: Vec<String>,
    /// `None` behaves like an account outside of any organization.
    pub management_account_id: Option<String>,
    pub budgets: Vec<String>,
    pub anomaly_monitors: Vec<String>,
    pub compute_optimizer_status: String,
    pub billing_preferences: HashMap<BillingPreference, bool>,
    failures: HashMap<&'static str, FakeFailure>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeAccountStatus {
    pub fn new(account_id: &str) -> Self {
        FakeAccountStatus {
            account_id: account_id.to_string(),
            compute_optimizer_status: String::from("Inactive"),
            ..Default::default()
        }
    }

    pub fn with_iam_users(mut self, users: &[&str]) -> Self {
        self.iam_users = users.iter().map(|u| u.to_string()).collect();
        self
    }

    pub fn with_management_account(mut self, account_id: &str) -> Self {
        self.management_account_id = Some(account_id.to_string());
        self
    }

    pub fn with_budgets(mut self, budgets: &[&str]) -> Self {
        self.budgets = budgets.iter().map(|b| b.to_string()).collect();
        self
    }

    pub fn with_anomaly_monitors(mut self, monitors: &[&str]) -> Self {
        self.anomaly_monitors = monitors.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_compute_optimizer_status(mut self, status: &str) -> Self {
        self.compute_optimizer_status = status.to_string();
        self
    }

    pub fn with_billing_preference(mut self, preference: BillingPreference, enabled: bool) -> Self {
        self.billing_preferences.insert(preference, enabled);
        self
    }

    /// Makes the named operation (e.g. `DescribeOrganization`) fail.
    pub fn failing(mut self, operation: &'static str, failure: FakeFailure) -> Self {
        self.failures.insert(operation, failure);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, service: &'static str, operation: &'static str) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(operation);
        }
        match self.failures.get(operation) {
            Some(failure) => Err(failure.to_error(service, operation)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AccountStatus for FakeAccountStatus {
    async fn caller_account_id(&self) -> Result<String> {
        self.record("sts", "GetCallerIdentity")?;
        Ok(self.account_id.clone())
    }

    async fn iam_user_names(&self) -> Result<Vec<String>> {
        self.record("iam", "ListUsers")?;
        Ok(self.iam_users.clone())
    }

    async fn organization_management_account_id(&self) -> Result<String> {
        self.record("organizations", "DescribeOrganization")?;
        self.management_account_id
            .clone()
            .ok_or_else(|| FakeFailure::NotInOrganization.to_error("organizations", "DescribeOrganization"))
    }

    async fn budget_names(&self, _account_id: &str) -> Result<Vec<String>> {
        self.record("budgets", "DescribeBudgets")?;
        Ok(self.budgets.clone())
    }

    async fn anomaly_monitor_names(&self) -> Result<Vec<String>> {
        self.record("ce", "GetAnomalyMonitors")?;
        Ok(self.anomaly_monitors.clone())
    }

    async fn compute_optimizer_enrollment_status(&self) -> Result<String> {
        self.record("compute-optimizer", "GetEnrollmentStatus")?;
        Ok(self.compute_optimizer_status.clone())
    }

    async fn billing_preference(&self, preference: BillingPreference) -> Result<Option<bool>> {
        self.record("billing", "GetBillingPreference")?;
        Ok(self.billing_preferences.get(&preference).copied())
    }
}

/// Remembers everything submitted to it and answers compliance queries from
/// a fixed table.
#[derive(Debug, Default)]
pub struct InMemoryComplianceStore {
    compliance: HashMap<String, Option<ComplianceType>>,
    submitted: Mutex<Vec<(String, Vec<Evaluation>)>>,
    started: Mutex<Vec<String>>,
    queries: Mutex<Vec<Vec<String>>>,
}

impl InMemoryComplianceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compliance(mut self, config_rule_name: &str, compliance: ComplianceType) -> Self {
        self.compliance
            .insert(config_rule_name.to_string(), Some(compliance));
        self
    }

    /// Rule known to AWS Config but without a verdict yet.
    pub fn with_insufficient_data(mut self, config_rule_name: &str) -> Self {
        self.compliance.insert(config_rule_name.to_string(), None);
        self
    }

    pub fn submitted(&self) -> Vec<(String, Vec<Evaluation>)> {
        self.submitted.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn queries(&self) -> Vec<Vec<String>> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ComplianceStore for InMemoryComplianceStore {
    async fn put_evaluations(&self, evaluations: &[Evaluation], result_token: &str) -> Result<()> {
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push((result_token.to_string(), evaluations.to_vec()));
        }
        Ok(())
    }

    async fn describe_compliance(
        &self,
        config_rule_names: &[String],
    ) -> Result<Vec<RuleCompliance>> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(config_rule_names.to_vec());
        }
        Ok(config_rule_names
            .iter()
            .filter_map(|name| {
                self.compliance.get(name).map(|compliance| RuleCompliance {
                    config_rule_name: name.clone(),
                    compliance_type: *compliance,
                })
            })
            .collect())
    }

    async fn start_evaluation(&self, config_rule_name: &str) -> Result<()> {
        if let Ok(mut started) = self.started.lock() {
            started.push(config_rule_name.to_string());
        }
        Ok(())
    }
}
