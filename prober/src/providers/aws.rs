// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! AWS SDK backed providers.

use async_trait::async_trait;
use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, SdkConfig};
use log::{debug, info};

use crate::providers::{
    AccountStatus, BillingPreference, ComplianceStore, RuleCompliance, TEST_MODE_RESULT_TOKEN,
};
use crate::rules::errors::{service_error, Error};
use crate::rules::evaluation::Evaluation;
use crate::rules::{ComplianceType, Result};
use crate::settings::Settings;

const ROLE_SESSION_NAME: &str = "aws-prober";
const BUDGETS_PAGE_SIZE: i32 = 100;

pub async fn load_sdk_config() -> SdkConfig {
    aws_config::load_defaults(BehaviorVersion::latest()).await
}

/// Tax settings client for billing lookups. Assumes `role_arn` when given,
/// since billing and tax permissions may be granted to a separate role.
async fn tax_settings_client(
    sdk_config: &SdkConfig,
    role_arn: Option<&str>,
) -> aws_sdk_taxsettings::Client {
    let mut config = aws_sdk_taxsettings::config::Builder::from(sdk_config);
    if let Some(role_arn) = role_arn {
        info!("Using role {role_arn} for billing preference lookups");
        let provider = AssumeRoleProvider::builder(role_arn)
            .session_name(ROLE_SESSION_NAME)
            .configure(sdk_config)
            .build()
            .await;
        config = config.credentials_provider(provider);
    }
    aws_sdk_taxsettings::Client::from_conf(config.build())
}

pub struct AwsAccountStatus {
    sts: aws_sdk_sts::Client,
    iam: aws_sdk_iam::Client,
    organizations: aws_sdk_organizations::Client,
    budgets: aws_sdk_budgets::Client,
    cost_explorer: aws_sdk_costexplorer::Client,
    compute_optimizer: aws_sdk_computeoptimizer::Client,
    tax_settings: aws_sdk_taxsettings::Client,
}

impl AwsAccountStatus {
    pub async fn from_settings(sdk_config: &SdkConfig, settings: &Settings) -> Self {
        let tax_settings =
            tax_settings_client(sdk_config, settings.billing_role_arn.as_deref()).await;
        AwsAccountStatus {
            sts: aws_sdk_sts::Client::new(sdk_config),
            iam: aws_sdk_iam::Client::new(sdk_config),
            organizations: aws_sdk_organizations::Client::new(sdk_config),
            budgets: aws_sdk_budgets::Client::new(sdk_config),
            cost_explorer: aws_sdk_costexplorer::Client::new(sdk_config),
            compute_optimizer: aws_sdk_computeoptimizer::Client::new(sdk_config),
            tax_settings,
        }
    }

    async fn tax_inheritance_enabled(&self) -> Result<bool> {
        let output = self
            .tax_settings
            .get_tax_inheritance()
            .send()
            .await
            .map_err(|err| service_error("tax", "GetTaxInheritance", err))?;
        Ok(output
            .heritage_status()
            .map(|status| status.as_str() == "OptIn")
            .unwrap_or(false))
    }
}

#[async_trait]
impl AccountStatus for AwsAccountStatus {
    async fn caller_account_id(&self) -> Result<String> {
        let identity = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|err| service_error("sts", "GetCallerIdentity", err))?;
        identity.account().map(str::to_string).ok_or_else(|| {
            Error::IllegalArguments(String::from("GetCallerIdentity returned no account"))
        })
    }

    async fn iam_user_names(&self) -> Result<Vec<String>> {
        let output = self
            .iam
            .list_users()
            .send()
            .await
            .map_err(|err| service_error("iam", "ListUsers", err))?;
        Ok(output
            .users()
            .iter()
            .map(|user| user.user_name().to_string())
            .collect())
    }

    async fn organization_management_account_id(&self) -> Result<String> {
        let output = match self.organizations.describe_organization().send().await {
            Ok(output) => output,
            Err(err) => {
                if let Some(service_err) = err.as_service_error() {
                    if service_err.is_aws_organizations_not_in_use_exception() {
                        return Err(Error::NotInOrganization(service_err.to_string()));
                    }
                    if service_err.is_access_denied_exception() {
                        return Err(Error::AccessDenied {
                            service: "organizations",
                            message: service_err.to_string(),
                        });
                    }
                }
                return Err(service_error("organizations", "DescribeOrganization", err));
            }
        };
        output
            .organization()
            .and_then(|organization| organization.master_account_id())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::NotInOrganization(String::from(
                    "DescribeOrganization returned no management account",
                ))
            })
    }

    async fn budget_names(&self, account_id: &str) -> Result<Vec<String>> {
        let output = self
            .budgets
            .describe_budgets()
            .account_id(account_id)
            .max_results(BUDGETS_PAGE_SIZE)
            .send()
            .await
            .map_err(|err| service_error("budgets", "DescribeBudgets", err))?;
        Ok(output
            .budgets()
            .iter()
            .map(|budget| budget.budget_name().to_string())
            .collect())
    }

    async fn anomaly_monitor_names(&self) -> Result<Vec<String>> {
        let output = self
            .cost_explorer
            .get_anomaly_monitors()
            .send()
            .await
            .map_err(|err| service_error("ce", "GetAnomalyMonitors", err))?;
        Ok(output
            .anomaly_monitors()
            .iter()
            .map(|monitor| monitor.monitor_name().to_string())
            .collect())
    }

    async fn compute_optimizer_enrollment_status(&self) -> Result<String> {
        let output = self
            .compute_optimizer
            .get_enrollment_status()
            .send()
            .await
            .map_err(|err| service_error("compute-optimizer", "GetEnrollmentStatus", err))?;
        Ok(output
            .status()
            .map(|status| status.as_str().to_string())
            .unwrap_or_default())
    }

    async fn billing_preference(&self, preference: BillingPreference) -> Result<Option<bool>> {
        match preference {
            BillingPreference::TaxInheritance => self.tax_inheritance_enabled().await.map(Some),
            // Only exposed through the billing console.
            BillingPreference::InvoiceByEmail | BillingPreference::IamAccess => {
                debug!("No public API reports {preference}");
                Ok(None)
            }
        }
    }
}

pub struct ConfigServiceStore {
    client: aws_sdk_config::Client,
}

impl ConfigServiceStore {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        ConfigServiceStore {
            client: aws_sdk_config::Client::new(sdk_config),
        }
    }
}

fn to_sdk_evaluation(evaluation: &Evaluation) -> Result<aws_sdk_config::types::Evaluation> {
    let mut builder = aws_sdk_config::types::Evaluation::builder()
        .compliance_resource_type(&evaluation.compliance_resource_type)
        .compliance_resource_id(&evaluation.compliance_resource_id)
        .compliance_type(aws_sdk_config::types::ComplianceType::from(
            evaluation.compliance_type.as_str(),
        ))
        .ordering_timestamp(aws_sdk_config::primitives::DateTime::from_millis(
            evaluation.ordering_timestamp.timestamp_millis(),
        ));
    if let Some(annotation) = &evaluation.annotation {
        builder = builder.annotation(annotation);
    }
    builder
        .build()
        .map_err(|err| Error::InvalidEvent(format!("incomplete evaluation: {err}")))
}

/// Result tokens of Config's rule test runs; evaluations submitted with them
/// are validated but not recorded.
fn is_test_mode(result_token: &str) -> bool {
    result_token == TEST_MODE_RESULT_TOKEN
}

fn ensure_accepted(failed_evaluations: &[aws_sdk_config::types::Evaluation]) -> Result<()> {
    match failed_evaluations.len() {
        0 => Ok(()),
        failed => Err(Error::EvaluationsRejected(failed)),
    }
}

#[async_trait]
impl ComplianceStore for ConfigServiceStore {
    async fn put_evaluations(&self, evaluations: &[Evaluation], result_token: &str) -> Result<()> {
        let sdk_evaluations = evaluations
            .iter()
            .map(to_sdk_evaluation)
            .collect::<Result<Vec<_>>>()?;
        let output = self
            .client
            .put_evaluations()
            .set_evaluations(Some(sdk_evaluations))
            .result_token(result_token)
            .test_mode(is_test_mode(result_token))
            .send()
            .await
            .map_err(|err| service_error("config", "PutEvaluations", err))?;
        ensure_accepted(output.failed_evaluations())?;
        info!("Submitted {} evaluation(s)", evaluations.len());
        Ok(())
    }

    async fn describe_compliance(
        &self,
        config_rule_names: &[String],
    ) -> Result<Vec<RuleCompliance>> {
        let output = self
            .client
            .describe_compliance_by_config_rule()
            .set_config_rule_names(Some(config_rule_names.to_vec()))
            .send()
            .await
            .map_err(|err| service_error("config", "DescribeComplianceByConfigRule", err))?;
        Ok(output
            .compliance_by_config_rules()
            .iter()
            .filter_map(|rule| {
                let name = rule.config_rule_name()?;
                let compliance_type = rule
                    .compliance()
                    .and_then(|compliance| compliance.compliance_type())
                    .and_then(|compliance_type| ComplianceType::from_config(compliance_type.as_str()));
                Some(RuleCompliance {
                    config_rule_name: name.to_string(),
                    compliance_type,
                })
            })
            .collect())
    }

    async fn start_evaluation(&self, config_rule_name: &str) -> Result<()> {
        self.client
            .start_config_rules_evaluation()
            .config_rule_names(config_rule_name)
            .send()
            .await
            .map_err(|err| service_error("config", "StartConfigRulesEvaluation", err))?;
        info!("Requested re-evaluation of {config_rule_name}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Verdict;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const ACCOUNT_ID: &str = "111122223333";

    fn ordering_timestamp() -> chrono::DateTime<Utc> {
        Utc.timestamp_millis_opt(1_677_665_700_373).unwrap()
    }

    #[test]
    fn evaluation_converts_to_config_types() {
        let evaluation = Evaluation::new(
            ACCOUNT_ID,
            Verdict::from_bool(false).with_annotation("2 IAM user(s) found"),
            ordering_timestamp(),
        );

        let converted = to_sdk_evaluation(&evaluation).unwrap();

        assert_eq!("AWS::::Account", converted.compliance_resource_type());
        assert_eq!(ACCOUNT_ID, converted.compliance_resource_id());
        assert_eq!(
            aws_sdk_config::types::ComplianceType::NonCompliant,
            *converted.compliance_type()
        );
        assert_eq!(
            1_677_665_700_373,
            converted.ordering_timestamp().to_millis().unwrap()
        );
        assert_eq!(Some("2 IAM user(s) found"), converted.annotation());
    }

    #[rstest]
    #[case(Verdict::from_bool(true), "COMPLIANT")]
    #[case(Verdict::from_bool(false), "NON_COMPLIANT")]
    #[case(Verdict::not_applicable("unreadable"), "NOT_APPLICABLE")]
    fn compliance_type_keeps_its_config_name(#[case] verdict: Verdict, #[case] expected: &str) {
        let evaluation = Evaluation::new(ACCOUNT_ID, verdict, ordering_timestamp());
        let converted = to_sdk_evaluation(&evaluation).unwrap();
        assert_eq!(expected, converted.compliance_type().as_str());
    }

    #[test]
    fn missing_annotation_is_not_sent() {
        let evaluation =
            Evaluation::new(ACCOUNT_ID, Verdict::from_bool(true), ordering_timestamp());
        let converted = to_sdk_evaluation(&evaluation).unwrap();
        assert_eq!(None, converted.annotation());
    }

    #[rstest]
    #[case("TESTMODE", true)]
    #[case("eyJyZXN1bHRUb2tlbiI6ImFiYyJ9", false)]
    #[case("testmode", false)]
    #[case("", false)]
    fn test_mode_only_for_the_test_token(#[case] token: &str, #[case] expected: bool) {
        assert_eq!(expected, is_test_mode(token));
    }

    #[test]
    fn rejected_evaluations_are_an_error() {
        assert!(ensure_accepted(&[]).is_ok());

        let evaluation =
            Evaluation::new(ACCOUNT_ID, Verdict::from_bool(true), ordering_timestamp());
        let rejected = vec![
            to_sdk_evaluation(&evaluation).unwrap(),
            to_sdk_evaluation(&evaluation).unwrap(),
        ];
        match ensure_accepted(&rejected) {
            Err(Error::EvaluationsRejected(count)) => assert_eq!(2, count),
            other => panic!("expected rejected evaluations, got {other:?}"),
        }
    }
}
