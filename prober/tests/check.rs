// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0
pub(crate) mod utils;

#[cfg(test)]
mod check_tests {
    use std::sync::Arc;

    use aws_prober::providers::BillingPreference;
    use aws_prober::testing::{FakeAccountStatus, FakeFailure, InMemoryComplianceStore};
    use aws_prober::utils::writer::{WriteBuffer::Vec as WBVec, Writer};
    use pretty_assertions::assert_eq;

    use crate::assert_output_from_str_eq;
    use crate::utils::{CommandTestRunner, StatusCode};

    const ACCOUNT_ID: &str = "111122223333";

    #[derive(Default)]
    struct CheckTestRunner<'args> {
        rule: Option<&'args str>,
        all: bool,
        account_id: Option<&'args str>,
        json: bool,
    }

    impl<'args> CheckTestRunner<'args> {
        fn rule(&'args mut self, arg: Option<&'args str>) -> &'args mut CheckTestRunner {
            self.rule = arg;
            self
        }

        fn all(&'args mut self, arg: bool) -> &'args mut CheckTestRunner {
            self.all = arg;
            self
        }

        fn account_id(&'args mut self, arg: Option<&'args str>) -> &'args mut CheckTestRunner {
            self.account_id = arg;
            self
        }

        fn json(&'args mut self, arg: bool) -> &'args mut CheckTestRunner {
            self.json = arg;
            self
        }
    }

    impl<'args> CommandTestRunner for CheckTestRunner<'args> {
        fn build_args(&self) -> Vec<String> {
            let mut args = vec![String::from("check")];

            if let Some(rule) = self.rule {
                args.push(String::from("--rule"));
                args.push(rule.to_string());
            }

            if self.all {
                args.push(String::from("--all"));
            }

            if let Some(account_id) = self.account_id {
                args.push(String::from("--account-id"));
                args.push(account_id.to_string());
            }

            if self.json {
                args.push(String::from("--json"));
            }

            args
        }
    }

    fn writer() -> Writer {
        Writer::new_with_err(WBVec(vec![]), WBVec(vec![]))
    }

    #[test]
    fn compliant_rule_exits_successfully() {
        let status = Arc::new(FakeAccountStatus::new(ACCOUNT_ID).with_budgets(&["monthly"]));
        let mut writer = writer();
        let code = CheckTestRunner::default()
            .rule(Some("billing-budget-created"))
            .run(status.clone(), Arc::new(InMemoryComplianceStore::new()), &mut writer);

        assert_eq!(StatusCode::SUCCESS, code);
        assert_eq!(vec!["GetCallerIdentity", "DescribeBudgets"], status.calls());
        assert_output_from_str_eq!("billing-budget-created COMPLIANT\n", writer);
    }

    #[test]
    fn non_compliant_rule_exits_with_failure() {
        let status = Arc::new(FakeAccountStatus::new(ACCOUNT_ID).with_iam_users(&["ci"]));
        let mut writer = writer();
        let code = CheckTestRunner::default()
            .rule(Some("security-account-has-no-iam-users"))
            .account_id(Some(ACCOUNT_ID))
            .run(status.clone(), Arc::new(InMemoryComplianceStore::new()), &mut writer);

        assert_eq!(StatusCode::NON_COMPLIANT, code);
        assert_eq!(vec!["ListUsers"], status.calls());
        assert_output_from_str_eq!(
            "security-account-has-no-iam-users NON_COMPLIANT (1 IAM user(s) found)\n",
            writer
        );
    }

    #[test]
    fn unsupported_rule_reports_an_error() {
        let status = Arc::new(FakeAccountStatus::new(ACCOUNT_ID));
        let mut writer = writer();
        let code = CheckTestRunner::default()
            .rule(Some("invoice-by-email"))
            .run(status.clone(), Arc::new(InMemoryComplianceStore::new()), &mut writer);

        assert_eq!(StatusCode::ERROR, code);
        assert!(status.calls().is_empty());
        assert_eq!(
            "Unsupported rule `invoice-by-email`\n",
            writer.err_to_stripped().unwrap()
        );
    }

    #[test]
    fn all_checks_as_json() {
        let status = Arc::new(
            FakeAccountStatus::new(ACCOUNT_ID)
                .with_budgets(&["monthly"])
                .with_anomaly_monitors(&["services"])
                .with_management_account(ACCOUNT_ID)
                .with_compute_optimizer_status("Active")
                .with_billing_preference(BillingPreference::TaxInheritance, true),
        );
        let mut writer = writer();
        let code = CheckTestRunner::default()
            .all(true)
            .account_id(Some(ACCOUNT_ID))
            .json(true)
            .run(status, Arc::new(InMemoryComplianceStore::new()), &mut writer);

        assert_eq!(StatusCode::SUCCESS, code);
        let reports: serde_json::Value =
            serde_json::from_str(&writer.into_string().unwrap()).unwrap();
        let reports = reports.as_array().unwrap();
        assert_eq!(8, reports.len());
        let not_applicable = reports
            .iter()
            .filter(|report| report["compliance"] == "NOT_APPLICABLE")
            .count();
        assert_eq!(2, not_applicable);
        assert!(reports
            .iter()
            .all(|report| report["compliance"] != "NON_COMPLIANT"));
    }

    #[test]
    fn failing_lookup_is_an_error() {
        let status = Arc::new(
            FakeAccountStatus::new(ACCOUNT_ID).failing("GetEnrollmentStatus", FakeFailure::Throttled),
        );
        let mut writer = writer();
        let code = CheckTestRunner::default()
            .rule(Some("billing-compute-optimizer-enabled"))
            .account_id(Some(ACCOUNT_ID))
            .run(status, Arc::new(InMemoryComplianceStore::new()), &mut writer);

        assert_eq!(StatusCode::ERROR, code);
        assert!(writer
            .err_to_stripped()
            .unwrap()
            .starts_with("billing-compute-optimizer-enabled could not be evaluated"));
    }

    #[test]
    fn unknown_caller_account_is_an_error() {
        let status = Arc::new(
            FakeAccountStatus::new(ACCOUNT_ID).failing("GetCallerIdentity", FakeFailure::Throttled),
        );
        let mut writer = writer();
        let code = CheckTestRunner::default()
            .all(true)
            .run(status.clone(), Arc::new(InMemoryComplianceStore::new()), &mut writer);

        assert_eq!(StatusCode::ERROR, code);
        assert_eq!(vec!["GetCallerIdentity"], status.calls());
        assert!(writer
            .err_to_stripped()
            .unwrap()
            .starts_with("Could not determine the account to check"));
    }

    #[test]
    fn rule_and_all_conflict() {
        let mut writer = writer();
        let code = CheckTestRunner::default()
            .rule(Some("billing-budget-created"))
            .all(true)
            .run(
                Arc::new(FakeAccountStatus::new(ACCOUNT_ID)),
                Arc::new(InMemoryComplianceStore::new()),
                &mut writer,
            );
        assert_eq!(StatusCode::PARSING_ERROR, code);
    }
}
