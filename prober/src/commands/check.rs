// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use async_trait::async_trait;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::commands::{
    CommandContext, Executable, ERROR_STATUS_CODE, FAILURE_STATUS_CODE, SUCCESS_STATUS_CODE,
};
use crate::rules::errors::Error;
use crate::rules::evaluator::Evaluator;
use crate::rules::{self, ComplianceType, Result, Verdict};
use crate::utils::writer::Writer;

const ABOUT: &str = "Evaluate one or all custom checks against the current AWS account";
const RULE_HELP: &str = "Identifier of the check to run, e.g. billing-budget-created";
const ALL_HELP: &str = "Run every custom check";
const ACCOUNT_ID_HELP: &str =
    "Account the checks are evaluated for. Defaults to the account of the current credentials";
const JSON_HELP: &str = "Print results as JSON";

#[derive(Debug, Clone, Eq, PartialEq, Args)]
#[clap(about = ABOUT)]
#[clap(arg_required_else_help = true)]
pub struct Check {
    #[arg(short, long, help = RULE_HELP, conflicts_with = "all", required_unless_present = "all")]
    pub(crate) rule: Option<String>,
    #[arg(short, long, help = ALL_HELP)]
    pub(crate) all: bool,
    #[arg(long, help = ACCOUNT_ID_HELP)]
    pub(crate) account_id: Option<String>,
    #[arg(short, long, help = JSON_HELP)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    check: String,
    #[serde(flatten)]
    verdict: Verdict,
}

impl Check {
    fn checks(&self) -> Result<Vec<rules::Check>> {
        match &self.rule {
            Some(rule) => Ok(vec![rule.parse()?]),
            None => Ok(rules::Check::ALL.to_vec()),
        }
    }

    fn print(&self, writer: &mut Writer, reports: &[CheckReport]) -> Result<()> {
        if self.json {
            writeln!(writer, "{}", serde_json::to_string_pretty(reports)?)?;
            return Ok(());
        }
        for report in reports {
            let compliance = match report.verdict.compliance {
                ComplianceType::Compliant => report.verdict.compliance.as_str().green(),
                ComplianceType::NonCompliant => report.verdict.compliance.as_str().red(),
                ComplianceType::NotApplicable => report.verdict.compliance.as_str().yellow(),
            };
            match &report.verdict.annotation {
                Some(annotation) => {
                    writeln!(writer, "{} {compliance} ({annotation})", report.check)?
                }
                None => writeln!(writer, "{} {compliance}", report.check)?,
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Executable for Check {
    /// Runs the selected checks and reports one line per check.
    ///
    /// Returns `FAILURE_STATUS_CODE` when any check is non-compliant and
    /// `ERROR_STATUS_CODE` when the rule is unknown, the account cannot be
    /// determined or a check could not be evaluated.
    async fn execute(&self, context: &CommandContext, writer: &mut Writer) -> Result<i32> {
        let checks = match self.checks() {
            Ok(checks) => checks,
            Err(err @ Error::UnsupportedRule(_)) => {
                writer.write_err(err.to_string())?;
                return Ok(ERROR_STATUS_CODE);
            }
            Err(err) => return Err(err),
        };

        let account_id = match &self.account_id {
            Some(account_id) => account_id.clone(),
            None => match context.status.caller_account_id().await {
                Ok(account_id) => account_id,
                Err(err) => {
                    writer
                        .write_err(format!("Could not determine the account to check: {err}"))?;
                    return Ok(ERROR_STATUS_CODE);
                }
            },
        };

        let evaluator = Evaluator::new(context.status.clone());
        let mut reports = Vec::with_capacity(checks.len());
        let mut errored = false;
        for check in checks {
            match evaluator.evaluate(check, &account_id).await {
                Ok(verdict) => reports.push(CheckReport {
                    check: check.to_string(),
                    verdict,
                }),
                Err(err) => {
                    errored = true;
                    writer.write_err(format!("{check} could not be evaluated: {err}"))?;
                }
            }
        }

        self.print(writer, &reports)?;

        if errored {
            Ok(ERROR_STATUS_CODE)
        } else if reports
            .iter()
            .any(|report| report.verdict.compliance == ComplianceType::NonCompliant)
        {
            Ok(FAILURE_STATUS_CODE)
        } else {
            Ok(SUCCESS_STATUS_CODE)
        }
    }
}
