// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use aws_prober::providers::ComplianceStore;
use aws_prober::rules::evaluation::build_evaluation;
use aws_prober::rules::Result;
use aws_prober::{Check, Error, Evaluator, InvokingEvent, Verdict};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Event sent by AWS Config to a custom rule's function.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRuleEvent {
    pub invoking_event: String,
    #[serde(default)]
    pub rule_parameters: Option<String>,
    pub result_token: String,
    pub account_id: String,
    #[serde(default)]
    pub config_rule_name: Option<String>,
    #[serde(default)]
    pub event_left_scope: bool,
}

/// Direct invocation, e.g. `{"check": "billing-budget-created"}`.
#[derive(Deserialize, Debug, Clone)]
pub struct DirectCheck {
    pub check: String,
    #[serde(rename = "accountId", default)]
    pub account_id: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum ProberEvent {
    ConfigRule(ConfigRuleEvent),
    Direct(DirectCheck),
}

#[derive(Deserialize, Debug)]
struct RuleParameters {
    #[serde(default)]
    check: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CheckOutput {
    pub compliance: bool,
}

pub struct ProberHandler {
    evaluator: Evaluator,
    store: Arc<dyn ComplianceStore>,
}

impl ProberHandler {
    pub fn new(evaluator: Evaluator, store: Arc<dyn ComplianceStore>) -> Self {
        ProberHandler { evaluator, store }
    }

    /// Config invocations submit their evaluation and return nothing; direct
    /// invocations return the verdict.
    pub async fn handle(&self, event: ProberEvent) -> Result<Option<CheckOutput>> {
        match event {
            ProberEvent::ConfigRule(event) => {
                self.handle_config_rule(event).await?;
                Ok(None)
            }
            ProberEvent::Direct(event) => self.handle_direct(event).await.map(Some),
        }
    }

    async fn handle_config_rule(&self, event: ConfigRuleEvent) -> Result<()> {
        let check = rule_check(event.rule_parameters.as_deref())?;
        let invoking_event = InvokingEvent::from_json(&event.invoking_event)?;
        if !invoking_event.is_scheduled() {
            debug!(
                "Invoked by {} instead of a scheduled notification",
                invoking_event.message_type.as_deref().unwrap_or("an unknown message")
            );
        }
        info!(
            "Config rule {} invoked check {check} for account {}",
            event.config_rule_name.as_deref().unwrap_or("<unnamed>"),
            event.account_id
        );

        let verdict = if event.event_left_scope {
            Verdict::not_applicable("Resource is no longer in scope of the rule")
        } else {
            self.evaluator.evaluate(check, &event.account_id).await?
        };

        let evaluation = build_evaluation(&event.account_id, verdict, &invoking_event)?;
        self.store
            .put_evaluations(&[evaluation], &event.result_token)
            .await
    }

    async fn handle_direct(&self, event: DirectCheck) -> Result<CheckOutput> {
        let check = event.check.parse::<Check>()?;
        let account_id = match event.account_id {
            Some(account_id) => account_id,
            None => self.evaluator.status().caller_account_id().await?,
        };
        let verdict = self.evaluator.evaluate(check, &account_id).await?;
        Ok(CheckOutput {
            compliance: verdict.is_compliant(),
        })
    }
}

fn rule_check(rule_parameters: Option<&str>) -> Result<Check> {
    let raw = rule_parameters.unwrap_or("{}");
    let parameters: RuleParameters = serde_json::from_str(raw)?;
    match parameters.check {
        Some(check) => check.parse(),
        None => Err(Error::MissingRuleParameter(raw.to_string())),
    }
}
