// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! HTML report for the CloudWatch custom widget: one block per catalog rule,
//! grouped by category, with a remediation link for failing rules and a
//! recheck action that calls the widget's own Lambda function.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use string_builder::Builder;

use crate::providers::{ComplianceStore, RuleCompliance};
use crate::rules::catalog::{self, Category};
use crate::rules::errors::Error;
use crate::rules::Result;
use crate::settings::Settings;

const PASS: &str = "✅";
const FAIL: &str = "❌";

pub struct Dashboard {
    store: Arc<dyn ComplianceStore>,
    rule_prefix: String,
    categories: &'static [Category],
}

impl Dashboard {
    pub fn new(store: Arc<dyn ComplianceStore>, settings: &Settings) -> Self {
        Dashboard {
            store,
            rule_prefix: settings.rule_prefix.clone(),
            categories: catalog::categories(),
        }
    }

    pub fn with_categories(mut self, categories: &'static [Category]) -> Self {
        self.categories = categories;
        self
    }

    fn is_known_rule(&self, config_rule_name: &str) -> bool {
        self.categories
            .iter()
            .flat_map(|category| category.rules.iter())
            .any(|rule| rule.config_rule_name(&self.rule_prefix) == config_rule_name)
    }

    /// Starts re-evaluation of a catalog rule. The evaluation runs inside AWS
    /// Config; its result shows up in a later render.
    pub async fn recheck(&self, config_rule_name: &str) -> Result<()> {
        if !self.is_known_rule(config_rule_name) {
            return Err(Error::UnsupportedRule(config_rule_name.to_string()));
        }
        self.store.start_evaluation(config_rule_name).await
    }

    /// Current compliance for every catalog rule, one query per category.
    pub async fn compliance(&self) -> Result<Vec<RuleCompliance>> {
        let mut compliance = Vec::new();
        for category in self.categories {
            let names = category.config_rule_names(&self.rule_prefix);
            debug!("Fetching compliance for {} rule(s) in {}", names.len(), category.name);
            compliance.extend(self.store.describe_compliance(&names).await?);
        }
        Ok(compliance)
    }

    /// Handles one widget invocation. `endpoint` is the ARN the recheck
    /// actions call back into.
    pub async fn handle(&self, recheck: Option<&str>, endpoint: &str) -> Result<String> {
        if let Some(config_rule_name) = recheck {
            info!("Recheck requested for {config_rule_name}");
            self.recheck(config_rule_name).await?;
        }
        let compliance = self.compliance().await?;
        render(self.categories, &compliance, endpoint, &self.rule_prefix)
    }
}

/// Renders the report. Rules missing from `compliance` are shown as failing.
pub fn render(
    categories: &[Category],
    compliance: &[RuleCompliance],
    endpoint: &str,
    rule_prefix: &str,
) -> Result<String> {
    let by_name = compliance
        .iter()
        .map(|rule| (rule.config_rule_name.as_str(), rule))
        .collect::<HashMap<_, _>>();

    let mut html = Builder::default();
    for category in categories {
        html.append(format!(
            "<h2 style=\"margin-top: 40px\">{}</h2>\n",
            escape_text(category.name)
        ));

        for rule in category.rules {
            let config_rule_name = rule.config_rule_name(rule_prefix);
            let compliant = by_name
                .get(config_rule_name.as_str())
                .map_or(false, |status| status.is_compliant());

            html.append(format!(
                "<h3 style=\"margin-top: 20px\">{} {}</h3>\n<p>{}</p>\n<p>\n",
                if compliant { PASS } else { FAIL },
                escape_text(rule.title),
                escape_text(rule.description)
            ));
            if !compliant {
                html.append(format!(
                    "<a class=\"btn btn-primary\" href=\"{}\" target=\"_blank\">Fix it</a>\n",
                    escape_attribute(rule.docs)
                ));
            }
            let payload = serde_json::json!({ "recheck": config_rule_name });
            html.append(format!(
                "<a class=\"btn btn-primary\">Recheck</a>\n\
                 <cwdb-action action=\"call\" endpoint=\"{}\" confirmation=\"message\">\n   {}\n</cwdb-action>\n</p>\n",
                escape_attribute(endpoint),
                escape_text(&payload.to_string())
            ));
        }
    }
    Ok(html.string()?)
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

#[cfg(test)]
#[path = "dashboard_tests.rs"]
mod dashboard_tests;
