// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use async_trait::async_trait;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::commands::{CommandContext, Executable, SUCCESS_STATUS_CODE};
use crate::rules::catalog::{self, RuleDescriptor, RuleSource};
use crate::rules::Result;
use crate::utils::writer::Writer;

const ABOUT: &str = "List the rules shown on the dashboard and how each is evaluated";
const JSON_HELP: &str = "Print the catalog as JSON";

#[derive(Debug, Clone, Eq, PartialEq, Args)]
#[clap(about = ABOUT)]
pub struct Rules {
    #[arg(short, long, help = JSON_HELP)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct ListedRule<'a> {
    config_rule_name: String,
    #[serde(flatten)]
    descriptor: &'a RuleDescriptor,
}

#[async_trait]
impl Executable for Rules {
    async fn execute(&self, context: &CommandContext, writer: &mut Writer) -> Result<i32> {
        let prefix = &context.settings.rule_prefix;
        if self.json {
            let listed = catalog::rules()
                .map(|descriptor| ListedRule {
                    config_rule_name: descriptor.config_rule_name(prefix),
                    descriptor,
                })
                .collect::<Vec<_>>();
            writeln!(writer, "{}", serde_json::to_string_pretty(&listed)?)?;
            return Ok(SUCCESS_STATUS_CODE);
        }

        for category in catalog::categories() {
            writeln!(writer, "{}", category.name.bold())?;
            for rule in category.rules {
                let source = match rule.source {
                    RuleSource::Custom(_) => String::from("custom"),
                    RuleSource::Managed(identifier) => format!("managed:{identifier}"),
                };
                writeln!(
                    writer,
                    "  {} [{source}] {}",
                    rule.config_rule_name(prefix),
                    rule.title
                )?;
            }
        }
        Ok(SUCCESS_STATUS_CODE)
    }
}
