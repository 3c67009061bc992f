// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub mod check;
pub mod dashboard;
pub mod rules;

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, Subcommand};

use crate::providers::{AccountStatus, ComplianceStore};
use crate::rules::catalog::DEFAULT_RULE_PREFIX;
use crate::rules::Result;
use crate::settings::{Settings, RULE_PREFIX_ENV};
use crate::utils::writer::Writer;

//
// Constants
//
// Application metadata
pub const APP_NAME: &str = "aws-prober";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
// Exit codes
pub const SUCCESS_STATUS_CODE: i32 = 0;
pub const ERROR_STATUS_CODE: i32 = 5;
pub const FAILURE_STATUS_CODE: i32 = 19;

const ABOUT: &str = r#"
  Checks an AWS account for foundational security and billing best practices:
  root user credentials, IAM users, AWS Organizations, budgets, cost anomaly
  detection, Compute Optimizer and billing preferences. The same checks back
  the AWS Config custom rules and the CloudWatch dashboard."#;
const RULE_PREFIX_HELP: &str = "Prefix of the deployed AWS Config rule names";

#[derive(Debug, Parser)]
#[command(name = APP_NAME, version = APP_VERSION, about = ABOUT)]
#[command(arg_required_else_help = true)]
pub struct Prober {
    #[arg(long, global = true, env = RULE_PREFIX_ENV, default_value = DEFAULT_RULE_PREFIX, help = RULE_PREFIX_HELP)]
    pub rule_prefix: String,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Check(check::Check),
    Rules(rules::Rules),
    Dashboard(dashboard::Dashboard),
}

impl Commands {
    /// File the command output is redirected to, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Commands::Dashboard(dashboard) => dashboard.output.as_deref(),
            Commands::Check(_) | Commands::Rules(_) => None,
        }
    }
}

/// Everything a command needs from its environment.
pub struct CommandContext {
    pub settings: Settings,
    pub status: Arc<dyn AccountStatus>,
    pub store: Arc<dyn ComplianceStore>,
}

#[async_trait]
pub trait Executable {
    async fn execute(&self, context: &CommandContext, writer: &mut Writer) -> Result<i32>;
}

#[async_trait]
impl Executable for Commands {
    async fn execute(&self, context: &CommandContext, writer: &mut Writer) -> Result<i32> {
        match self {
            Commands::Check(cmd) => cmd.execute(context, writer).await,
            Commands::Rules(cmd) => cmd.execute(context, writer).await,
            Commands::Dashboard(cmd) => cmd.execute(context, writer).await,
        }
    }
}
