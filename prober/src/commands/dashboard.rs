// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use async_trait::async_trait;
use clap::Args;

use crate::commands::{CommandContext, Executable, SUCCESS_STATUS_CODE};
use crate::dashboard;
use crate::rules::Result;
use crate::utils::writer::Writer;

const ABOUT: &str = "Render the compliance dashboard as HTML";
const RECHECK_HELP: &str = "AWS Config rule name to re-evaluate before rendering";
const ENDPOINT_HELP: &str = "Function ARN the recheck actions call";
const OUTPUT_HELP: &str = "Write to output file";

#[derive(Debug, Clone, Eq, PartialEq, Args)]
#[clap(about = ABOUT)]
pub struct Dashboard {
    #[arg(short, long, help = RECHECK_HELP)]
    pub(crate) recheck: Option<String>,
    #[arg(short, long, default_value = "", help = ENDPOINT_HELP)]
    pub(crate) endpoint: String,
    #[arg(short, long, help = OUTPUT_HELP)]
    pub(crate) output: Option<String>,
}

#[async_trait]
impl Executable for Dashboard {
    async fn execute(&self, context: &CommandContext, writer: &mut Writer) -> Result<i32> {
        let html = dashboard::Dashboard::new(context.store.clone(), &context.settings)
            .handle(self.recheck.as_deref(), &self.endpoint)
            .await?;
        write!(writer, "{html}")?;
        Ok(SUCCESS_STATUS_CODE)
    }
}
