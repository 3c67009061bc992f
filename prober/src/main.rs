// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::process::exit;
use std::sync::Arc;

use aws_prober::commands::{CommandContext, Executable, Prober};
use aws_prober::providers::aws::{load_sdk_config, AwsAccountStatus, ConfigServiceStore};
use aws_prober::rules::Result;
use aws_prober::settings::Settings;
use aws_prober::utils::writer::WriteBuffer::{File as WBFile, Stdout};
use aws_prober::utils::writer::Writer;
use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;

#[tokio::main]
async fn main() -> Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()?;

    let args = Prober::parse();

    let mut writer = match args.command.output() {
        Some(file) => Writer::new(WBFile(File::create(file)?)),
        None => Writer::new(Stdout(std::io::stdout())),
    };

    let settings = Settings {
        rule_prefix: args.rule_prefix.clone(),
        ..Settings::from_env()
    };
    let sdk_config = load_sdk_config().await;
    let context = CommandContext {
        status: Arc::new(AwsAccountStatus::from_settings(&sdk_config, &settings).await),
        store: Arc::new(ConfigServiceStore::new(&sdk_config)),
        settings,
    };

    match args.command.execute(&context, &mut writer).await {
        Err(e) => {
            writer
                .write_err(format!("Error occurred {e}"))
                .expect("failed to write to stderr");
            exit(-1);
        }
        Ok(code) => exit(code),
    }
}
