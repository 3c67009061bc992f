// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use aws_prober::providers::aws::{load_sdk_config, AwsAccountStatus, ConfigServiceStore};
use aws_prober::{Evaluator, Settings};
use aws_prober_lambda::{ProberEvent, ProberHandler};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use log::LevelFilter;
use simple_logger::SimpleLogger;

#[tokio::main]
async fn main() -> Result<(), Error> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()?;

    let settings = Settings::from_env();
    let sdk_config = load_sdk_config().await;
    let status = AwsAccountStatus::from_settings(&sdk_config, &settings).await;
    let handler = ProberHandler::new(
        Evaluator::new(Arc::new(status)),
        Arc::new(ConfigServiceStore::new(&sdk_config)),
    );

    let handler = &handler;
    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<ProberEvent>| async move {
            handler.handle(event.payload).await.map_err(Error::from)
        },
    ))
    .await
}
