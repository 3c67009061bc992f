// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use aws_prober::providers::aws::{load_sdk_config, ConfigServiceStore};
use aws_prober::{Dashboard, Settings};
use aws_prober_dashboard_lambda::{render_widget, WidgetEvent};
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
    let dashboard = Dashboard::new(Arc::new(ConfigServiceStore::new(&sdk_config)), &settings);

    let dashboard = &dashboard;
    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<WidgetEvent>| async move {
            render_widget(dashboard, event.payload, &event.context.invoked_function_arn)
                .await
                .map_err(Error::from)
        },
    ))
    .await
}
