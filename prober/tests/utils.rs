// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use aws_prober::commands::{CommandContext, Executable, Prober, APP_NAME};
use aws_prober::providers::{AccountStatus, ComplianceStore};
use aws_prober::settings::Settings;
use aws_prober::utils::writer::Writer;
use clap::Parser;

#[non_exhaustive]
pub struct StatusCode;

#[allow(dead_code)]
impl StatusCode {
    pub const SUCCESS: i32 = 0;
    pub const INTERNAL_FAILURE: i32 = -1;
    pub const PARSING_ERROR: i32 = -2;
    pub const ERROR: i32 = 5;
    pub const NON_COMPLIANT: i32 = 19;
}

#[allow(dead_code)]
pub fn compare_write_buffer_with_string(expected_output: &str, actual_output_writer: Writer) {
    let actual_output = actual_output_writer.stripped().unwrap();
    pretty_assertions::assert_eq!(expected_output, actual_output)
}

#[macro_export]
macro_rules! assert_output_from_str_eq {
    ($expected_output: expr, $actual_output_writer: expr) => {
        $crate::utils::compare_write_buffer_with_string($expected_output, $actual_output_writer)
    };
}

pub trait CommandTestRunner {
    fn build_args(&self) -> Vec<String>;

    fn run(
        &self,
        status: Arc<dyn AccountStatus>,
        store: Arc<dyn ComplianceStore>,
        writer: &mut Writer,
    ) -> i32 {
        let args = self
            .build_args()
            .into_iter()
            .fold(vec![String::from(APP_NAME)], |mut res, arg| {
                res.push(arg);
                res
            });

        let parsed = match Prober::try_parse_from(args) {
            Ok(parsed) => parsed,
            Err(_) => return StatusCode::PARSING_ERROR,
        };

        let context = CommandContext {
            settings: Settings {
                rule_prefix: parsed.rule_prefix.clone(),
                ..Settings::default()
            },
            status,
            store,
        };

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        match runtime.block_on(parsed.command.execute(&context, writer)) {
            Err(e) => {
                writer
                    .write_err(format!("Error occurred {e}"))
                    .expect("failed to write to stderr");
                StatusCode::INTERNAL_FAILURE
            }
            Ok(code) => code,
        }
    }
}
