// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub mod commands;
pub mod dashboard;
pub mod providers;
pub mod rules;
pub mod settings;
pub mod testing;
pub mod utils;

pub use crate::dashboard::Dashboard;
pub use crate::providers::{AccountStatus, BillingPreference, ComplianceStore, RuleCompliance};
pub use crate::rules::errors::Error;
pub use crate::rules::evaluation::{build_evaluation, Evaluation, InvokingEvent};
pub use crate::rules::evaluator::{Evaluator, MembershipPolicy};
pub use crate::rules::{Check, ComplianceType, Verdict};
pub use crate::settings::Settings;
