// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::rules::catalog::DEFAULT_RULE_PREFIX;

pub const RULE_PREFIX_ENV: &str = "PROBER_RULE_PREFIX";
pub const BILLING_ROLE_ENV: &str = "AWS_API_LIB_ROLE";

/// Runtime settings shared by the CLI and both Lambda functions. Region and
/// credentials are resolved by the AWS SDK's default chain, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Prepended to catalog identifiers to form AWS Config rule names.
    pub rule_prefix: String,
    /// Role assumed for billing and tax lookups.
    pub billing_role_arn: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            rule_prefix: DEFAULT_RULE_PREFIX.to_string(),
            billing_role_arn: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Settings {
            rule_prefix: non_empty(RULE_PREFIX_ENV).unwrap_or_else(|| DEFAULT_RULE_PREFIX.to_string()),
            billing_role_arn: non_empty(BILLING_ROLE_ENV),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        assert_eq!(Settings::default(), Settings::from_lookup(|_| None));
    }

    #[test]
    fn reads_prefix_and_role() {
        let env = HashMap::from([
            (RULE_PREFIX_ENV, "acme-"),
            (BILLING_ROLE_ENV, "arn:aws:iam::111122223333:role/billing-reader"),
        ]);
        let settings = Settings::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!("acme-", settings.rule_prefix);
        assert_eq!(
            Some("arn:aws:iam::111122223333:role/billing-reader"),
            settings.billing_role_arn.as_deref()
        );
    }

    #[test]
    fn blank_values_are_ignored() {
        let settings = Settings::from_lookup(|_| Some(String::from("  ")));
        assert_eq!(Settings::default(), settings);
    }
}
