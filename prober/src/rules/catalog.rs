// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Static catalog of the rules shown on the dashboard, grouped by category.
//! Identifiers are unprefixed; the deployed AWS Config rule name is
//! `<prefix><identifier>`.

use serde::Serialize;

use crate::rules::Check;

pub const DEFAULT_RULE_PREFIX: &str = "prober-";

pub const SECURITY: &str = "SECURITY";
pub const COST_MANAGEMENT: &str = "COST MANAGEMENT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "identifier", rename_all = "lowercase")]
pub enum RuleSource {
    /// Evaluated by this crate.
    Custom(Check),
    /// An AWS managed Config rule, evaluated by AWS Config itself.
    Managed(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleDescriptor {
    pub identifier: &'static str,
    pub category: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub docs: &'static str,
    pub source: RuleSource,
}

impl RuleDescriptor {
    pub fn config_rule_name(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.identifier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: &'static str,
    pub rules: &'static [RuleDescriptor],
}

impl Category {
    pub fn config_rule_names(&self, prefix: &str) -> Vec<String> {
        self.rules
            .iter()
            .map(|rule| rule.config_rule_name(prefix))
            .collect()
    }
}

const SECURITY_RULES: &[RuleDescriptor] = &[
    RuleDescriptor {
        identifier: "security-iam-root-access-key-check",
        category: SECURITY,
        title: "No access keys for the AWS account root user exist",
        description: "Access keys of the root user grant permanent, unrestricted access to the \
            account and should not be used. The root user is the primary account administrator \
            and holds the highest level of permissions within an AWS account, so all of its \
            access keys should be deleted.",
        docs: "https://docs.aws.amazon.com/accounts/latest/reference/root-user-access-key.html#root-user-delete-access-key",
        source: RuleSource::Managed("IAM_ROOT_ACCESS_KEY_CHECK"),
    },
    RuleDescriptor {
        identifier: "security-root-account-mfa-enabled",
        category: SECURITY,
        title: "Multi-Factor Authentication (MFA) for the AWS root user account is enabled",
        description: "Enable Multi-Factor Authentication (MFA) for the AWS root user so that the \
            identity with complete administrative rights is protected by a second factor.",
        docs: "https://docs.aws.amazon.com/IAM/latest/UserGuide/id_credentials_mfa_enable_virtual.html#enable-virt-mfa-for-root",
        source: RuleSource::Managed("ROOT_ACCOUNT_MFA_ENABLED"),
    },
    RuleDescriptor {
        identifier: "security-account-has-no-iam-users",
        category: SECURITY,
        title: "AWS Account has no IAM users",
        description: "Remove all IAM users. Use IAM Identity Center (AWS SSO) for human access and \
            IAM roles with OIDC or IAM Roles Anywhere for machine access from outside of AWS. IAM \
            users carry long-term credentials such as access keys, passwords and MFA devices, \
            which can be compromised when not managed carefully and are hard to revoke or rotate.",
        docs: "https://docs.aws.amazon.com/IAM/latest/UserGuide/id_users_manage.html#id_users_deleting",
        source: RuleSource::Custom(Check::SecurityAccountHasNoIamUsers),
    },
    RuleDescriptor {
        identifier: "security-account-is-organizations-management-account",
        category: SECURITY,
        title: "AWS Organizations is enabled and this is the management account",
        description: "Set up a secure multi-account environment with AWS Organizations and move \
            workloads into member accounts. AWS Control Tower can help with this (note that \
            Control Tower enables AWS services that are not free of charge).",
        docs: "https://docs.aws.amazon.com/whitepapers/latest/organizing-your-aws-environment/benefits-of-using-multiple-aws-accounts.html",
        source: RuleSource::Custom(Check::SecurityAccountIsOrganizationsManagementAccount),
    },
];

const COST_MANAGEMENT_RULES: &[RuleDescriptor] = &[
    RuleDescriptor {
        identifier: "billing-iam-access-enabled",
        category: COST_MANAGEMENT,
        title: "IAM access to AWS billing and cost management services enabled",
        description: "Enable IAM access to the billing and cost management console so authorized \
            IAM users and roles can use it. Without it, the root user is needed for day to day \
            billing work.",
        docs: "https://docs.aws.amazon.com/IAM/latest/UserGuide/tutorial_billing.html",
        source: RuleSource::Custom(Check::BillingIamAccessEnabled),
    },
    RuleDescriptor {
        identifier: "billing-invoice-by-email-enabled",
        category: COST_MANAGEMENT,
        title: "PDF invoices via email enabled",
        description: "Have PDF invoices sent by email so that you or your accounting department \
            receive them on time without logging in to a separate portal.",
        docs: "https://docs.aws.amazon.com/awsaccountbilling/latest/aboutv2/emailed-invoice.html",
        source: RuleSource::Custom(Check::BillingInvoiceByEmailEnabled),
    },
    RuleDescriptor {
        identifier: "billing-budget-created",
        category: COST_MANAGEMENT,
        title: "AWS Budget created",
        description: "Create a budget with alerts for when the bill is about to exceed a \
            threshold. Include AWS credits in the budget settings so that credit burn is visible, \
            and enable auto-adjustment so the budget follows the actual bill over time.",
        docs: "https://docs.aws.amazon.com/cost-management/latest/userguide/budgets-create.html",
        source: RuleSource::Custom(Check::BillingBudgetCreated),
    },
    RuleDescriptor {
        identifier: "billing-tax-inheritance-enabled",
        category: COST_MANAGEMENT,
        title: "Tax Inheritance enabled",
        description: "Enable Tax Inheritance so that usage of member accounts in the AWS \
            Organization is consolidated into a single tax invoice instead of one per account.",
        docs: "https://docs.aws.amazon.com/awsaccountbilling/latest/aboutv2/manage-account-payment.html#manage-account-tax-linked-accounts",
        source: RuleSource::Custom(Check::BillingTaxInheritanceEnabled),
    },
    RuleDescriptor {
        identifier: "billing-cost-anomaly-detector-created",
        category: COST_MANAGEMENT,
        title: "AWS Cost Anomaly Detection enabled",
        description: "Enable AWS Cost Anomaly Detection to spot abnormal spikes or drops in AWS \
            costs early. Alerts raised on an anomaly give a head start on finding the cause of an \
            unexpected bill.",
        docs: "https://docs.aws.amazon.com/cost-management/latest/userguide/getting-started-ad.html",
        source: RuleSource::Custom(Check::BillingCostAnomalyDetectorCreated),
    },
    RuleDescriptor {
        identifier: "billing-compute-optimizer-enabled",
        category: COST_MANAGEMENT,
        title: "AWS Compute Optimizer enabled",
        description: "Enable AWS Compute Optimizer to receive rightsizing recommendations for EC2 \
            instances, Lambda functions and Fargate containers, and to find cost savings.",
        docs: "https://docs.aws.amazon.com/compute-optimizer/latest/ug/getting-started.html#account-opt-in",
        source: RuleSource::Custom(Check::BillingComputeOptimizerEnabled),
    },
];

const CATEGORIES: &[Category] = &[
    Category {
        name: SECURITY,
        rules: SECURITY_RULES,
    },
    Category {
        name: COST_MANAGEMENT,
        rules: COST_MANAGEMENT_RULES,
    },
];

/// Categories in dashboard order.
pub fn categories() -> &'static [Category] {
    CATEGORIES
}

pub fn rules() -> impl Iterator<Item = &'static RuleDescriptor> {
    CATEGORIES.iter().flat_map(|category| category.rules.iter())
}

pub fn find(identifier: &str) -> Option<&'static RuleDescriptor> {
    rules().find(|rule| rule.identifier == identifier)
}

pub fn find_by_config_rule_name(prefix: &str, name: &str) -> Option<&'static RuleDescriptor> {
    name.strip_prefix(prefix).and_then(find)
}
