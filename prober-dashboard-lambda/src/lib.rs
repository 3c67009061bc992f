// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use aws_prober::rules::Result;
use aws_prober::Dashboard;
use log::info;
use serde::Deserialize;

/// Returned when CloudWatch asks the widget to describe itself.
pub const DOCS: &str = r#"## aws-prober dashboard
Shows the AWS Config compliance of the aws-prober rules.

Parameters:
```
{ "recheck": "<config rule name>" }
```
`recheck` starts a new evaluation of that rule; the result appears on a later refresh.
"#;

/// Payload CloudWatch sends to a custom widget function. Widget metadata
/// such as `widgetContext` is accepted and ignored.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct WidgetEvent {
    #[serde(default)]
    pub recheck: Option<String>,
    #[serde(default)]
    pub describe: bool,
}

/// Renders the widget. `function_arn` is this function's ARN, used as the
/// target of the recheck actions.
pub async fn render_widget(
    dashboard: &Dashboard,
    event: WidgetEvent,
    function_arn: &str,
) -> Result<String> {
    if event.describe {
        return Ok(DOCS.to_string());
    }
    if let Some(recheck) = &event.recheck {
        info!("Widget requested recheck of {recheck}");
    }
    dashboard.handle(event.recheck.as_deref(), function_arn).await
}
