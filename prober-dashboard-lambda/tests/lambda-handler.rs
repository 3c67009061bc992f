#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aws_prober::testing::InMemoryComplianceStore;
    use aws_prober::{ComplianceType, Dashboard, Error, Settings};
    use aws_prober_dashboard_lambda::{render_widget, WidgetEvent, DOCS};
    use pretty_assertions::assert_eq;

    const FUNCTION_ARN: &str = "arn:aws:lambda:eu-central-1:111122223333:function:ProberStack-dashboard";

    fn dashboard(store: &Arc<InMemoryComplianceStore>) -> Dashboard {
        Dashboard::new(store.clone(), &Settings::default())
    }

    #[tokio::test]
    async fn widget_event_with_context_renders_html() {
        let store = Arc::new(
            InMemoryComplianceStore::new()
                .with_compliance("prober-billing-budget-created", ComplianceType::Compliant),
        );
        let event: WidgetEvent = serde_json::from_value(serde_json::json!({
            "widgetContext": {
                "dashboardName": "aws-prober",
                "widgetId": "widget-1",
                "title": "",
                "width": 1200,
                "height": 800,
            }
        }))
        .unwrap();

        let html = render_widget(&dashboard(&store), event, FUNCTION_ARN)
            .await
            .expect("Failed to handle event");
        assert_eq!(10, html.matches(&format!("endpoint=\"{FUNCTION_ARN}\"")).count());
        assert_eq!(1, html.matches("✅").count());
        assert!(store.started().is_empty());
    }

    #[tokio::test]
    async fn recheck_payload_starts_evaluation() {
        let store = Arc::new(InMemoryComplianceStore::new());
        let event: WidgetEvent =
            serde_json::from_str("{ \"recheck\": \"prober-security-root-account-mfa-enabled\" }")
                .unwrap();

        let html = render_widget(&dashboard(&store), event, FUNCTION_ARN)
            .await
            .expect("Failed to handle event");
        assert_eq!(
            vec![String::from("prober-security-root-account-mfa-enabled")],
            store.started()
        );
        assert!(html.contains("{\"recheck\":\"prober-security-root-account-mfa-enabled\"}"));
    }

    #[tokio::test]
    async fn recheck_of_unknown_rule_fails() {
        let store = Arc::new(InMemoryComplianceStore::new());
        let event = WidgetEvent {
            recheck: Some(String::from("not-a-prober-rule")),
            ..WidgetEvent::default()
        };
        match render_widget(&dashboard(&store), event, FUNCTION_ARN).await {
            Err(Error::UnsupportedRule(rule)) => assert_eq!("not-a-prober-rule", rule),
            other => panic!("expected UnsupportedRule, got {other:?}"),
        }
        assert!(store.started().is_empty());
    }

    #[tokio::test]
    async fn describe_returns_documentation() {
        let store = Arc::new(InMemoryComplianceStore::new());
        let event: WidgetEvent = serde_json::from_str("{\"describe\": true}").unwrap();
        let docs = render_widget(&dashboard(&store), event, FUNCTION_ARN)
            .await
            .expect("Failed to handle event");
        assert_eq!(DOCS, docs);
        assert!(store.queries().is_empty());
    }
}
