use stratus_template::{Properties, Resolvable};

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::Events::Rule")]
pub struct Rule {
    pub name: Option<String>,
    pub description: Option<String>,
    /// `rate(5 minutes)` or `cron(0 12 * * ? *)`
    pub schedule_expression: Option<Resolvable<String>>,
    pub event_pattern: Option<serde_json::Value>,
    pub event_bus_name: Option<Resolvable<String>>,
    /// `ENABLED` or `DISABLED`
    pub state: Option<String>,
    pub targets: Option<Vec<Target>>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct Target {
    pub arn: Resolvable<String>,
    /// Unique among the targets of a rule
    pub id: String,
    pub input: Option<String>,
    pub role_arn: Option<Resolvable<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stratus_template::{Intrinsic, Resource};

    #[test]
    fn test_event_pattern_is_kept_verbatim() {
        let pattern = json!({ "source": ["aws.partner/shopify.com"], "detail-type": ["orders/create"] });

        let rule = Rule {
            event_pattern: Some(pattern.clone()),
            targets: Some(vec![Target {
                arn: Intrinsic::get_att("Handler", "Arn").into(),
                id: "handler".into(),
                ..Default::default()
            }]),
            ..Default::default()
        };

        let mapping = rule.declare().serialize().unwrap();

        assert_eq!(mapping["EventPattern"], pattern);
        assert_eq!(
            mapping["Targets"],
            json!([{ "Arn": { "Fn::GetAtt": ["Handler", "Arn"] }, "Id": "handler" }])
        );
    }
}
