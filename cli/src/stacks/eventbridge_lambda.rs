use serde_json::json;
use std::collections::BTreeMap;
use stratus_resources::{events, iam, lambda, logs};
use stratus_template::{Intrinsic, Output, Parameter, Resource, Template, ValidationError};

pub(super) const NAME: &str = "eventbridge-lambda";
pub(super) const DESCRIPTION: &str = "Lambda function invoked by a scheduled EventBridge rule";

const HANDLER_SOURCE: &str = r#"import json
import logging

logger = logging.getLogger()
logger.setLevel(logging.INFO)


def handler(event, context):
    logger.info(json.dumps(event))
    return {"status": "ok"}
"#;

pub(super) fn template() -> Result<Template, ValidationError> {
    let mut template = Template::new().description(DESCRIPTION);

    template
        .parameter(
            "ScheduleRate",
            Parameter::string()
                .description("How often the handler runs")
                .default("rate(5 minutes)")
                .allowed_pattern(r"^rate\(\d+ (minute|minutes|hour|hours|day|days)\)$"),
        )?
        .add(
            "HandlerRole",
            &iam::Role {
                assume_role_policy_document: iam::service_trust_policy("lambda.amazonaws.com"),
                managed_policy_arns: Some(vec![iam::managed_policy_arn(
                    "service-role/AWSLambdaBasicExecutionRole",
                )]),
                ..Default::default()
            },
        )?
        .add(
            "Handler",
            &lambda::Function {
                description: Some("Logs every event it receives".into()),
                handler: Some("index.handler".into()),
                runtime: Some("python3.12".into()),
                role: Intrinsic::get_att("HandlerRole", "Arn").into(),
                code: lambda::Code::inline(HANDLER_SOURCE),
                memory_size: Some(128),
                timeout: Some(10),
                architectures: Some(vec!["arm64".into()]),
                environment: Some(lambda::Environment {
                    variables: Some(BTreeMap::from([
                        ("LOG_GROUP".to_string(), Intrinsic::reference("HandlerLogs").into()),
                        ("POWERTOOLS_SERVICE_NAME".to_string(), NAME.into()),
                    ])),
                }),
                ..Default::default()
            },
        )?
        .add_declaration(
            "HandlerLogs",
            logs::LogGroup {
                log_group_name: Some("/aws/lambda/eventbridge-lambda".into()),
                retention_in_days: Some(14),
                ..Default::default()
            }
            .declare()
            .destroy_on_removal(),
        )?
        .add(
            "Schedule",
            &events::Rule {
                description: Some("Invoke the handler on a schedule".into()),
                schedule_expression: Some(Intrinsic::reference("ScheduleRate").into()),
                state: Some("ENABLED".into()),
                targets: Some(vec![events::Target {
                    arn: Intrinsic::get_att("Handler", "Arn").into(),
                    id: "handler".into(),
                    input: Some(json!({ "source": NAME }).to_string()),
                    ..Default::default()
                }]),
                ..Default::default()
            },
        )?
        .add(
            "SchedulePermission",
            &lambda::Permission {
                action: "lambda:InvokeFunction".into(),
                function_name: Intrinsic::reference("Handler").into(),
                principal: "events.amazonaws.com".into(),
                source_arn: Some(Intrinsic::get_att("Schedule", "Arn").into()),
                ..Default::default()
            },
        )?
        .output(
            "HandlerArn",
            Output::new(Intrinsic::get_att("Handler", "Arn")).description("Scheduled function"),
        )?;

    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_targets_function() {
        let rendered = template().unwrap().render().unwrap();
        let resources = &rendered["Resources"];

        assert_eq!(
            resources["Schedule"]["Properties"]["Targets"][0]["Arn"],
            json!({ "Fn::GetAtt": ["Handler", "Arn"] })
        );
        assert_eq!(
            resources["SchedulePermission"]["Properties"]["SourceArn"],
            json!({ "Fn::GetAtt": ["Schedule", "Arn"] })
        );
        assert_eq!(
            resources["Schedule"]["Properties"]["ScheduleExpression"],
            json!({ "Ref": "ScheduleRate" })
        );
        assert_eq!(rendered["Parameters"]["ScheduleRate"]["Default"], "rate(5 minutes)");
        assert_eq!(
            resources["Handler"]["Properties"]["Environment"],
            json!({
                "Variables": {
                    "LOG_GROUP": { "Ref": "HandlerLogs" },
                    "POWERTOOLS_SERVICE_NAME": "eventbridge-lambda"
                }
            })
        );
    }
}
