use serde_json::json;
use stratus_resources::iam;
use stratus_resources::kinesisanalytics::{
    Application, Input, InputParallelism, InputSchema, JsonMappingParameters, KinesisStreamsInput,
    MappingParameters, RecordColumn, RecordFormat,
};
use stratus_template::{Intrinsic, Template, ValidationError};

pub(super) const NAME: &str = "kinesis-analytics";
pub(super) const DESCRIPTION: &str = "Kinesis Analytics SQL application aggregating a stock ticker stream";

const STREAM_ARN: &str = "arn:${AWS::Partition}:kinesis:${AWS::Region}:${AWS::AccountId}:stream/ticker";

const APPLICATION_CODE: &str = r#"CREATE OR REPLACE STREAM "DESTINATION_SQL_STREAM" (ticker VARCHAR(4), avg_price DOUBLE);
CREATE OR REPLACE PUMP "STREAM_PUMP" AS INSERT INTO "DESTINATION_SQL_STREAM"
SELECT STREAM ticker, AVG(price) OVER W1
FROM "SOURCE_SQL_STREAM_001"
WINDOW W1 AS (PARTITION BY ticker RANGE INTERVAL '1' MINUTE PRECEDING);
"#;

pub(super) fn template() -> Result<Template, ValidationError> {
    let mut template = Template::new().description(DESCRIPTION);

    template
        .add(
            "ApplicationRole",
            &iam::Role {
                assume_role_policy_document: iam::service_trust_policy(
                    "kinesisanalytics.amazonaws.com",
                ),
                policies: Some(vec![iam::Policy {
                    policy_name: "read-ticker-stream".into(),
                    policy_document: json!({
                        "Version": "2012-10-17",
                        "Statement": [{
                            "Effect": "Allow",
                            "Action": ["kinesis:DescribeStream", "kinesis:GetShardIterator", "kinesis:GetRecords"],
                            "Resource": { "Fn::Sub": STREAM_ARN }
                        }]
                    }),
                }]),
                ..Default::default()
            },
        )?
        .add(
            "Application",
            &Application {
                application_name: Some("ticker-averages".into()),
                application_code: Some(APPLICATION_CODE.into()),
                inputs: vec![Input {
                    name_prefix: "SOURCE_SQL_STREAM".into(),
                    input_schema: InputSchema {
                        record_columns: vec![
                            RecordColumn::new("ticker", "VARCHAR(4)", "$.ticker"),
                            RecordColumn::new("price", "DOUBLE", "$.price"),
                        ],
                        record_format: RecordFormat {
                            record_format_type: "JSON".into(),
                            mapping_parameters: Some(MappingParameters {
                                json_mapping_parameters: Some(JsonMappingParameters {
                                    record_row_path: "$".into(),
                                }),
                                csv_mapping_parameters: None,
                            }),
                        },
                        record_encoding: Some("UTF-8".into()),
                    },
                    kinesis_streams_input: Some(KinesisStreamsInput {
                        resource_arn: Intrinsic::sub(STREAM_ARN).into(),
                        role_arn: Intrinsic::get_att("ApplicationRole", "Arn").into(),
                    }),
                    input_parallelism: Some(InputParallelism { count: Some(1) }),
                    ..Default::default()
                }],
                ..Default::default()
            },
        )?;

    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_input() {
        let rendered = template().unwrap().render().unwrap();
        let input = &rendered["Resources"]["Application"]["Properties"]["Inputs"][0];

        assert_eq!(input["KinesisStreamsInput"]["RoleARN"], json!({ "Fn::GetAtt": ["ApplicationRole", "Arn"] }));
        assert_eq!(input["InputParallelism"], json!({ "Count": 1 }));
        assert_eq!(input["InputSchema"]["RecordColumns"][1]["SqlType"], "DOUBLE");
        assert!(rendered.get("Outputs").is_none());
    }
}
