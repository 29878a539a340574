//! Kinesis Data Analytics SQL applications.

use stratus_template::{Properties, Resolvable};

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::KinesisAnalytics::Application")]
pub struct Application {
    pub application_name: Option<String>,
    pub application_description: Option<String>,
    /// SQL statements reading the in-application input streams
    pub application_code: Option<String>,
    pub inputs: Vec<Input>,
}

/// Streaming source and how its records map to SQL columns
#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct Input {
    pub name_prefix: String,
    pub input_schema: InputSchema,
    pub kinesis_streams_input: Option<KinesisStreamsInput>,
    pub kinesis_firehose_input: Option<KinesisFirehoseInput>,
    pub input_parallelism: Option<InputParallelism>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct InputSchema {
    pub record_columns: Vec<RecordColumn>,
    pub record_format: RecordFormat,
    pub record_encoding: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct RecordColumn {
    pub name: String,
    pub sql_type: String,
    pub mapping: Option<String>,
}

impl RecordColumn {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>, mapping: impl Into<String>) -> Self {
        RecordColumn {
            name: name.into(),
            sql_type: sql_type.into(),
            mapping: Some(mapping.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct RecordFormat {
    /// `JSON` or `CSV`
    pub record_format_type: String,
    pub mapping_parameters: Option<MappingParameters>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct MappingParameters {
    #[cfn(rename = "JSONMappingParameters")]
    pub json_mapping_parameters: Option<JsonMappingParameters>,
    #[cfn(rename = "CSVMappingParameters")]
    pub csv_mapping_parameters: Option<CsvMappingParameters>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct JsonMappingParameters {
    pub record_row_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct CsvMappingParameters {
    pub record_row_delimiter: String,
    pub record_column_delimiter: String,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct KinesisStreamsInput {
    #[cfn(rename = "ResourceARN")]
    pub resource_arn: Resolvable<String>,
    #[cfn(rename = "RoleARN")]
    pub role_arn: Resolvable<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct KinesisFirehoseInput {
    #[cfn(rename = "ResourceARN")]
    pub resource_arn: Resolvable<String>,
    #[cfn(rename = "RoleARN")]
    pub role_arn: Resolvable<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct InputParallelism {
    pub count: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stratus_template::{Intrinsic, Resource};

    #[test]
    fn test_arn_renames() {
        let application = Application {
            inputs: vec![Input {
                name_prefix: "SOURCE_SQL_STREAM".into(),
                input_schema: InputSchema {
                    record_columns: vec![RecordColumn::new("ticker", "VARCHAR(4)", "$.ticker")],
                    record_format: RecordFormat {
                        record_format_type: "JSON".into(),
                        mapping_parameters: Some(MappingParameters {
                            json_mapping_parameters: Some(JsonMappingParameters {
                                record_row_path: "$".into(),
                            }),
                            csv_mapping_parameters: None,
                        }),
                    },
                    record_encoding: None,
                },
                kinesis_streams_input: Some(KinesisStreamsInput {
                    resource_arn: Intrinsic::get_att("Stream", "Arn").into(),
                    role_arn: Intrinsic::get_att("Role", "Arn").into(),
                }),
                ..Default::default()
            }],
            ..Default::default()
        };

        let mapping = application.declare().serialize().unwrap();
        let input = &mapping["Inputs"][0];

        assert_eq!(
            input["KinesisStreamsInput"],
            json!({
                "ResourceARN": { "Fn::GetAtt": ["Stream", "Arn"] },
                "RoleARN": { "Fn::GetAtt": ["Role", "Arn"] }
            })
        );

        assert_eq!(
            input["InputSchema"]["RecordFormat"]["MappingParameters"],
            json!({ "JSONMappingParameters": { "RecordRowPath": "$" } })
        );

        assert_eq!(
            input["InputSchema"]["RecordColumns"],
            json!([{ "Name": "ticker", "SqlType": "VARCHAR(4)", "Mapping": "$.ticker" }])
        );
    }
}
