use crate::tag::Tag;
use std::collections::BTreeMap;
use stratus_template::{Properties, Resolvable};

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::Lambda::Function")]
pub struct Function {
    pub function_name: Option<String>,
    pub description: Option<String>,
    pub handler: Option<String>,
    pub runtime: Option<String>,
    /// ARN of the execution role
    pub role: Resolvable<String>,
    pub code: Code,
    pub memory_size: Option<i64>,
    pub timeout: Option<i64>,
    pub architectures: Option<Vec<String>>,
    pub environment: Option<Environment>,
    pub tags: Option<Vec<Tag>>,
}

/// Deployment package, either inline source, an S3 object or a container image
#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct Code {
    pub s3_bucket: Option<Resolvable<String>>,
    pub s3_key: Option<String>,
    pub zip_file: Option<String>,
    pub image_uri: Option<String>,
}

impl Code {
    pub fn inline(source: impl Into<String>) -> Self {
        Code {
            zip_file: Some(source.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct Environment {
    pub variables: Option<BTreeMap<String, Resolvable<String>>>,
}

/// Grants a service or account permission to invoke a function
#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::Lambda::Permission")]
pub struct Permission {
    pub action: String,
    pub function_name: Resolvable<String>,
    pub principal: String,
    pub source_arn: Option<Resolvable<String>>,
    pub source_account: Option<Resolvable<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use stratus_template::{Intrinsic, Resource};

    #[test]
    fn test_function() {
        let function = Function {
            handler: Some("index.handler".into()),
            runtime: Some("python3.12".into()),
            role: Intrinsic::get_att("Role", "Arn").into(),
            code: Code::inline("def handler(event, context):\n    return event\n"),
            environment: Some(Environment {
                variables: Some(BTreeMap::from([
                    ("LOG_LEVEL".to_string(), "info".into()),
                    ("TABLE_NAME".to_string(), Intrinsic::reference("Table").into()),
                ])),
            }),
            ..Default::default()
        };

        assert_eq!(
            Value::Object(function.declare().serialize().unwrap()),
            json!({
                "Handler": "index.handler",
                "Runtime": "python3.12",
                "Role": { "Fn::GetAtt": ["Role", "Arn"] },
                "Code": { "ZipFile": "def handler(event, context):\n    return event\n" },
                "Environment": {
                    "Variables": { "LOG_LEVEL": "info", "TABLE_NAME": { "Ref": "Table" } }
                }
            })
        );
    }

    #[test]
    fn test_code_wire_names() {
        let names: Vec<&str> = Code::specs().iter().map(|spec| spec.wire_name).collect();
        assert_eq!(names, vec!["S3Bucket", "S3Key", "ZipFile", "ImageUri"]);
    }
}
