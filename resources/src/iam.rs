use crate::tag::Tag;
use serde_json::{json, Value};
use stratus_template::{Properties, Resolvable};

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::IAM::Role")]
pub struct Role {
    pub role_name: Option<String>,
    pub description: Option<String>,
    pub assume_role_policy_document: Value,
    pub managed_policy_arns: Option<Vec<Resolvable<String>>>,
    pub policies: Option<Vec<Policy>>,
    pub tags: Option<Vec<Tag>>,
}

/// Inline policy embedded in a role
#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct Policy {
    pub policy_name: String,
    pub policy_document: Value,
}

/// Trust policy letting an AWS service assume the role, e.g. `lambda.amazonaws.com`
pub fn service_trust_policy(service: &str) -> Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": service },
            "Action": "sts:AssumeRole"
        }]
    })
}

/// ARN of an AWS managed policy in the current partition
pub fn managed_policy_arn(name: &str) -> Resolvable<String> {
    stratus_template::Intrinsic::sub(format!("arn:${{AWS::Partition}}:iam::aws:policy/{name}")).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_template::Resource;

    #[test]
    fn test_role() {
        let role = Role {
            assume_role_policy_document: service_trust_policy("lambda.amazonaws.com"),
            managed_policy_arns: Some(vec![managed_policy_arn(
                "service-role/AWSLambdaBasicExecutionRole",
            )]),
            ..Default::default()
        };

        let mapping = role.declare().serialize().unwrap();

        assert_eq!(
            mapping["AssumeRolePolicyDocument"]["Statement"][0]["Principal"],
            json!({ "Service": "lambda.amazonaws.com" })
        );

        assert_eq!(
            mapping["ManagedPolicyArns"],
            json!([{
                "Fn::Sub": "arn:${AWS::Partition}:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole"
            }])
        );
    }
}
