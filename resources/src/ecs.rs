//! Elastic Container Service clusters, task definitions and services.

use crate::tag::Tag;
use std::collections::BTreeMap;
use stratus_template::{Properties, Resolvable};

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::ECS::Cluster")]
pub struct Cluster {
    pub cluster_name: Option<String>,
    pub cluster_settings: Option<Vec<ClusterSettings>>,
    pub tags: Option<Vec<Tag>>,
}

/// Cluster setting, e.g. `containerInsights` set to `enabled`
#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct ClusterSettings {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::ECS::TaskDefinition")]
pub struct TaskDefinition {
    pub family: Option<String>,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    /// `awsvpc` for Fargate tasks
    pub network_mode: Option<String>,
    pub requires_compatibilities: Option<Vec<String>>,
    pub execution_role_arn: Option<Resolvable<String>>,
    pub task_role_arn: Option<Resolvable<String>>,
    pub container_definitions: Option<Vec<ContainerDefinition>>,
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct ContainerDefinition {
    pub name: String,
    pub image: Resolvable<String>,
    pub essential: Option<bool>,
    pub cpu: Option<i64>,
    pub memory: Option<i64>,
    pub command: Option<Vec<String>>,
    pub port_mappings: Option<Vec<PortMapping>>,
    pub environment: Option<Vec<KeyValuePair>>,
    pub secrets: Option<Vec<Secret>>,
    pub log_configuration: Option<LogConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct PortMapping {
    pub container_port: Option<i64>,
    pub host_port: Option<i64>,
    pub protocol: Option<String>,
}

/// Plain environment variable of a container
#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct KeyValuePair {
    pub name: Option<String>,
    pub value: Option<Resolvable<String>>,
}

/// Environment variable read from Secrets Manager or Parameter Store
#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct Secret {
    pub name: String,
    /// Secret ARN, optionally suffixed with `:json-key::` to pick a single key
    pub value_from: Resolvable<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct LogConfiguration {
    /// `awslogs`, `awsfirelens`, `splunk`, ...
    pub log_driver: String,
    /// Driver options, e.g. `awslogs-group`
    pub options: Option<BTreeMap<String, Resolvable<String>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::ECS::Service")]
pub struct Service {
    pub cluster: Option<Resolvable<String>>,
    pub service_name: Option<String>,
    pub task_definition: Option<Resolvable<String>>,
    pub desired_count: Option<i64>,
    /// `FARGATE` or `EC2`
    pub launch_type: Option<String>,
    pub network_configuration: Option<NetworkConfiguration>,
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct NetworkConfiguration {
    pub awsvpc_configuration: Option<AwsVpcConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct AwsVpcConfiguration {
    pub subnets: Vec<Resolvable<String>>,
    pub security_groups: Option<Vec<Resolvable<String>>>,
    /// `ENABLED` or `DISABLED`
    pub assign_public_ip: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stratus_template::{Intrinsic, Resource, ValidationError};

    #[test]
    fn test_container_secrets() {
        let task = TaskDefinition {
            container_definitions: Some(vec![ContainerDefinition {
                name: "app".into(),
                image: "nginx:latest".into(),
                secrets: Some(vec![Secret {
                    name: "DB_PASSWORD".into(),
                    value_from: Intrinsic::join(
                        "",
                        vec![Intrinsic::reference("DbSecret").into(), ":password::".into()],
                    )
                    .into(),
                }]),
                ..Default::default()
            }]),
            ..Default::default()
        };

        let mapping = task.declare().serialize().unwrap();

        assert_eq!(
            mapping["ContainerDefinitions"][0]["Secrets"],
            json!([{
                "Name": "DB_PASSWORD",
                "ValueFrom": { "Fn::Join": ["", [{ "Ref": "DbSecret" }, ":password::"]] }
            }])
        );
    }

    #[test]
    fn test_network_configuration() {
        let service = Service {
            network_configuration: Some(NetworkConfiguration {
                awsvpc_configuration: Some(AwsVpcConfiguration {
                    subnets: vec![Intrinsic::reference("SubnetA").into(), "subnet-0b".into()],
                    assign_public_ip: Some("ENABLED".into()),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        };

        assert_eq!(
            service.declare().serialize().unwrap()["NetworkConfiguration"],
            json!({
                "AwsvpcConfiguration": {
                    "Subnets": [{ "Ref": "SubnetA" }, "subnet-0b"],
                    "AssignPublicIp": "ENABLED"
                }
            })
        );
    }

    #[test]
    fn test_container_name_is_required() {
        let mut decl = TaskDefinition {
            container_definitions: Some(vec![ContainerDefinition::default()]),
            ..Default::default()
        }
        .declare();

        assert!(decl.serialize().is_ok());

        let container = ContainerDefinition::default();
        let mut properties = container.properties();
        properties.unset("Name").unwrap();

        decl.set("ContainerDefinitions", vec![properties]).unwrap();

        assert_eq!(
            decl.serialize().unwrap_err(),
            ValidationError::MissingProperty {
                path: "ContainerDefinitions[0].Name".into()
            }
        );
    }
}
