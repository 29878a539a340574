use serde_json::json;
use std::collections::BTreeMap;
use stratus_resources::{ec2, ecs, iam, logs, secretsmanager, Tag};
use stratus_template::{pseudo, Intrinsic, Output, Resource, Template, ValidationError};

pub(super) const NAME: &str = "fargate-secret";
pub(super) const DESCRIPTION: &str = "Fargate service reading a generated Secrets Manager secret";

const LOG_GROUP_NAME: &str = "/ecs/fargate-secret";

pub(super) fn template() -> Result<Template, ValidationError> {
    let mut template = Template::new().description(DESCRIPTION);

    template
        .add(
            "Vpc",
            &ec2::Vpc {
                cidr_block: Some("10.0.0.0/16".into()),
                enable_dns_hostnames: Some(true),
                enable_dns_support: Some(true),
                tags: Some(vec![Tag::new("Name", NAME)]),
            },
        )?
        .add(
            "PublicSubnet",
            &ec2::Subnet {
                vpc_id: Intrinsic::reference("Vpc").into(),
                cidr_block: Some("10.0.0.0/24".into()),
                map_public_ip_on_launch: Some(true),
                ..Default::default()
            },
        )?
        .add(
            "ServiceSecurityGroup",
            &ec2::SecurityGroup {
                group_description: "Fargate service".into(),
                vpc_id: Some(Intrinsic::reference("Vpc").into()),
                security_group_ingress: Some(vec![ec2::Ingress {
                    ip_protocol: "tcp".into(),
                    from_port: Some(80),
                    to_port: Some(80),
                    cidr_ip: Some("0.0.0.0/0".into()),
                }]),
                ..Default::default()
            },
        )?
        .add_declaration(
            "ServiceLogs",
            logs::LogGroup {
                log_group_name: Some(LOG_GROUP_NAME.into()),
                retention_in_days: Some(7),
                ..Default::default()
            }
            .declare()
            .destroy_on_removal(),
        )?
        .add(
            "AppSecret",
            &secretsmanager::Secret {
                description: Some("Credentials read by the Fargate task".into()),
                generate_secret_string: Some(secretsmanager::GenerateSecretString {
                    secret_string_template: Some(json!({ "username": "app" }).to_string()),
                    generate_string_key: Some("password".into()),
                    password_length: Some(32),
                    exclude_punctuation: Some(true),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )?
        .add(
            "ExecutionRole",
            &iam::Role {
                assume_role_policy_document: iam::service_trust_policy("ecs-tasks.amazonaws.com"),
                managed_policy_arns: Some(vec![iam::managed_policy_arn(
                    "service-role/AmazonECSTaskExecutionRolePolicy",
                )]),
                policies: Some(vec![iam::Policy {
                    policy_name: "read-app-secret".into(),
                    policy_document: json!({
                        "Version": "2012-10-17",
                        "Statement": [{
                            "Effect": "Allow",
                            "Action": "secretsmanager:GetSecretValue",
                            "Resource": { "Ref": "AppSecret" }
                        }]
                    }),
                }]),
                ..Default::default()
            },
        )?
        .add(
            "Cluster",
            &ecs::Cluster {
                cluster_settings: Some(vec![ecs::ClusterSettings {
                    name: "containerInsights".into(),
                    value: "enabled".into(),
                }]),
                ..Default::default()
            },
        )?
        .add(
            "TaskDefinition",
            &ecs::TaskDefinition {
                family: Some(NAME.into()),
                cpu: Some("256".into()),
                memory: Some("512".into()),
                network_mode: Some("awsvpc".into()),
                requires_compatibilities: Some(vec!["FARGATE".into()]),
                execution_role_arn: Some(Intrinsic::get_att("ExecutionRole", "Arn").into()),
                container_definitions: Some(vec![container()]),
                ..Default::default()
            },
        )?
        .add_declaration(
            "Service",
            ecs::Service {
                cluster: Some(Intrinsic::reference("Cluster").into()),
                task_definition: Some(Intrinsic::reference("TaskDefinition").into()),
                desired_count: Some(1),
                launch_type: Some("FARGATE".into()),
                network_configuration: Some(ecs::NetworkConfiguration {
                    awsvpc_configuration: Some(ecs::AwsVpcConfiguration {
                        subnets: vec![Intrinsic::reference("PublicSubnet").into()],
                        security_groups: Some(vec![Intrinsic::get_att(
                            "ServiceSecurityGroup",
                            "GroupId",
                        )
                        .into()]),
                        assign_public_ip: Some("ENABLED".into()),
                    }),
                }),
                ..Default::default()
            }
            .declare()
            .depends_on("ServiceLogs"),
        )?
        .output(
            "ClusterName",
            Output::new(Intrinsic::reference("Cluster")).description("ECS cluster running the service"),
        )?;

    Ok(template)
}

fn container() -> ecs::ContainerDefinition {
    ecs::ContainerDefinition {
        name: "app".into(),
        image: "public.ecr.aws/nginx/nginx:latest".into(),
        essential: Some(true),
        port_mappings: Some(vec![ecs::PortMapping {
            container_port: Some(80),
            protocol: Some("tcp".into()),
            ..Default::default()
        }]),
        secrets: Some(vec![
            ecs::Secret {
                name: "APP_USERNAME".into(),
                value_from: secret_key("username"),
            },
            ecs::Secret {
                name: "APP_PASSWORD".into(),
                value_from: secret_key("password"),
            },
        ]),
        log_configuration: Some(ecs::LogConfiguration {
            log_driver: "awslogs".into(),
            options: Some(BTreeMap::from([
                ("awslogs-group".to_string(), LOG_GROUP_NAME.into()),
                (
                    "awslogs-region".to_string(),
                    Intrinsic::reference(pseudo::REGION).into(),
                ),
                ("awslogs-stream-prefix".to_string(), "app".into()),
            ])),
        }),
        ..Default::default()
    }
}

/// Single JSON key of the generated secret
fn secret_key(key: &str) -> stratus_template::Resolvable<String> {
    Intrinsic::join(
        "",
        vec![
            Intrinsic::reference("AppSecret").into(),
            format!(":{key}::").into(),
        ],
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_reads_secret_keys() {
        let rendered = template().unwrap().render().unwrap();
        let task = &rendered["Resources"]["TaskDefinition"]["Properties"];

        assert_eq!(
            task["ContainerDefinitions"][0]["Secrets"][1],
            json!({
                "Name": "APP_PASSWORD",
                "ValueFrom": { "Fn::Join": ["", [{ "Ref": "AppSecret" }, ":password::"]] }
            })
        );

        assert_eq!(
            task["ExecutionRoleArn"],
            json!({ "Fn::GetAtt": ["ExecutionRole", "Arn"] })
        );
    }

    #[test]
    fn test_log_group_is_deleted_with_stack() {
        let rendered = template().unwrap().render().unwrap();
        let logs = &rendered["Resources"]["ServiceLogs"];

        assert_eq!(logs["DeletionPolicy"], "Delete");
        assert_eq!(logs["UpdateReplacePolicy"], "Delete");
        assert_eq!(rendered["Resources"]["Service"]["DependsOn"], "ServiceLogs");
    }
}
