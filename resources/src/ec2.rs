use crate::tag::Tag;
use stratus_template::{Properties, Resolvable};

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::EC2::VPC")]
pub struct Vpc {
    pub cidr_block: Option<String>,
    pub enable_dns_hostnames: Option<bool>,
    pub enable_dns_support: Option<bool>,
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::EC2::Subnet")]
pub struct Subnet {
    pub vpc_id: Resolvable<String>,
    pub cidr_block: Option<String>,
    pub availability_zone: Option<Resolvable<String>>,
    pub map_public_ip_on_launch: Option<bool>,
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::EC2::SecurityGroup")]
pub struct SecurityGroup {
    pub group_description: String,
    pub vpc_id: Option<Resolvable<String>>,
    pub security_group_ingress: Option<Vec<Ingress>>,
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct Ingress {
    /// `tcp`, `udp`, `icmp` or `-1` for all
    pub ip_protocol: String,
    pub from_port: Option<i64>,
    pub to_port: Option<i64>,
    pub cidr_ip: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use stratus_template::{Intrinsic, Resource};

    #[test]
    fn test_subnet() {
        let subnet = Subnet {
            vpc_id: Intrinsic::reference("Vpc").into(),
            cidr_block: Some("10.0.0.0/24".into()),
            ..Default::default()
        };

        assert_eq!(
            Value::Object(subnet.declare().serialize().unwrap()),
            json!({ "VpcId": { "Ref": "Vpc" }, "CidrBlock": "10.0.0.0/24" })
        );
    }
}
