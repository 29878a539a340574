use crate::tag::Tag;
use stratus_template::{Properties, Resolvable};

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::Logs::LogGroup")]
pub struct LogGroup {
    pub log_group_name: Option<String>,
    /// One of the periods accepted by CloudWatch Logs, e.g. 1, 7, 30 or 365
    pub retention_in_days: Option<i64>,
    pub kms_key_id: Option<Resolvable<String>>,
    pub tags: Option<Vec<Tag>>,
}
