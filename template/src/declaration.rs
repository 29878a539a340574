use crate::error::ValidationError;
use crate::mapper;
use crate::value::{PropertySet, PropertyValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;

/// CloudFormation resource type name, e.g. `AWS::B2BI::Capability`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceType(&'static str);

impl ResourceType {
    pub const fn new(name: &'static str) -> Self {
        ResourceType(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }

    /// Service segment of the name, e.g. `B2BI`
    pub fn service(&self) -> &'static str {
        self.0.split("::").nth(1).unwrap_or_default()
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happens to the physical resource when it leaves the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeletionPolicy {
    Delete,
    Retain,
    RetainExceptOnCreate,
    Snapshot,
}

impl Display for DeletionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            DeletionPolicy::Delete => "Delete",
            DeletionPolicy::Retain => "Retain",
            DeletionPolicy::RetainExceptOnCreate => "RetainExceptOnCreate",
            DeletionPolicy::Snapshot => "Snapshot",
        };

        write!(f, "{}", str)
    }
}

/// A resource type bound to concrete property values
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDeclaration {
    resource_type: ResourceType,
    properties: PropertySet,
    depends_on: Vec<String>,
    deletion_policy: Option<DeletionPolicy>,
    update_replace_policy: Option<DeletionPolicy>,
}

impl ResourceDeclaration {
    pub fn new(resource_type: ResourceType, properties: PropertySet) -> Self {
        ResourceDeclaration {
            resource_type,
            properties,
            depends_on: vec![],
            deletion_policy: None,
            update_replace_policy: None,
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    /// Bind a property by its wire name
    pub fn set(
        &mut self,
        wire_name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<&mut Self, ValidationError> {
        self.properties.set(wire_name, value)?;
        Ok(self)
    }

    /// Create this resource only after another one
    pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
        let logical_id = logical_id.into();

        if !self.depends_on.contains(&logical_id) {
            self.depends_on.push(logical_id);
        }

        self
    }

    pub fn deletion_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = Some(policy);
        self
    }

    pub fn update_replace_policy(mut self, policy: DeletionPolicy) -> Self {
        self.update_replace_policy = Some(policy);
        self
    }

    /// Delete the resource both on stack deletion and on replacement
    pub fn destroy_on_removal(self) -> Self {
        self.deletion_policy(DeletionPolicy::Delete)
            .update_replace_policy(DeletionPolicy::Delete)
    }

    pub fn dependencies(&self) -> &[String] {
        &self.depends_on
    }

    /// Properties mapped to wire names
    pub fn serialize(&self) -> Result<Map<String, Value>, ValidationError> {
        mapper::serialize(self)
    }

    /// Full template entry: type, properties and resource attributes
    pub fn render(&self) -> Result<Value, ValidationError> {
        let mut entry = Map::new();
        entry.insert("Type".into(), Value::String(self.resource_type.name().into()));

        let properties = self.serialize()?;

        if !properties.is_empty() {
            entry.insert("Properties".into(), Value::Object(properties));
        }

        match self.depends_on.as_slice() {
            [] => {}
            [single] => {
                entry.insert("DependsOn".into(), Value::String(single.clone()));
            }
            many => {
                entry.insert(
                    "DependsOn".into(),
                    Value::Array(many.iter().cloned().map(Value::String).collect()),
                );
            }
        }

        if let Some(policy) = self.deletion_policy {
            entry.insert("DeletionPolicy".into(), Value::String(policy.to_string()));
        }

        if let Some(policy) = self.update_replace_policy {
            entry.insert(
                "UpdateReplacePolicy".into(),
                Value::String(policy.to_string()),
            );
        }

        Ok(Value::Object(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{PrimitiveKind, PropertySpec, ValueKind};
    use serde_json::json;

    const LOG_GROUP: ResourceType = ResourceType::new("AWS::Logs::LogGroup");

    fn specs() -> Vec<PropertySpec> {
        vec![PropertySpec::new(
            "retention_in_days",
            "RetentionInDays",
            false,
            ValueKind::Primitive(PrimitiveKind::Integer),
        )]
    }

    #[test]
    fn test_resource_type() {
        assert_eq!(LOG_GROUP.service(), "Logs");
        assert_eq!(LOG_GROUP.to_string(), "AWS::Logs::LogGroup");
    }

    #[test]
    fn test_render_without_properties() {
        let decl = ResourceDeclaration::new(LOG_GROUP, PropertySet::new(specs()));
        assert_eq!(decl.render().unwrap(), json!({ "Type": "AWS::Logs::LogGroup" }));
    }

    #[test]
    fn test_render_attributes() {
        let mut decl = ResourceDeclaration::new(LOG_GROUP, PropertySet::new(specs()))
            .depends_on("Cluster")
            .depends_on("Cluster")
            .destroy_on_removal();

        decl.set("RetentionInDays", 5i64).unwrap();

        assert_eq!(
            decl.render().unwrap(),
            json!({
                "Type": "AWS::Logs::LogGroup",
                "Properties": { "RetentionInDays": 5 },
                "DependsOn": "Cluster",
                "DeletionPolicy": "Delete",
                "UpdateReplacePolicy": "Delete"
            })
        );

        let decl = decl.depends_on("Secret");
        assert_eq!(decl.render().unwrap()["DependsOn"], json!(["Cluster", "Secret"]));
    }
}
