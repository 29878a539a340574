use crate::binder;
use crate::declaration::{ResourceDeclaration, ResourceType};
use crate::error::ValidationError;
use crate::properties::Resource;
use crate::spec::PropertySpec;
use serde_json::Value;
use std::collections::BTreeMap;

/// Property table of a resource type, resolved by name at run time
#[derive(Debug, Clone, Copy)]
pub struct ResourceSchema {
    resource_type: ResourceType,
    specs: fn() -> Vec<PropertySpec>,
}

impl ResourceSchema {
    pub const fn new(resource_type: ResourceType, specs: fn() -> Vec<PropertySpec>) -> Self {
        ResourceSchema {
            resource_type,
            specs,
        }
    }

    pub fn of<R: Resource>() -> Self {
        ResourceSchema::new(R::RESOURCE_TYPE, R::specs)
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn specs(&self) -> Vec<PropertySpec> {
        (self.specs)()
    }

    /// Bind raw wire-named properties to this resource type
    pub fn bind(&self, raw: &Value) -> Result<ResourceDeclaration, ValidationError> {
        binder::bind(self, raw)
    }
}

/// Resource types known to the tool, keyed by type name
#[derive(Debug, Clone, Default)]
pub struct Registry {
    schemas: BTreeMap<&'static str, ResourceSchema>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Register a resource type, replacing an earlier registration of the same name
    pub fn register(&mut self, schema: ResourceSchema) -> &mut Self {
        log::trace!("Registering {}", schema.resource_type());
        self.schemas.insert(schema.resource_type().name(), schema);
        self
    }

    pub fn with<R: Resource>(mut self) -> Self {
        self.register(ResourceSchema::of::<R>());
        self
    }

    pub fn get(&self, type_name: &str) -> Result<&ResourceSchema, ValidationError> {
        self.schemas
            .get(type_name)
            .ok_or_else(|| ValidationError::UnknownResourceType(type_name.to_string()))
    }

    /// Schemas in type name order
    pub fn iter(&self) -> impl Iterator<Item = &ResourceSchema> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
