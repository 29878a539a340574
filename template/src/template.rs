use crate::declaration::ResourceDeclaration;
use crate::error::{RenderError, ValidationError};
use crate::logical_id::validate_logical_id;
use crate::mapper::render_untyped;
use crate::properties::Resource;
use crate::value::PropertyValue;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FORMAT_VERSION: &str = "2010-09-09";

/// `${Name}` and `${Name.Attribute}` placeholders of Fn::Sub, `${!Literal}` is escaped
static SUB_VARIABLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z0-9:]+)(\.[A-Za-z0-9.]+)?\}").expect("Failed to init regexp")
});

/// An input value supplied when the stack is deployed, referenced with `Ref`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Parameter {
    #[serde(rename = "Type")]
    parameter_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    allowed_values: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    allowed_pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_value: Option<f64>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    no_echo: bool,
}

impl Parameter {
    /// A parameter of a CloudFormation parameter type, e.g. `String` or `AWS::EC2::VPC::Id`
    pub fn new(parameter_type: impl Into<String>) -> Self {
        Parameter {
            parameter_type: parameter_type.into(),
            description: None,
            default: None,
            allowed_values: vec![],
            allowed_pattern: None,
            min_length: None,
            max_length: None,
            min_value: None,
            max_value: None,
            no_echo: false,
        }
    }

    pub fn string() -> Self {
        Parameter::new("String")
    }

    pub fn number() -> Self {
        Parameter::new("Number")
    }

    pub fn parameter_type(&self) -> &str {
        &self.parameter_type
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn allowed_values<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn allowed_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.allowed_pattern = Some(pattern.into());
        self
    }

    pub fn min_length(mut self, length: u32) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: u32) -> Self {
        self.max_length = Some(length);
        self
    }

    pub fn min_value(mut self, value: f64) -> Self {
        self.min_value = Some(value);
        self
    }

    pub fn max_value(mut self, value: f64) -> Self {
        self.max_value = Some(value);
        self
    }

    /// Mask the value in the console and API responses
    pub fn no_echo(mut self) -> Self {
        self.no_echo = true;
        self
    }

    /// The default has to be one of the allowed values when both are set
    fn check(&self, name: &str) -> Result<(), ValidationError> {
        match &self.default {
            Some(default)
                if !self.allowed_values.is_empty() && !self.allowed_values.contains(default) =>
            {
                Err(ValidationError::Malformed {
                    path: format!("Parameters.{name}.Default"),
                    reason: format!("{default} is not one of the allowed values"),
                })
            }
            _ => Ok(()),
        }
    }
}

/// A value exposed by the stack once it is deployed
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    value: PropertyValue,
    description: Option<String>,
    export_name: Option<String>,
}

impl Output {
    pub fn new(value: impl Into<PropertyValue>) -> Self {
        Output {
            value: value.into(),
            description: None,
            export_name: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Make the value importable by other stacks under this name
    pub fn export(mut self, name: impl Into<String>) -> Self {
        self.export_name = Some(name.into());
        self
    }

    fn render(&self, name: &str) -> Result<Value, ValidationError> {
        let mut entry = Map::new();

        if let Some(description) = &self.description {
            entry.insert("Description".into(), Value::String(description.clone()));
        }

        entry.insert("Value".into(), render_untyped(&self.value, name)?);

        if let Some(export_name) = &self.export_name {
            entry.insert(
                "Export".into(),
                serde_json::json!({ "Name": export_name }),
            );
        }

        Ok(Value::Object(entry))
    }
}

/// A set of resource declarations keyed by logical ID
#[derive(Debug, Clone, Default)]
pub struct Template {
    description: Option<String>,
    parameters: Vec<(String, Parameter)>,
    resources: Vec<(String, ResourceDeclaration)>,
    outputs: Vec<(String, Output)>,
}

impl Template {
    pub fn new() -> Self {
        Template::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Declare a typed resource under a logical ID
    pub fn add<R: Resource>(
        &mut self,
        logical_id: &str,
        resource: &R,
    ) -> Result<&mut Self, ValidationError> {
        self.add_declaration(logical_id, resource.declare())
    }

    pub fn add_declaration(
        &mut self,
        logical_id: &str,
        declaration: ResourceDeclaration,
    ) -> Result<&mut Self, ValidationError> {
        validate_logical_id(logical_id)?;

        if self.resource(logical_id).is_some() || self.parameter_named(logical_id).is_some() {
            return Err(ValidationError::DuplicateLogicalId(logical_id.to_string()));
        }

        log::debug!(
            "Declared {logical_id} of type {}",
            declaration.resource_type()
        );

        self.resources.push((logical_id.to_string(), declaration));
        Ok(self)
    }

    /// Declare a deploy time input, parameters share the logical ID space with resources
    pub fn parameter(
        &mut self,
        name: &str,
        parameter: Parameter,
    ) -> Result<&mut Self, ValidationError> {
        validate_logical_id(name)?;

        if self.resource(name).is_some() || self.parameter_named(name).is_some() {
            return Err(ValidationError::DuplicateLogicalId(name.to_string()));
        }

        parameter.check(name)?;
        log::debug!("Declared parameter {name} of type {}", parameter.parameter_type);

        self.parameters.push((name.to_string(), parameter));
        Ok(self)
    }

    pub fn output(&mut self, name: &str, output: Output) -> Result<&mut Self, ValidationError> {
        validate_logical_id(name)?;

        if self.outputs.iter().any(|(existing, _)| existing == name) {
            return Err(ValidationError::DuplicateLogicalId(name.to_string()));
        }

        self.outputs.push((name.to_string(), output));
        Ok(self)
    }

    pub fn resource(&self, logical_id: &str) -> Option<&ResourceDeclaration> {
        self.resources
            .iter()
            .find(|(id, _)| id == logical_id)
            .map(|(_, decl)| decl)
    }

    /// Resources in declaration order
    pub fn resources(&self) -> impl Iterator<Item = (&str, &ResourceDeclaration)> {
        self.resources.iter().map(|(id, decl)| (id.as_str(), decl))
    }

    pub fn parameter_named(&self, name: &str) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, parameter)| parameter)
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.parameters
            .iter()
            .map(|(name, parameter)| (name.as_str(), parameter))
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&str, &Output)> {
        self.outputs.iter().map(|(name, output)| (name.as_str(), output))
    }

    /// Whether a reference target is declared, pseudo parameters always are
    ///
    /// Attributes are only read from resources, parameters are referenced as a whole.
    fn is_defined(&self, target: &str, attribute: bool) -> bool {
        (!attribute && target.starts_with("AWS::"))
            || self.resource(target).is_some()
            || (!attribute && self.parameter_named(target).is_some())
    }

    /// Validate every resource and produce the template document
    ///
    /// Resources and outputs keep their declaration order.
    pub fn render(&self) -> Result<Value, ValidationError> {
        let mut resources = Map::new();

        for (logical_id, decl) in self.resources.iter() {
            let entry = decl
                .render()
                .map_err(|error| error.in_resource(logical_id))?;

            if let Some(target) = decl.dependencies().iter().find(|t| self.resource(t).is_none()) {
                return Err(ValidationError::UnknownDependency {
                    resource: logical_id.clone(),
                    target: target.clone(),
                });
            }

            self.check_references(logical_id, &entry)?;
            resources.insert(logical_id.clone(), entry);
        }

        let mut template = Map::new();

        template.insert(
            "AWSTemplateFormatVersion".into(),
            Value::String(FORMAT_VERSION.into()),
        );

        if let Some(description) = &self.description {
            template.insert("Description".into(), Value::String(description.clone()));
        }

        if !self.parameters.is_empty() {
            let mut parameters = Map::new();

            for (name, parameter) in self.parameters.iter() {
                let entry = serde_json::to_value(parameter).map_err(|error| {
                    ValidationError::Malformed {
                        path: format!("Parameters.{name}"),
                        reason: error.to_string(),
                    }
                })?;

                parameters.insert(name.clone(), entry);
            }

            template.insert("Parameters".into(), Value::Object(parameters));
        }

        template.insert("Resources".into(), Value::Object(resources));

        if !self.outputs.is_empty() {
            let mut outputs = Map::new();

            for (name, output) in self.outputs.iter() {
                let entry = output.render(name)?;
                self.check_references(name, &entry)?;
                outputs.insert(name.clone(), entry);
            }

            template.insert("Outputs".into(), Value::Object(outputs));
        }

        log::info!(
            "Rendered template with {} parameters, {} resources and {} outputs",
            self.parameters.len(),
            self.resources.len(),
            self.outputs.len()
        );

        Ok(Value::Object(template))
    }

    pub fn to_json(&self) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(&self.render()?)?)
    }

    pub fn to_yaml(&self) -> Result<String, RenderError> {
        serde_saphyr::to_string(&self.render()?).map_err(|e| RenderError::Yaml(e.to_string()))
    }

    fn check_references(&self, name: &str, entry: &Value) -> Result<(), ValidationError> {
        let mut targets = vec![];
        collect_references(entry, &mut targets);

        match targets
            .into_iter()
            .find(|(target, attribute)| !self.is_defined(target, *attribute))
        {
            Some((target, _)) => Err(ValidationError::UnknownReference {
                resource: name.to_string(),
                target,
            }),
            None => Ok(()),
        }
    }
}

/// Logical IDs a rendered value points at through Ref, Fn::GetAtt and Fn::Sub,
/// flagged when an attribute of the target is read
fn collect_references(value: &Value, targets: &mut Vec<(String, bool)>) {
    match value {
        Value::Object(object) => {
            if object.len() == 1 {
                match object.iter().next() {
                    Some((key, Value::String(target))) if key == "Ref" => {
                        targets.push((target.clone(), false));
                    }
                    Some((key, Value::Array(args))) if key == "Fn::GetAtt" => {
                        if let Some(Value::String(target)) = args.first() {
                            targets.push((target.clone(), true));
                        }
                    }
                    Some((key, Value::String(template))) if key == "Fn::Sub" => {
                        targets.extend(
                            SUB_VARIABLE_REGEX
                                .captures_iter(template)
                                .map(|captures| (captures[1].to_string(), captures.get(2).is_some())),
                        );
                    }
                    _ => {}
                }
            }

            object
                .values()
                .for_each(|value| collect_references(value, targets));
        }
        Value::Array(values) => values
            .iter()
            .for_each(|value| collect_references(value, targets)),
        _ => {}
    }
}
