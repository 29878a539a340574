use crate::binder::expect_object;
use crate::declaration::DeletionPolicy;
use crate::error::{child_path, ValidationError};
use crate::registry::Registry;
use crate::template::{Output, Parameter, Template};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Resource entry of a stack document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct ResourceEntry {
    #[serde(rename = "Type")]
    resource_type: String,

    #[serde(default)]
    properties: Value,

    #[serde(default)]
    depends_on: Option<DependsOn>,

    #[serde(default)]
    deletion_policy: Option<DeletionPolicy>,

    #[serde(default)]
    update_replace_policy: Option<DeletionPolicy>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum DependsOn {
    One(String),
    Many(Vec<String>),
}

impl DependsOn {
    fn into_vec(self) -> Vec<String> {
        match self {
            DependsOn::One(target) => vec![target],
            DependsOn::Many(targets) => targets,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct OutputEntry {
    value: Value,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    export: Option<ExportEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct ExportEntry {
    name: String,
}

const SECTIONS: [&str; 4] = ["Description", "Parameters", "Resources", "Outputs"];

/// A stack declared in a YAML or JSON file instead of Rust code
///
/// Shaped like the template it renders to, minus the format version.
#[derive(Debug, Clone, PartialEq)]
pub struct StackDocument {
    description: Option<String>,
    parameters: Map<String, Value>,
    resources: Map<String, Value>,
    outputs: Map<String, Value>,
}

impl StackDocument {
    /// Check the top level layout of a parsed document
    pub fn from_value(raw: Value) -> Result<Self, ValidationError> {
        let object = expect_object(&raw, "")?;

        if let Some(key) = object
            .keys()
            .find(|key| !SECTIONS.contains(&key.as_str()))
        {
            return Err(ValidationError::Malformed {
                path: key.clone(),
                reason: "unknown section".into(),
            });
        }

        let description = match object.get("Description") {
            None => None,
            Some(Value::String(description)) => Some(description.clone()),
            Some(_) => {
                return Err(ValidationError::Malformed {
                    path: "Description".into(),
                    reason: "expected a string".into(),
                })
            }
        };

        let parameters = match object.get("Parameters") {
            Some(parameters) => expect_object(parameters, "Parameters")?.clone(),
            None => Map::new(),
        };

        let resources = match object.get("Resources") {
            Some(resources) => expect_object(resources, "Resources")?.clone(),
            None => {
                return Err(ValidationError::Malformed {
                    path: "Resources".into(),
                    reason: "section is required".into(),
                })
            }
        };

        let outputs = match object.get("Outputs") {
            Some(outputs) => expect_object(outputs, "Outputs")?.clone(),
            None => Map::new(),
        };

        Ok(StackDocument {
            description,
            parameters,
            resources,
            outputs,
        })
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Logical IDs in document order
    pub fn logical_ids(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Bind every resource against the registry and assemble a template
    pub fn into_template(self, registry: &Registry) -> Result<Template, ValidationError> {
        let mut template = Template::new();

        if let Some(description) = self.description {
            template.set_description(description);
        }

        for (name, raw) in self.parameters {
            let parameter: Parameter = parse_entry(raw, &child_path("Parameters", &name))?;
            template.parameter(&name, parameter)?;
        }

        for (logical_id, raw) in self.resources {
            let path = child_path("Resources", &logical_id);
            let entry: ResourceEntry = parse_entry(raw, &path)?;

            let mut decl = registry
                .get(&entry.resource_type)
                .and_then(|schema| schema.bind(&entry.properties))
                .map_err(|error| error.in_resource(&logical_id))?;

            for target in entry.depends_on.map(DependsOn::into_vec).unwrap_or_default() {
                decl = decl.depends_on(target);
            }

            if let Some(policy) = entry.deletion_policy {
                decl = decl.deletion_policy(policy);
            }

            if let Some(policy) = entry.update_replace_policy {
                decl = decl.update_replace_policy(policy);
            }

            template.add_declaration(&logical_id, decl)?;
        }

        for (name, raw) in self.outputs {
            let path = child_path("Outputs", &name);
            let entry: OutputEntry = parse_entry(raw, &path)?;

            let mut output = Output::new(crate::binder::bind_untyped(
                &entry.value,
                &child_path(&path, "Value"),
            )?);

            if let Some(description) = entry.description {
                output = output.description(description);
            }

            if let Some(export) = entry.export {
                output = output.export(export.name);
            }

            template.output(&name, output)?;
        }

        log::debug!("Bound stack document with {} resources", template.resources().count());
        Ok(template)
    }
}

fn parse_entry<T: serde::de::DeserializeOwned>(raw: Value, path: &str) -> Result<T, ValidationError> {
    serde_json::from_value(raw).map_err(|error| ValidationError::Malformed {
        path: path.to_string(),
        reason: error.to_string(),
    })
}
