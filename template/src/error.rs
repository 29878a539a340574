/// A declaration that can not be turned into a template
///
/// Property paths are dotted wire names, with list positions in brackets,
/// e.g. `Configuration.Edi.InputLocation.BucketName` or `Targets[1].Arn`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required property `{path}`")]
    MissingProperty { path: String },

    #[error("Property `{path}` expects {expected}, got {found}")]
    ShapeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Unknown property `{path}`")]
    UnknownProperty { path: String },

    #[error("Property `{path}` holds a number which can not be represented in JSON")]
    InvalidNumber { path: String },

    #[error("Invalid intrinsic function at `{path}`: {reason}")]
    InvalidIntrinsic { path: String, reason: String },

    #[error("Unknown resource type `{0}`")]
    UnknownResourceType(String),

    #[error("Invalid logical ID `{id}`: {reason}")]
    InvalidLogicalId { id: String, reason: String },

    #[error("Duplicate logical ID `{0}`")]
    DuplicateLogicalId(String),

    #[error("`{resource}` depends on `{target}`, which is not defined in the template")]
    UnknownDependency { resource: String, target: String },

    #[error("`{resource}` references `{target}`, which is not defined in the template")]
    UnknownReference { resource: String, target: String },

    #[error("Malformed stack document at `{path}`: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Resource `{logical_id}`: {source}")]
    Resource {
        logical_id: String,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Attach the logical ID of the resource the error occurred in
    pub(crate) fn in_resource(self, logical_id: &str) -> Self {
        ValidationError::Resource {
            logical_id: logical_id.to_string(),
            source: Box::new(self),
        }
    }

    /// Property path the error points at, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            ValidationError::MissingProperty { path }
            | ValidationError::ShapeMismatch { path, .. }
            | ValidationError::UnknownProperty { path }
            | ValidationError::InvalidNumber { path }
            | ValidationError::InvalidIntrinsic { path, .. }
            | ValidationError::Malformed { path, .. } => Some(path),
            ValidationError::Resource { source, .. } => source.path(),
            _ => None,
        }
    }
}

/// Failure to produce template text
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to serialize template as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize template as YAML: {0}")]
    Yaml(String),
}

/// Path of a nested property
pub(crate) fn child_path(parent: &str, wire_name: &str) -> String {
    if parent.is_empty() {
        wire_name.to_string()
    } else {
        format!("{parent}.{wire_name}")
    }
}

/// Path of a list element
pub(crate) fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(child_path("", "Name"), "Name");
        assert_eq!(child_path("Configuration", "Edi"), "Configuration.Edi");
        assert_eq!(index_path("Targets", 1), "Targets[1]");
    }

    #[test]
    fn test_resource_error_keeps_path() {
        let error = ValidationError::MissingProperty {
            path: "Name".into(),
        }
        .in_resource("Profile");

        assert_eq!(error.path(), Some("Name"));
        assert_eq!(
            error.to_string(),
            "Resource `Profile`: Missing required property `Name`"
        );
    }
}
