use crate::declaration::ResourceDeclaration;
use crate::error::{child_path, index_path, ValidationError};
use crate::spec::{StructSchema, ValueKind};
use crate::value::{PropertySet, PropertyValue};
use serde_json::{Map, Value};

/// Map the bound properties of a declaration to their wire names
///
/// Unbound optional properties are left out, nested structures and lists are
/// mapped recursively in declaration order. Fails on the first required property
/// without a value or a value of the wrong shape.
pub fn serialize(decl: &ResourceDeclaration) -> Result<Map<String, Value>, ValidationError> {
    log::trace!("Serializing {}", decl.resource_type());
    serialize_set(decl.properties(), "")
}

pub(crate) fn serialize_set(
    set: &PropertySet,
    path: &str,
) -> Result<Map<String, Value>, ValidationError> {
    let mut mapping = Map::new();

    for (spec, value) in set.iter() {
        let path = child_path(path, spec.wire_name);

        match value {
            Some(value) => {
                mapping.insert(
                    spec.wire_name.to_string(),
                    serialize_value(value, &spec.kind, &path)?,
                );
            }

            None if spec.required => return Err(ValidationError::MissingProperty { path }),
            None => {}
        }
    }

    Ok(mapping)
}

/// Check a nested set against the schema of the structure it is bound to
///
/// A set built for one structure can be bound to a property expecting another,
/// so the properties are checked against the schema rather than trusted.
fn serialize_struct(
    set: &PropertySet,
    schema: &StructSchema,
    path: &str,
) -> Result<Map<String, Value>, ValidationError> {
    let specs = schema.specs();

    for (spec, value) in set.iter() {
        let known = specs.iter().any(|s| s.wire_name == spec.wire_name);

        if value.is_some() && !known {
            return Err(ValidationError::UnknownProperty {
                path: child_path(path, spec.wire_name),
            });
        }
    }

    if let Some(missing) = specs
        .iter()
        .find(|s| s.required && set.get(s.wire_name).is_none())
    {
        return Err(ValidationError::MissingProperty {
            path: child_path(path, missing.wire_name),
        });
    }

    let mut mapping = Map::new();

    for spec in specs.iter() {
        if let Some(value) = set.get(spec.wire_name) {
            let path = child_path(path, spec.wire_name);

            mapping.insert(
                spec.wire_name.to_string(),
                serialize_value(value, &spec.kind, &path)?,
            );
        }
    }

    Ok(mapping)
}

fn serialize_value(
    value: &PropertyValue,
    kind: &ValueKind,
    path: &str,
) -> Result<Value, ValidationError> {
    let mismatch = || ValidationError::ShapeMismatch {
        path: path.to_string(),
        expected: kind.to_string(),
        found: value.describe().to_string(),
    };

    match (kind, value) {
        // Never emitted, whatever the kind
        (_, PropertyValue::Json(Value::Null)) => Err(mismatch()),

        (_, PropertyValue::Intrinsic(intrinsic)) => intrinsic.render(path),

        (ValueKind::Primitive(expected), PropertyValue::Primitive(primitive))
            if primitive.conforms_to(*expected) =>
        {
            primitive.render(path)
        }

        (ValueKind::Struct(schema), PropertyValue::Struct(set)) => {
            Ok(Value::Object(serialize_struct(set, schema, path)?))
        }

        (ValueKind::List(item), PropertyValue::List(values)) => values
            .iter()
            .enumerate()
            .map(|(i, value)| serialize_value(value, item, &index_path(path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),

        (ValueKind::Map(expected), PropertyValue::Map(entries)) => {
            let mut mapping = Map::new();

            for (key, entry) in entries {
                let path = child_path(path, key);

                let value = match entry {
                    PropertyValue::Primitive(primitive) if primitive.conforms_to(*expected) => {
                        primitive.render(&path)?
                    }
                    PropertyValue::Intrinsic(intrinsic) => intrinsic.render(&path)?,
                    entry => {
                        return Err(ValidationError::ShapeMismatch {
                            path,
                            expected: expected.to_string(),
                            found: entry.describe().to_string(),
                        })
                    }
                };

                mapping.insert(key.clone(), value);
            }

            Ok(Value::Object(mapping))
        }

        // A JSON document accepts whatever it is given
        (ValueKind::Json, value) => render_untyped(value, path),

        _ => Err(mismatch()),
    }
}

/// Render a value which has no spec to be checked against
///
/// Used for JSON documents, intrinsic function arguments and stack outputs.
pub(crate) fn render_untyped(value: &PropertyValue, path: &str) -> Result<Value, ValidationError> {
    match value {
        PropertyValue::Primitive(primitive) => primitive.render(path),
        PropertyValue::Struct(set) => serialize_set(set, path).map(Value::Object),
        PropertyValue::List(values) => values
            .iter()
            .enumerate()
            .map(|(i, value)| render_untyped(value, &index_path(path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        PropertyValue::Map(entries) => {
            let mut mapping = Map::new();

            for (key, entry) in entries {
                mapping.insert(key.clone(), render_untyped(entry, &child_path(path, key))?);
            }

            Ok(Value::Object(mapping))
        }
        PropertyValue::Json(json) => Ok(json.clone()),
        PropertyValue::Intrinsic(intrinsic) => intrinsic.render(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::ResourceType;
    use crate::intrinsic::Intrinsic;
    use crate::spec::{PrimitiveKind, PropertySpec};
    use crate::value::Primitive;
    use serde_json::json;
    use std::collections::BTreeMap;

    const BUCKET: ResourceType = ResourceType::new("AWS::Test::Bucket");

    fn string(name: &'static str, wire_name: &'static str, required: bool) -> PropertySpec {
        PropertySpec::new(
            name,
            wire_name,
            required,
            ValueKind::Primitive(PrimitiveKind::String),
        )
    }

    fn location_specs() -> Vec<PropertySpec> {
        vec![
            string("bucket_name", "BucketName", true),
            string("key", "Key", false),
        ]
    }

    fn location() -> StructSchema {
        StructSchema::new("S3Location", location_specs)
    }

    fn capability_specs() -> Vec<PropertySpec> {
        vec![
            string("name", "Name", true),
            PropertySpec::new(
                "instructions_documents",
                "InstructionsDocuments",
                false,
                ValueKind::List(Box::new(ValueKind::Struct(location()))),
            ),
            PropertySpec::new(
                "options",
                "Options",
                false,
                ValueKind::Map(PrimitiveKind::String),
            ),
        ]
    }

    fn location_value(bucket: &str, key: Option<&str>) -> PropertySet {
        let mut set = PropertySet::new(location_specs());
        set.set("BucketName", bucket).unwrap();

        if let Some(key) = key {
            set.set("Key", key).unwrap();
        }

        set
    }

    #[test]
    fn test_unbound_optional_is_omitted() {
        let decl = ResourceDeclaration::new(
            BUCKET,
            PropertySet::from_entries(vec![
                (string("bucket_name", "BucketName", true), Some("my-bucket".into())),
                (string("key", "Key", false), None),
            ]),
        );

        assert_eq!(
            Value::Object(serialize(&decl).unwrap()),
            json!({ "BucketName": "my-bucket" })
        );
    }

    #[test]
    fn test_missing_required_property() {
        let mut properties = PropertySet::new(capability_specs());
        properties.set("Options", PropertyValue::Map(BTreeMap::new())).unwrap();
        let decl = ResourceDeclaration::new(BUCKET, properties);

        let error = serialize(&decl).unwrap_err();
        assert_eq!(error, ValidationError::MissingProperty { path: "Name".into() });
        assert!(error.to_string().contains("Name"));
    }

    #[test]
    fn test_list_of_structures_keeps_order() {
        let first = location_value("input", Some("in.edi"));
        let second = location_value("output", None);

        let mut properties = PropertySet::new(capability_specs());
        properties
            .set("Name", "capability")
            .unwrap()
            .set(
                "InstructionsDocuments",
                PropertyValue::List(vec![first.clone().into(), second.clone().into()]),
            )
            .unwrap();

        let mapping = serialize(&ResourceDeclaration::new(BUCKET, properties)).unwrap();

        assert_eq!(
            mapping["InstructionsDocuments"],
            json!([
                Value::Object(serialize_set(&first, "").unwrap()),
                Value::Object(serialize_set(&second, "").unwrap()),
            ])
        );

        assert_eq!(
            mapping["InstructionsDocuments"],
            json!([
                { "BucketName": "input", "Key": "in.edi" },
                { "BucketName": "output" }
            ])
        );
    }

    #[test]
    fn test_serialize_is_idempotent() {
        let mut properties = PropertySet::new(capability_specs());
        properties.set("Name", "capability").unwrap();
        let decl = ResourceDeclaration::new(BUCKET, properties);

        assert_eq!(serialize(&decl).unwrap(), serialize(&decl).unwrap());
    }

    #[test]
    fn test_nested_missing_property_path() {
        let mut properties = PropertySet::new(capability_specs());
        properties
            .set("Name", "capability")
            .unwrap()
            .set(
                "InstructionsDocuments",
                PropertyValue::List(vec![PropertySet::new(location_specs()).into()]),
            )
            .unwrap();

        assert_eq!(
            serialize(&ResourceDeclaration::new(BUCKET, properties)).unwrap_err(),
            ValidationError::MissingProperty {
                path: "InstructionsDocuments[0].BucketName".into()
            }
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let mut properties = PropertySet::new(capability_specs());
        properties.set("Name", 42i64).unwrap();

        assert_eq!(
            serialize(&ResourceDeclaration::new(BUCKET, properties)).unwrap_err(),
            ValidationError::ShapeMismatch {
                path: "Name".into(),
                expected: "String".into(),
                found: "integer".into()
            }
        );
    }

    #[test]
    fn test_map_value_mismatch() {
        let mut properties = PropertySet::new(capability_specs());
        properties
            .set("Name", "capability")
            .unwrap()
            .set(
                "Options",
                PropertyValue::Map(BTreeMap::from([(
                    "awslogs-group".to_string(),
                    PropertyValue::Primitive(Primitive::Boolean(true)),
                )])),
            )
            .unwrap();

        assert_eq!(
            serialize(&ResourceDeclaration::new(BUCKET, properties))
                .unwrap_err()
                .path(),
            Some("Options.awslogs-group")
        );
    }

    #[test]
    fn test_foreign_structure_is_rejected() {
        let mut properties = PropertySet::new(capability_specs());
        properties
            .set("Name", "capability")
            .unwrap()
            .set(
                "InstructionsDocuments",
                PropertyValue::List(vec![PropertySet::from_entries(vec![(
                    string("name", "Name", true),
                    Some("x".into()),
                )])
                .into()]),
            )
            .unwrap();

        assert_eq!(
            serialize(&ResourceDeclaration::new(BUCKET, properties)).unwrap_err(),
            ValidationError::UnknownProperty {
                path: "InstructionsDocuments[0].Name".into()
            }
        );
    }

    #[test]
    fn test_intrinsic_accepted_for_any_kind() {
        let mut properties = PropertySet::new(capability_specs());
        properties
            .set("Name", Intrinsic::reference("NameParameter"))
            .unwrap()
            .set("InstructionsDocuments", Intrinsic::get_att("Docs", "List"))
            .unwrap();

        assert_eq!(
            Value::Object(serialize(&ResourceDeclaration::new(BUCKET, properties)).unwrap()),
            json!({
                "Name": { "Ref": "NameParameter" },
                "InstructionsDocuments": { "Fn::GetAtt": ["Docs", "List"] }
            })
        );
    }
}
