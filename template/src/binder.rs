use crate::declaration::ResourceDeclaration;
use crate::error::{child_path, index_path, ValidationError};
use crate::intrinsic::Intrinsic;
use crate::registry::ResourceSchema;
use crate::spec::{PrimitiveKind, PropertySpec, ValueKind};
use crate::value::{Primitive, PropertySet, PropertyValue};
use serde_json::{Map, Value};

/// Bind raw properties, keyed by wire names, to a resource schema
///
/// `null` (or absent) properties bind to an empty set, so a missing required
/// property surfaces when the declaration is serialized.
pub fn bind(schema: &ResourceSchema, raw: &Value) -> Result<ResourceDeclaration, ValidationError> {
    log::debug!("Binding properties of {}", schema.resource_type());

    let properties = match raw {
        Value::Null => PropertySet::new(schema.specs()),
        raw => bind_properties(schema.specs(), raw, "")?,
    };

    Ok(ResourceDeclaration::new(schema.resource_type(), properties))
}

fn bind_properties(
    specs: Vec<PropertySpec>,
    raw: &Value,
    path: &str,
) -> Result<PropertySet, ValidationError> {
    let object = raw.as_object().ok_or_else(|| ValidationError::ShapeMismatch {
        path: path.to_string(),
        expected: "structure".into(),
        found: describe(raw).into(),
    })?;

    if let Some(unknown) = object
        .keys()
        .find(|key| !specs.iter().any(|spec| spec.wire_name == key.as_str()))
    {
        return Err(ValidationError::UnknownProperty {
            path: child_path(path, unknown),
        });
    }

    let entries = specs
        .into_iter()
        .map(|spec| {
            let value = match object.get(spec.wire_name) {
                Some(raw) => Some(bind_value(
                    raw,
                    &spec.kind,
                    &child_path(path, spec.wire_name),
                )?),
                None => None,
            };

            Ok((spec, value))
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    Ok(PropertySet::from_entries(entries))
}

fn bind_value(raw: &Value, kind: &ValueKind, path: &str) -> Result<PropertyValue, ValidationError> {
    if let Some(intrinsic) = Intrinsic::parse(raw, path)? {
        return Ok(PropertyValue::Intrinsic(intrinsic));
    }

    let mismatch = || ValidationError::ShapeMismatch {
        path: path.to_string(),
        expected: kind.to_string(),
        found: describe(raw).into(),
    };

    match (kind, raw) {
        (_, Value::Null) => Err(mismatch()),

        (ValueKind::Primitive(expected), raw) => bind_primitive(raw, *expected)
            .map(PropertyValue::Primitive)
            .ok_or_else(mismatch),

        (ValueKind::Struct(schema), Value::Object(_)) => {
            bind_properties(schema.specs(), raw, path).map(PropertyValue::Struct)
        }

        (ValueKind::List(item), Value::Array(values)) => values
            .iter()
            .enumerate()
            .map(|(i, value)| bind_value(value, item, &index_path(path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(PropertyValue::List),

        (ValueKind::Map(expected), Value::Object(entries)) => entries
            .iter()
            .map(|(key, value)| {
                let path = child_path(path, key);

                if let Some(intrinsic) = Intrinsic::parse(value, &path)? {
                    return Ok((key.clone(), PropertyValue::Intrinsic(intrinsic)));
                }

                bind_primitive(value, *expected)
                    .map(|primitive| (key.clone(), PropertyValue::Primitive(primitive)))
                    .ok_or_else(|| ValidationError::ShapeMismatch {
                        path,
                        expected: expected.to_string(),
                        found: describe(value).into(),
                    })
            })
            .collect::<Result<_, _>>()
            .map(PropertyValue::Map),

        (ValueKind::Json, raw) => Ok(PropertyValue::Json(raw.clone())),

        _ => Err(mismatch()),
    }
}

fn bind_primitive(raw: &Value, kind: PrimitiveKind) -> Option<Primitive> {
    match (kind, raw) {
        (PrimitiveKind::String, Value::String(value)) => Some(Primitive::String(value.clone())),
        (PrimitiveKind::Integer, Value::Number(number)) => number.as_i64().map(Primitive::Integer),
        (PrimitiveKind::Double, Value::Number(number)) => match number.as_i64() {
            Some(integer) => Some(Primitive::Integer(integer)),
            None => number.as_f64().map(Primitive::Double),
        },
        (PrimitiveKind::Boolean, Value::Bool(value)) => Some(Primitive::Boolean(*value)),
        _ => None,
    }
}

/// Bind a value which has no spec, e.g. an intrinsic function argument
pub(crate) fn bind_untyped(raw: &Value, path: &str) -> Result<PropertyValue, ValidationError> {
    if let Some(intrinsic) = Intrinsic::parse(raw, path)? {
        return Ok(PropertyValue::Intrinsic(intrinsic));
    }

    Ok(match raw {
        Value::String(value) => PropertyValue::Primitive(Primitive::String(value.clone())),
        Value::Bool(value) => PropertyValue::Primitive(Primitive::Boolean(*value)),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => PropertyValue::Primitive(Primitive::Integer(integer)),
            None => PropertyValue::Json(raw.clone()),
        },
        Value::Array(values) => PropertyValue::List(
            values
                .iter()
                .enumerate()
                .map(|(i, value)| bind_untyped(value, &index_path(path, i)))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(_) | Value::Null => PropertyValue::Json(raw.clone()),
    })
}

fn describe(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_i64() || number.is_u64() => "integer",
        Value::Number(_) => "double",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "structure",
    }
}

/// Object entries of a raw value, or a malformed-document error
pub(crate) fn expect_object<'a>(
    raw: &'a Value,
    path: &str,
) -> Result<&'a Map<String, Value>, ValidationError> {
    raw.as_object().ok_or_else(|| ValidationError::Malformed {
        path: path.to_string(),
        reason: format!("expected a mapping, got {}", describe(raw)),
    })
}
