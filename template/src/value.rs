use crate::error::{child_path, ValidationError};
use crate::intrinsic::Intrinsic;
use crate::spec::{PrimitiveKind, PropertySpec};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// A scalar property value
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::String(_) => PrimitiveKind::String,
            Primitive::Integer(_) => PrimitiveKind::Integer,
            Primitive::Double(_) => PrimitiveKind::Double,
            Primitive::Boolean(_) => PrimitiveKind::Boolean,
        }
    }

    /// Whether the value can be stored in a property of the given kind
    ///
    /// Integers are accepted where doubles are expected.
    pub fn conforms_to(&self, kind: PrimitiveKind) -> bool {
        matches!(
            (self, kind),
            (Primitive::String(_), PrimitiveKind::String)
                | (Primitive::Integer(_), PrimitiveKind::Integer)
                | (Primitive::Integer(_), PrimitiveKind::Double)
                | (Primitive::Double(_), PrimitiveKind::Double)
                | (Primitive::Boolean(_), PrimitiveKind::Boolean)
        )
    }

    pub(crate) fn render(&self, path: &str) -> Result<Value, ValidationError> {
        Ok(match self {
            Primitive::String(value) => Value::String(value.clone()),
            Primitive::Integer(value) => Value::Number((*value).into()),
            Primitive::Boolean(value) => Value::Bool(*value),
            Primitive::Double(value) => Value::Number(Number::from_f64(*value).ok_or_else(
                || ValidationError::InvalidNumber {
                    path: path.to_string(),
                },
            )?),
        })
    }

    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Primitive::String(_) => "string",
            Primitive::Integer(_) => "integer",
            Primitive::Double(_) => "double",
            Primitive::Boolean(_) => "boolean",
        }
    }
}

/// A value bound to a property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Primitive(Primitive),
    Struct(PropertySet),
    List(Vec<PropertyValue>),

    /// String keys to primitives or intrinsics
    Map(BTreeMap<String, PropertyValue>),
    Json(Value),

    /// Resolved by CloudFormation at deploy time, accepted for any kind
    Intrinsic(Intrinsic),
}

impl PropertyValue {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            PropertyValue::Primitive(primitive) => primitive.describe(),
            PropertyValue::Struct(_) => "structure",
            PropertyValue::List(_) => "list",
            PropertyValue::Map(_) => "map",
            PropertyValue::Json(Value::Null) => "null",
            PropertyValue::Json(_) => "JSON document",
            PropertyValue::Intrinsic(_) => "intrinsic function",
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Primitive(Primitive::String(value.to_string()))
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Primitive(Primitive::String(value))
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Primitive(Primitive::Integer(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Primitive(Primitive::Double(value))
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Primitive(Primitive::Boolean(value))
    }
}

impl From<Intrinsic> for PropertyValue {
    fn from(value: Intrinsic) -> Self {
        PropertyValue::Intrinsic(value)
    }
}

impl From<PropertySet> for PropertyValue {
    fn from(value: PropertySet) -> Self {
        PropertyValue::Struct(value)
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(values: Vec<T>) -> Self {
        PropertyValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Ordered property specs with their bound values
///
/// The order of the specs is the order in which properties are rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySet {
    entries: Vec<(PropertySpec, Option<PropertyValue>)>,
}

impl PropertySet {
    /// A set with every property unbound
    pub fn new(specs: Vec<PropertySpec>) -> Self {
        PropertySet {
            entries: specs.into_iter().map(|spec| (spec, None)).collect(),
        }
    }

    pub fn from_entries(entries: Vec<(PropertySpec, Option<PropertyValue>)>) -> Self {
        PropertySet { entries }
    }

    /// Bind a value to a property by its wire name
    pub fn set(
        &mut self,
        wire_name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<&mut Self, ValidationError> {
        *self.slot(wire_name)? = Some(value.into());
        Ok(self)
    }

    /// Remove the value bound to a property
    pub fn unset(&mut self, wire_name: &str) -> Result<&mut Self, ValidationError> {
        *self.slot(wire_name)? = None;
        Ok(self)
    }

    pub fn get(&self, wire_name: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(spec, _)| spec.wire_name == wire_name)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn spec(&self, wire_name: &str) -> Option<&PropertySpec> {
        self.entries
            .iter()
            .map(|(spec, _)| spec)
            .find(|spec| spec.wire_name == wire_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertySpec, Option<&PropertyValue>)> {
        self.entries.iter().map(|(spec, value)| (spec, value.as_ref()))
    }

    /// Number of bound properties
    pub fn bound(&self) -> usize {
        self.entries.iter().filter(|(_, value)| value.is_some()).count()
    }

    fn slot(&mut self, wire_name: &str) -> Result<&mut Option<PropertyValue>, ValidationError> {
        self.entries
            .iter_mut()
            .find(|(spec, _)| spec.wire_name == wire_name)
            .map(|(_, value)| value)
            .ok_or_else(|| ValidationError::UnknownProperty {
                path: child_path("", wire_name),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ValueKind;

    fn specs() -> Vec<PropertySpec> {
        vec![
            PropertySpec::new(
                "bucket_name",
                "BucketName",
                true,
                ValueKind::Primitive(PrimitiveKind::String),
            ),
            PropertySpec::new(
                "key",
                "Key",
                false,
                ValueKind::Primitive(PrimitiveKind::String),
            ),
        ]
    }

    #[test]
    fn test_set_and_unset() {
        let mut set = PropertySet::new(specs());
        assert_eq!(set.bound(), 0);

        set.set("BucketName", "my-bucket").unwrap();
        assert_eq!(set.get("BucketName"), Some(&PropertyValue::from("my-bucket")));
        assert_eq!(set.bound(), 1);

        set.unset("BucketName").unwrap();
        assert_eq!(set.get("BucketName"), None);
    }

    #[test]
    fn test_set_unknown_property() {
        let mut set = PropertySet::new(specs());

        assert_eq!(
            set.set("Bucket", "my-bucket").unwrap_err(),
            ValidationError::UnknownProperty {
                path: "Bucket".into()
            }
        );
    }

    #[test]
    fn test_integer_conforms_to_double() {
        assert!(Primitive::Integer(5).conforms_to(PrimitiveKind::Double));
        assert!(!Primitive::Double(5.5).conforms_to(PrimitiveKind::Integer));
        assert!(!Primitive::String("5".into()).conforms_to(PrimitiveKind::Integer));
    }

    #[test]
    fn test_non_finite_double() {
        assert_eq!(
            Primitive::Double(f64::NAN).render("Cpu").unwrap_err(),
            ValidationError::InvalidNumber { path: "Cpu".into() }
        );
    }
}
