use crate::declaration::{ResourceDeclaration, ResourceType};
use crate::intrinsic::Intrinsic;
use crate::spec::{PrimitiveKind, PropertySpec, StructSchema, ValueKind};
use crate::value::{Primitive, PropertySet, PropertyValue};
use serde_json::Value;
use std::collections::BTreeMap;

/// A Rust value which can be bound to a property
///
/// Implemented for primitives and containers here, and for structures by
/// `#[derive(Properties)]`.
pub trait ToProperty {
    fn kind() -> ValueKind;

    /// `None` leaves the property unbound
    fn to_property(&self) -> Option<PropertyValue>;

    /// Whether the property may be left unbound
    fn is_optional() -> bool {
        false
    }
}

/// A Rust value which is a CloudFormation scalar
pub trait ToPrimitive {
    fn primitive_kind() -> PrimitiveKind;
    fn to_primitive(&self) -> Primitive;
}

/// A value of a map property, a primitive or an intrinsic producing one
pub trait ToMapValue {
    fn primitive_kind() -> PrimitiveKind;
    fn to_map_value(&self) -> PropertyValue;
}

macro_rules! primitive {
    ($ty:ty, $kind:ident, |$value:ident| $convert:expr) => {
        impl ToPrimitive for $ty {
            fn primitive_kind() -> PrimitiveKind {
                PrimitiveKind::$kind
            }

            fn to_primitive(&self) -> Primitive {
                let $value = self;
                Primitive::$kind($convert)
            }
        }

        impl ToProperty for $ty {
            fn kind() -> ValueKind {
                ValueKind::Primitive(PrimitiveKind::$kind)
            }

            fn to_property(&self) -> Option<PropertyValue> {
                Some(PropertyValue::Primitive(self.to_primitive()))
            }
        }

        impl ToMapValue for $ty {
            fn primitive_kind() -> PrimitiveKind {
                PrimitiveKind::$kind
            }

            fn to_map_value(&self) -> PropertyValue {
                PropertyValue::Primitive(self.to_primitive())
            }
        }
    };
}

primitive!(String, String, |value| value.clone());
primitive!(&'static str, String, |value| value.to_string());
primitive!(bool, Boolean, |value| *value);
primitive!(i64, Integer, |value| *value);
primitive!(i32, Integer, |value| i64::from(*value));
primitive!(u32, Integer, |value| i64::from(*value));
primitive!(u16, Integer, |value| i64::from(*value));
primitive!(f64, Double, |value| *value);

impl<T: ToProperty> ToProperty for Option<T> {
    fn kind() -> ValueKind {
        T::kind()
    }

    fn to_property(&self) -> Option<PropertyValue> {
        self.as_ref().and_then(T::to_property)
    }

    fn is_optional() -> bool {
        true
    }
}

impl<T: ToProperty> ToProperty for Vec<T> {
    fn kind() -> ValueKind {
        ValueKind::List(Box::new(T::kind()))
    }

    /// An unbound element stays in place as `null`, which fails serialization
    fn to_property(&self) -> Option<PropertyValue> {
        Some(PropertyValue::List(
            self.iter()
                .map(|item| item.to_property().unwrap_or(PropertyValue::Json(Value::Null)))
                .collect(),
        ))
    }
}

impl<T: ToProperty> ToProperty for Box<T> {
    fn kind() -> ValueKind {
        T::kind()
    }

    fn to_property(&self) -> Option<PropertyValue> {
        T::to_property(self)
    }

    fn is_optional() -> bool {
        T::is_optional()
    }
}

impl<T: ToMapValue> ToProperty for BTreeMap<String, T> {
    fn kind() -> ValueKind {
        ValueKind::Map(T::primitive_kind())
    }

    fn to_property(&self) -> Option<PropertyValue> {
        Some(PropertyValue::Map(
            self.iter()
                .map(|(key, value)| (key.clone(), value.to_map_value()))
                .collect(),
        ))
    }
}

impl ToProperty for serde_json::Value {
    fn kind() -> ValueKind {
        ValueKind::Json
    }

    fn to_property(&self) -> Option<PropertyValue> {
        Some(PropertyValue::Json(self.clone()))
    }
}

impl ToProperty for Intrinsic {
    fn kind() -> ValueKind {
        ValueKind::Json
    }

    fn to_property(&self) -> Option<PropertyValue> {
        Some(PropertyValue::Intrinsic(self.clone()))
    }
}

/// A literal value or an intrinsic function producing one at deploy time
#[derive(Debug, Clone, PartialEq)]
pub enum Resolvable<T> {
    Literal(T),
    Intrinsic(Intrinsic),
}

impl<T> Resolvable<T> {
    pub fn literal(value: T) -> Self {
        Resolvable::Literal(value)
    }
}

impl<T: Default> Default for Resolvable<T> {
    fn default() -> Self {
        Resolvable::Literal(T::default())
    }
}

impl<T> From<Intrinsic> for Resolvable<T> {
    fn from(value: Intrinsic) -> Self {
        Resolvable::Intrinsic(value)
    }
}

impl From<&str> for Resolvable<String> {
    fn from(value: &str) -> Self {
        Resolvable::Literal(value.to_string())
    }
}

impl From<String> for Resolvable<String> {
    fn from(value: String) -> Self {
        Resolvable::Literal(value)
    }
}

impl<T: ToPrimitive> ToMapValue for Resolvable<T> {
    fn primitive_kind() -> PrimitiveKind {
        T::primitive_kind()
    }

    fn to_map_value(&self) -> PropertyValue {
        match self {
            Resolvable::Literal(value) => PropertyValue::Primitive(value.to_primitive()),
            Resolvable::Intrinsic(intrinsic) => PropertyValue::Intrinsic(intrinsic.clone()),
        }
    }
}

impl<T: ToProperty> ToProperty for Resolvable<T> {
    fn kind() -> ValueKind {
        T::kind()
    }

    fn to_property(&self) -> Option<PropertyValue> {
        match self {
            Resolvable::Literal(value) => value.to_property(),
            Resolvable::Intrinsic(intrinsic) => Some(PropertyValue::Intrinsic(intrinsic.clone())),
        }
    }
}

/// A structure with a static property table
///
/// Derive it with `#[derive(Properties)]` rather than implementing by hand.
pub trait Properties {
    /// Name of the structure, as shown in errors and property tables
    const NAME: &'static str;

    fn specs() -> Vec<PropertySpec>;

    /// Current field values bound to the property table
    fn properties(&self) -> PropertySet;

    fn schema() -> StructSchema
    where
        Self: Sized,
    {
        StructSchema::new(Self::NAME, Self::specs)
    }
}

/// A structure which is a CloudFormation resource on its own
pub trait Resource: Properties {
    const RESOURCE_TYPE: ResourceType;

    fn declare(&self) -> ResourceDeclaration {
        ResourceDeclaration::new(Self::RESOURCE_TYPE, self.properties())
    }
}
