use std::fmt::{self, Debug, Display};

/// Scalar CloudFormation value types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Integer,
    Double,
    Boolean,
}

impl Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let str = match self {
            PrimitiveKind::String => "String",
            PrimitiveKind::Integer => "Integer",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::Boolean => "Boolean",
        };

        write!(f, "{}", str)
    }
}

/// Property table of a nested structure
///
/// The table is produced lazily, which allows structures to refer to each other
/// (or to themselves) without building an infinite value.
#[derive(Clone, Copy)]
pub struct StructSchema {
    name: &'static str,
    specs: fn() -> Vec<PropertySpec>,
}

impl StructSchema {
    pub const fn new(name: &'static str, specs: fn() -> Vec<PropertySpec>) -> Self {
        StructSchema { name, specs }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn specs(&self) -> Vec<PropertySpec> {
        (self.specs)()
    }
}

impl Debug for StructSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StructSchema").field(&self.name).finish()
    }
}

impl PartialEq for StructSchema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Shape of a property value
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Primitive(PrimitiveKind),
    Struct(StructSchema),
    List(Box<ValueKind>),

    /// String keys to primitive values, e.g. tags or container options
    Map(PrimitiveKind),

    /// Free-form JSON document, e.g. an IAM policy or an event pattern
    Json,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Primitive(kind) => write!(f, "{kind}"),
            ValueKind::Struct(schema) => write!(f, "{}", schema.name()),
            ValueKind::List(item) => write!(f, "List<{item}>"),
            ValueKind::Map(kind) => write!(f, "Map<{kind}>"),
            ValueKind::Json => write!(f, "Json"),
        }
    }
}

/// A named, typed property of a resource or a nested structure
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySpec {
    /// Name of the Rust field
    pub name: &'static str,

    /// Name used in the template, usually PascalCase
    pub wire_name: &'static str,

    pub required: bool,
    pub kind: ValueKind,
}

impl PropertySpec {
    pub fn new(
        name: &'static str,
        wire_name: &'static str,
        required: bool,
        kind: ValueKind,
    ) -> Self {
        PropertySpec {
            name,
            wire_name,
            required,
            kind,
        }
    }
}
