//! Typed CloudFormation resource declarations
//!
//! A resource is a struct deriving [`Properties`], which generates the static
//! property table the values are checked against. [`serialize`] maps a bound
//! declaration to CloudFormation wire names, [`Template`] assembles
//! declarations into a deployable document.

extern crate self as stratus_template;

mod binder;
mod declaration;
mod document;
mod error;
mod intrinsic;
mod logical_id;
mod mapper;
mod properties;
mod registry;
mod spec;
mod template;
mod value;

pub use binder::bind;
pub use declaration::{DeletionPolicy, ResourceDeclaration, ResourceType};
pub use document::StackDocument;
pub use error::{RenderError, ValidationError};
pub use intrinsic::{pseudo, Intrinsic};
pub use logical_id::{sanitize_logical_id, validate_logical_id};
pub use mapper::serialize;
pub use properties::{Properties, Resolvable, Resource, ToMapValue, ToPrimitive, ToProperty};
pub use registry::{Registry, ResourceSchema};
pub use spec::{PrimitiveKind, PropertySpec, StructSchema, ValueKind};
pub use stratus_macro::Properties;
pub use template::{Output, Parameter, Template, FORMAT_VERSION};
pub use value::{Primitive, PropertySet, PropertyValue};
