mod attrs;
mod properties;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// CloudFormation property table of a struct
///
/// Struct parameters, `#[cfn(...)]`:
/// - `resource`: resource type name, e.g. `"AWS::SecretsManager::Secret"`.
///   Without it the struct is a nested property structure.
///
/// Field parameters, `#[cfn(...)]`:
/// - `rename`: wire name, the field name in UpperCamelCase by default
/// - `skip`: keep the field out of the property table
///
/// `Option<_>` fields are optional properties, all others are required.
#[proc_macro_derive(Properties, attributes(cfn))]
pub fn derive_properties(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    properties::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
