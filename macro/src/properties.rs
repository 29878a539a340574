use crate::attrs::{parse_field_attrs, parse_struct_attrs};
use heck::ToUpperCamelCase;
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashSet;
use syn::{ext::IdentExt, Data, DeriveInput, Fields, LitStr};

/// Generate `Properties`, plus `Resource` for resource structs or `ToProperty`
/// for nested structures
pub fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let attrs = parse_struct_attrs(&input.attrs)?;
    let ident = &input.ident;
    let name = ident.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    ident,
                    "Properties can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "Properties can only be derived for structs",
            ))
        }
    };

    let mut specs = vec![];
    let mut values = vec![];
    let mut wire_names = HashSet::new();

    for field in fields {
        let field_attrs = parse_field_attrs(&field.attrs)?;

        if field_attrs.skip {
            continue;
        }

        // Named fields always have an ident
        let Some(field_ident) = &field.ident else {
            continue;
        };

        let field_name = field_ident.unraw().to_string();

        let wire_name = match &field_attrs.rename {
            Some(rename) => rename.clone(),
            None => LitStr::new(&field_name.to_upper_camel_case(), field_ident.span()),
        };

        if !wire_names.insert(wire_name.value()) {
            return Err(syn::Error::new(
                wire_name.span(),
                format!("Duplicate wire name `{}`", wire_name.value()),
            ));
        }

        let ty = &field.ty;

        specs.push(quote! {
            ::stratus_template::PropertySpec::new(
                #field_name,
                #wire_name,
                !<#ty as ::stratus_template::ToProperty>::is_optional(),
                <#ty as ::stratus_template::ToProperty>::kind(),
            )
        });

        values.push(quote! {
            ::stratus_template::ToProperty::to_property(&self.#field_ident)
        });
    }

    let properties = quote! {
        impl #impl_generics ::stratus_template::Properties for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;

            fn specs() -> ::std::vec::Vec<::stratus_template::PropertySpec> {
                ::std::vec![#(#specs),*]
            }

            fn properties(&self) -> ::stratus_template::PropertySet {
                let values: ::std::vec::Vec<::std::option::Option<::stratus_template::PropertyValue>> =
                    ::std::vec![#(#values),*];

                ::stratus_template::PropertySet::from_entries(
                    <Self as ::stratus_template::Properties>::specs()
                        .into_iter()
                        .zip(values)
                        .collect(),
                )
            }
        }
    };

    let binding = match attrs.resource {
        Some(resource) => quote! {
            impl #impl_generics ::stratus_template::Resource for #ident #ty_generics #where_clause {
                const RESOURCE_TYPE: ::stratus_template::ResourceType =
                    ::stratus_template::ResourceType::new(#resource);
            }
        },
        None => quote! {
            impl #impl_generics ::stratus_template::ToProperty for #ident #ty_generics #where_clause {
                fn kind() -> ::stratus_template::ValueKind {
                    ::stratus_template::ValueKind::Struct(
                        <Self as ::stratus_template::Properties>::schema(),
                    )
                }

                fn to_property(&self) -> ::std::option::Option<::stratus_template::PropertyValue> {
                    ::std::option::Option::Some(::stratus_template::PropertyValue::Struct(
                        <Self as ::stratus_template::Properties>::properties(self),
                    ))
                }
            }
        },
    };

    Ok(quote! {
        #properties
        #binding
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_str(source: &str) -> syn::Result<String> {
        expand(syn::parse_str(source)?).map(|tokens| tokens.to_string())
    }

    #[test]
    fn test_expand_resource() {
        let expanded = expand_str(
            r#"
            #[cfn(resource = "AWS::ECS::Cluster")]
            struct Cluster {
                cluster_name: Option<String>,
                #[cfn(rename = "ClusterSettings")]
                settings: Vec<ClusterSettings>,
            }
            "#,
        )
        .unwrap();

        assert!(expanded.contains("\"ClusterName\""));
        assert!(expanded.contains("\"ClusterSettings\""));
        assert!(expanded.contains("\"AWS::ECS::Cluster\""));
        assert!(expanded.contains(":: stratus_template :: Resource for Cluster"));
        assert!(!expanded.contains(":: stratus_template :: ToProperty for Cluster"));
    }

    #[test]
    fn test_expand_raw_identifier() {
        let expanded = expand_str("struct EdiType { r#type: String, #[cfn(skip)] note: String }").unwrap();

        assert!(expanded.contains("\"type\""));
        assert!(expanded.contains("\"Type\""));
        assert!(!expanded.contains("\"Note\""));
        assert!(expanded.contains(":: stratus_template :: ToProperty for EdiType"));
    }

    #[test]
    fn test_expand_errors() {
        let duplicate = expand_str(
            r#"struct Role { role_arn: String, #[cfn(rename = "RoleArn")] arn: String }"#,
        );

        assert_eq!(
            duplicate.unwrap_err().to_string(),
            "Duplicate wire name `RoleArn`"
        );

        assert!(expand_str("struct Tuple(String);").is_err());
        assert!(expand_str("enum Kind { A }").is_err());
    }
}
