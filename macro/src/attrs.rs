use syn::{
    parse::{Parse, ParseStream},
    token, Attribute, Ident, LitStr,
};

/// `#[cfn(...)]` on the struct
#[derive(Debug, Default)]
pub struct StructAttrs {
    pub resource: Option<LitStr>,
}

/// `#[cfn(...)]` on a field
#[derive(Debug, Default)]
pub struct FieldAttrs {
    pub rename: Option<LitStr>,
    pub skip: bool,
}

impl Parse for StructAttrs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut resource = None;

        while !input.is_empty() {
            let ident_span = input.span();
            let ident: Ident = input.parse()?;

            match ident.to_string().as_str() {
                "resource" => {
                    if resource.is_some() {
                        return Err(syn::Error::new(
                            ident_span,
                            "Duplicate attribute `resource`",
                        ));
                    }

                    input.parse::<token::Eq>()?;
                    let value = input.parse::<LitStr>()?;
                    validate_resource_type(&value)?;
                    resource = Some(value);
                }
                other => {
                    return Err(syn::Error::new(
                        ident_span,
                        format!("Unknown attribute `{other}`"),
                    ));
                }
            }

            if !input.is_empty() {
                input.parse::<token::Comma>()?;
            }
        }

        Ok(Self { resource })
    }
}

impl Parse for FieldAttrs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut rename = None;
        let mut skip = None;

        while !input.is_empty() {
            let ident_span = input.span();
            let ident: Ident = input.parse()?;

            match ident.to_string().as_str() {
                "rename" => {
                    if rename.is_some() {
                        return Err(syn::Error::new(ident_span, "Duplicate attribute `rename`"));
                    }

                    input.parse::<token::Eq>()?;
                    let value = input.parse::<LitStr>()?;

                    if value.value().is_empty() {
                        return Err(syn::Error::new(value.span(), "Wire name must not be empty"));
                    }

                    rename = Some(value);
                }
                "skip" => {
                    if skip.is_some() {
                        return Err(syn::Error::new(ident_span, "Duplicate attribute `skip`"));
                    }

                    skip = Some(true);
                }
                other => {
                    return Err(syn::Error::new(
                        ident_span,
                        format!("Unknown attribute `{other}`"),
                    ));
                }
            }

            if !input.is_empty() {
                input.parse::<token::Comma>()?;
            }
        }

        Ok(Self {
            rename,
            skip: skip.unwrap_or_default(),
        })
    }
}

/// Merge all `#[cfn(...)]` attributes of an item, other attributes are ignored
pub fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut result = StructAttrs::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("cfn")) {
        let parsed: StructAttrs = attr.parse_args()?;

        if let Some(resource) = parsed.resource {
            if result.resource.is_some() {
                return Err(syn::Error::new(
                    resource.span(),
                    "Duplicate attribute `resource`",
                ));
            }

            result.resource = Some(resource);
        }
    }

    Ok(result)
}

pub fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("cfn")) {
        let parsed: FieldAttrs = attr.parse_args()?;

        if let Some(rename) = parsed.rename {
            if result.rename.is_some() {
                return Err(syn::Error::new(rename.span(), "Duplicate attribute `rename`"));
            }

            result.rename = Some(rename);
        }

        result.skip |= parsed.skip;
    }

    Ok(result)
}

/// Resource type names have three segments, e.g. `AWS::ECS::Cluster`
fn validate_resource_type(value: &LitStr) -> syn::Result<()> {
    let name = value.value();
    let segments: Vec<&str> = name.split("::").collect();

    let valid = segments.len() == 3
        && segments
            .iter()
            .all(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()));

    if !valid {
        return Err(syn::Error::new(
            value.span(),
            "Expected resource type in the form `Provider::Service::Resource`",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_attrs() {
        let attrs: StructAttrs = syn::parse_str(r#"resource = "AWS::ECS::Cluster""#).unwrap();
        assert_eq!(attrs.resource.unwrap().value(), "AWS::ECS::Cluster");
    }

    #[test]
    fn test_struct_attrs_errors() {
        let duplicate = syn::parse_str::<StructAttrs>(
            r#"resource = "AWS::ECS::Cluster", resource = "AWS::ECS::Service""#,
        );

        assert_eq!(
            duplicate.unwrap_err().to_string(),
            "Duplicate attribute `resource`"
        );

        assert!(syn::parse_str::<StructAttrs>(r#"resource = "ECS::Cluster""#).is_err());
        assert!(syn::parse_str::<StructAttrs>(r#"name = "Cluster""#).is_err());
    }

    #[test]
    fn test_field_attrs() {
        let attrs: FieldAttrs = syn::parse_str(r#"rename = "RoleARN""#).unwrap();
        assert_eq!(attrs.rename.unwrap().value(), "RoleARN");
        assert!(!attrs.skip);

        let attrs: FieldAttrs = syn::parse_str("skip").unwrap();
        assert!(attrs.skip);

        assert!(syn::parse_str::<FieldAttrs>("skip, skip").is_err());
        assert!(syn::parse_str::<FieldAttrs>(r#"rename = """#).is_err());
        assert!(syn::parse_str::<FieldAttrs>("flatten").is_err());
    }
}
