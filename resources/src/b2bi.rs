//! AWS B2B Data Interchange: trading partner profiles, EDI transformers and
//! the capabilities and partnerships tying them together.

use crate::tag::Tag;
use stratus_template::{Properties, Resolvable};

/// Amazon S3 file location, identified by bucket and key
#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct S3Location {
    pub bucket_name: Option<Resolvable<String>>,
    pub key: Option<Resolvable<String>>,
}

impl S3Location {
    pub fn new(bucket_name: impl Into<Resolvable<String>>, key: impl Into<Resolvable<String>>) -> Self {
        S3Location {
            bucket_name: Some(bucket_name.into()),
            key: Some(key.into()),
        }
    }
}

/// X12 transaction set and its version, e.g. `X12_110` and `VERSION_4010`
#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct X12Details {
    pub transaction_set: Option<String>,
    pub version: Option<String>,
}

/// EDI standard in use, X12 is the only one supported
#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct EdiType {
    pub x12_details: X12Details,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct EdiConfiguration {
    pub input_location: S3Location,
    pub output_location: S3Location,
    pub transformer_id: Resolvable<String>,
    pub r#type: EdiType,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct CapabilityConfiguration {
    pub edi: EdiConfiguration,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::B2BI::Capability")]
pub struct Capability {
    pub configuration: CapabilityConfiguration,
    pub name: String,
    /// Only `edi` is accepted
    pub r#type: String,
    pub instructions_documents: Option<Vec<S3Location>>,
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::B2BI::Profile")]
pub struct Profile {
    pub business_name: String,
    /// `ENABLED` or `DISABLED`
    pub logging: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::B2BI::Partnership")]
pub struct Partnership {
    pub email: String,
    pub name: String,
    pub profile_id: Resolvable<String>,
    pub capabilities: Option<Vec<Resolvable<String>>>,
    pub phone: Option<String>,
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::B2BI::Transformer")]
pub struct Transformer {
    pub edi_type: EdiType,
    /// `JSON` or `XML`
    pub file_format: String,
    pub mapping_template: String,
    pub name: String,
    /// `active` or `inactive`
    pub status: String,
    pub sample_document: Option<String>,
    pub tags: Option<Vec<Tag>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use stratus_template::{Intrinsic, Resource, ValidationError};

    fn capability() -> Capability {
        Capability {
            configuration: CapabilityConfiguration {
                edi: EdiConfiguration {
                    input_location: S3Location::new("edi-input", "inbound/"),
                    output_location: S3Location::new("edi-output", "outbound/"),
                    transformer_id: Intrinsic::get_att("Transformer", "TransformerId").into(),
                    r#type: EdiType {
                        x12_details: X12Details {
                            transaction_set: Some("X12_110".into()),
                            version: Some("VERSION_4010".into()),
                        },
                    },
                },
            },
            name: "edi-capability".into(),
            r#type: "edi".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_capability() {
        let mapping = capability().declare().serialize().unwrap();

        assert_eq!(
            Value::Object(mapping),
            json!({
                "Configuration": {
                    "Edi": {
                        "InputLocation": { "BucketName": "edi-input", "Key": "inbound/" },
                        "OutputLocation": { "BucketName": "edi-output", "Key": "outbound/" },
                        "TransformerId": { "Fn::GetAtt": ["Transformer", "TransformerId"] },
                        "Type": {
                            "X12Details": { "TransactionSet": "X12_110", "Version": "VERSION_4010" }
                        }
                    }
                },
                "Name": "edi-capability",
                "Type": "edi"
            })
        );
    }

    #[test]
    fn test_instructions_documents_keep_order() {
        let documents = vec![
            S3Location::new("docs", "first.json"),
            S3Location {
                bucket_name: Some("docs".into()),
                key: None,
            },
        ];

        let capability = Capability {
            instructions_documents: Some(documents),
            ..capability()
        };

        let mapping = capability.declare().serialize().unwrap();

        assert_eq!(
            mapping["InstructionsDocuments"],
            json!([{ "BucketName": "docs", "Key": "first.json" }, { "BucketName": "docs" }])
        );
    }

    #[test]
    fn test_profile_requires_phone() {
        let profile = Profile {
            business_name: "Example Corp".into(),
            logging: "ENABLED".into(),
            name: "example".into(),
            phone: String::new(),
            ..Default::default()
        };

        // An empty string is still a bound value
        assert!(profile.declare().serialize().is_ok());

        let mut decl = profile.declare();
        decl.set("Phone", Intrinsic::reference("Phone")).unwrap();
        assert!(decl.serialize().is_ok());

        let mut properties = profile.properties();
        properties.unset("Phone").unwrap();

        assert_eq!(
            stratus_template::ResourceDeclaration::new(Profile::RESOURCE_TYPE, properties)
                .serialize()
                .unwrap_err(),
            ValidationError::MissingProperty {
                path: "Phone".into()
            }
        );
    }
}
