use stratus_resources::b2bi::{
    Capability, CapabilityConfiguration, EdiConfiguration, EdiType, Partnership, Profile,
    S3Location, Transformer, X12Details,
};
use stratus_resources::Tag;
use stratus_template::{Intrinsic, Output, Template, ValidationError};

pub(super) const NAME: &str = "b2bi-edi";
pub(super) const DESCRIPTION: &str = "B2B Data Interchange profile, X12 transformer, capability and partnership";

const BUCKET: &str = "edi-documents";

const MAPPING_TEMPLATE: &str = r#"{
  "orderNumber": interchanges[0].groups[0].transactions[0].segments[0].BSN_02,
  "shipmentDate": interchanges[0].groups[0].transactions[0].segments[0].BSN_03
}"#;

fn x12_856() -> EdiType {
    EdiType {
        x12_details: X12Details {
            transaction_set: Some("X12_856".into()),
            version: Some("VERSION_4010".into()),
        },
    }
}

pub(super) fn template() -> Result<Template, ValidationError> {
    let tags = vec![Tag::new("stack", NAME)];
    let mut template = Template::new().description(DESCRIPTION);

    template
        .add(
            "Profile",
            &Profile {
                business_name: "Example Logistics".into(),
                logging: "ENABLED".into(),
                name: "example-logistics".into(),
                phone: "+15555550100".into(),
                email: Some("edi@example.com".into()),
                tags: Some(tags.clone()),
            },
        )?
        .add(
            "Transformer",
            &Transformer {
                edi_type: x12_856(),
                file_format: "JSON".into(),
                mapping_template: MAPPING_TEMPLATE.into(),
                name: "advance-ship-notice".into(),
                status: "active".into(),
                tags: Some(tags.clone()),
                ..Default::default()
            },
        )?
        .add(
            "Capability",
            &Capability {
                configuration: CapabilityConfiguration {
                    edi: EdiConfiguration {
                        input_location: S3Location::new(BUCKET, "input/"),
                        output_location: S3Location::new(BUCKET, "output/"),
                        transformer_id: Intrinsic::get_att("Transformer", "TransformerId").into(),
                        r#type: x12_856(),
                    },
                },
                name: "advance-ship-notice".into(),
                r#type: "edi".into(),
                instructions_documents: Some(vec![S3Location::new(BUCKET, "instructions/856.json")]),
                tags: Some(tags.clone()),
            },
        )?
        .add(
            "Partnership",
            &Partnership {
                email: "partner@example.com".into(),
                name: "example-partner".into(),
                profile_id: Intrinsic::get_att("Profile", "ProfileId").into(),
                capabilities: Some(vec![Intrinsic::get_att("Capability", "CapabilityId").into()]),
                tags: Some(tags),
                ..Default::default()
            },
        )?
        .output(
            "PartnershipId",
            Output::new(Intrinsic::get_att("Partnership", "PartnershipId")),
        )?;

    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_capability_configuration() {
        let rendered = template().unwrap().render().unwrap();
        let capability = &rendered["Resources"]["Capability"];

        assert_eq!(capability["Type"], "AWS::B2BI::Capability");
        assert_eq!(
            capability["Properties"]["Configuration"]["Edi"]["Type"],
            json!({ "X12Details": { "TransactionSet": "X12_856", "Version": "VERSION_4010" } })
        );
        assert_eq!(
            capability["Properties"]["InstructionsDocuments"],
            json!([{ "BucketName": "edi-documents", "Key": "instructions/856.json" }])
        );
    }
}
