use crate::tag::Tag;
use stratus_template::{Properties, Resolvable};

#[derive(Debug, Clone, Default, PartialEq, Properties)]
#[cfn(resource = "AWS::SecretsManager::Secret")]
pub struct Secret {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kms_key_id: Option<Resolvable<String>>,
    /// Literal secret value, mutually exclusive with `generate_secret_string`
    pub secret_string: Option<String>,
    pub generate_secret_string: Option<GenerateSecretString>,
    pub tags: Option<Vec<Tag>>,
}

/// Password generated by Secrets Manager when the secret is created
///
/// With `secret_string_template` and `generate_string_key` set, the password is
/// stored under that key of the JSON template.
#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct GenerateSecretString {
    pub secret_string_template: Option<String>,
    pub generate_string_key: Option<String>,
    pub password_length: Option<i64>,
    pub exclude_characters: Option<String>,
    pub exclude_punctuation: Option<bool>,
    pub include_space: Option<bool>,
    pub require_each_included_type: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use stratus_template::Resource;

    #[test]
    fn test_generated_secret() {
        let secret = Secret {
            description: Some("Database credentials".into()),
            generate_secret_string: Some(GenerateSecretString {
                secret_string_template: Some(r#"{"username":"app"}"#.into()),
                generate_string_key: Some("password".into()),
                password_length: Some(32),
                exclude_punctuation: Some(true),
                ..Default::default()
            }),
            tags: Some(vec![Tag::new("team", "platform")]),
            ..Default::default()
        };

        assert_eq!(
            Value::Object(secret.declare().serialize().unwrap()),
            json!({
                "Description": "Database credentials",
                "GenerateSecretString": {
                    "SecretStringTemplate": "{\"username\":\"app\"}",
                    "GenerateStringKey": "password",
                    "PasswordLength": 32,
                    "ExcludePunctuation": true
                },
                "Tags": [{ "Key": "team", "Value": "platform" }]
            })
        );
    }

    #[test]
    fn test_everything_optional() {
        let mapping = Secret::default().declare().serialize().unwrap();
        assert!(mapping.is_empty());
    }
}
