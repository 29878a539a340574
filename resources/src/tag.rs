use stratus_template::{Properties, Resolvable};

/// Key-value label attached to a resource
#[derive(Debug, Clone, Default, PartialEq, Properties)]
pub struct Tag {
    pub key: String,
    pub value: Resolvable<String>,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<Resolvable<String>>) -> Self {
        Tag {
            key: key.into(),
            value: value.into(),
        }
    }
}
