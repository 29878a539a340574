mod b2bi_edi;
mod eventbridge_lambda;
mod fargate_secret;
mod kinesis_analytics;

use stratus_template::{Template, ValidationError};

/// A stack declared in Rust, built into a template on demand
#[derive(Clone, Copy)]
pub(crate) struct Stack {
    pub(crate) name: &'static str,
    pub(crate) description: &'static str,
    build: fn() -> Result<Template, ValidationError>,
}

impl Stack {
    pub(crate) fn template(&self) -> Result<Template, ValidationError> {
        log::debug!("Building stack {}", self.name);
        (self.build)()
    }
}

/// Built-in stacks, in name order
pub(crate) fn all() -> Vec<Stack> {
    vec![
        Stack {
            name: b2bi_edi::NAME,
            description: b2bi_edi::DESCRIPTION,
            build: b2bi_edi::template,
        },
        Stack {
            name: eventbridge_lambda::NAME,
            description: eventbridge_lambda::DESCRIPTION,
            build: eventbridge_lambda::template,
        },
        Stack {
            name: fargate_secret::NAME,
            description: fargate_secret::DESCRIPTION,
            build: fargate_secret::template,
        },
        Stack {
            name: kinesis_analytics::NAME,
            description: kinesis_analytics::DESCRIPTION,
            build: kinesis_analytics::template,
        },
    ]
}

pub(crate) fn find(name: &str) -> Option<Stack> {
    all().into_iter().find(|stack| stack.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_stacks_render() {
        for stack in all() {
            let template = stack.template().unwrap();
            let rendered = template.render().unwrap();

            assert_eq!(rendered["AWSTemplateFormatVersion"], "2010-09-09");
            assert_eq!(rendered["Description"], stack.description);
            assert!(template.to_yaml().is_ok(), "{} must render to YAML", stack.name);
        }
    }

    #[test]
    fn test_names_are_sorted_and_unique() {
        let names: Vec<&str> = all().iter().map(|stack| stack.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();

        assert_eq!(names, sorted);
    }

    #[test]
    fn test_find() {
        assert!(find("fargate-secret").is_some());
        assert!(find("fargate").is_none());
    }
}
