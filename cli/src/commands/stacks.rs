use crate::error::Error;
use crate::runner::{Runnable, Runner};
use crate::stacks;
use crate::writer::Writer;
use serde_json::json;
use tabled::Tabled;

#[derive(clap::Args, Clone)]
pub(crate) struct StacksCommand {}

impl Runnable for StacksCommand {
    fn runner(&self, writer: &Writer) -> impl Runner {
        StacksRunner { writer }
    }
}

struct StacksRunner<'a> {
    writer: &'a Writer,
}

#[derive(Tabled)]
struct StackRow {
    #[tabled(rename = "Name")]
    name: &'static str,

    #[tabled(rename = "Resources")]
    resources: usize,

    #[tabled(rename = "Description")]
    description: &'static str,
}

impl Runner for StacksRunner<'_> {
    fn run(&mut self) -> Result<(), Error> {
        let mut rows = vec![];

        for stack in stacks::all() {
            let template = stack
                .template()
                .map_err(|e| self.invalid(&format!("Stack `{}` is invalid", stack.name), e))?;

            rows.push(StackRow {
                name: stack.name,
                resources: template.resources().count(),
                description: stack.description,
            });
        }

        self.writer.json(json!(rows
            .iter()
            .map(|row| json!({
                "name": row.name,
                "resources": row.resources,
                "description": row.description,
            }))
            .collect::<Vec<_>>()))?;

        self.writer.table("Built-in stacks", rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_stacks() {
        let writer = Writer::new(true);
        assert!(StacksCommand {}.runner(&writer).run().is_ok());
    }
}
