use crate::error::Error;
use crate::runner::{Runnable, Runner};
use crate::writer::Writer;
use serde_json::json;
use stratus_template::{PropertySpec, Registry, StructSchema, ValueKind};
use tabled::Tabled;

#[derive(clap::Args, Clone)]
pub(crate) struct TypesCommand {
    /// Resource type to describe, e.g. AWS::B2BI::Capability
    resource_type: Option<String>,
}

impl Runnable for TypesCommand {
    fn runner(&self, writer: &Writer) -> impl Runner {
        TypesRunner {
            command: self.clone(),
            writer,
            registry: stratus_resources::registry(),
        }
    }
}

struct TypesRunner<'a> {
    command: TypesCommand,
    writer: &'a Writer,
    registry: Registry,
}

#[derive(Tabled)]
struct TypeRow {
    #[tabled(rename = "Type")]
    name: &'static str,

    #[tabled(rename = "Service")]
    service: &'static str,

    #[tabled(rename = "Properties")]
    properties: usize,
}

#[derive(Tabled)]
struct PropertyRow {
    #[tabled(rename = "Property")]
    wire_name: &'static str,

    #[tabled(rename = "Type")]
    kind: String,

    #[tabled(rename = "Required")]
    required: &'static str,
}

impl PropertyRow {
    fn new(spec: &PropertySpec) -> Self {
        PropertyRow {
            wire_name: spec.wire_name,
            kind: spec.kind.to_string(),
            required: if spec.required { "yes" } else { "" },
        }
    }
}

impl Runner for TypesRunner<'_> {
    fn run(&mut self) -> Result<(), Error> {
        match self.command.resource_type.clone() {
            Some(name) => self.describe(&name),
            None => self.list(),
        }
    }
}

impl TypesRunner<'_> {
    fn list(&self) -> Result<(), Error> {
        let rows: Vec<TypeRow> = self
            .registry
            .iter()
            .map(|schema| TypeRow {
                name: schema.resource_type().name(),
                service: schema.resource_type().service(),
                properties: schema.specs().len(),
            })
            .collect();

        self.writer.json(json!(rows
            .iter()
            .map(|row| json!({ "type": row.name, "properties": row.properties }))
            .collect::<Vec<_>>()))?;

        self.writer
            .table(&format!("{} resource types", rows.len()), rows)
    }

    /// Property table of a type, followed by the tables of the structures it nests
    fn describe(&self, name: &str) -> Result<(), Error> {
        let schema = self.registry.get(name).map_err(|e| {
            self.error(
                Some(&e.to_string()),
                Some("Run `stratus types` to list supported resource types"),
                Some(e.into()),
            )
        })?;

        let specs = schema.specs();
        let nested = nested_structures(&specs);

        self.writer.json(json!({
            "type": name,
            "properties": properties_json(&specs),
            "structures": nested
                .iter()
                .map(|s| json!({ "name": s.name(), "properties": properties_json(&s.specs()) }))
                .collect::<Vec<_>>(),
        }))?;

        self.writer
            .table(name, specs.iter().map(PropertyRow::new).collect())?;

        for structure in nested {
            self.writer.table(
                structure.name(),
                structure.specs().iter().map(PropertyRow::new).collect(),
            )?;
        }

        Ok(())
    }
}

fn properties_json(specs: &[PropertySpec]) -> serde_json::Value {
    json!(specs
        .iter()
        .map(|spec| json!({
            "name": spec.wire_name,
            "type": spec.kind.to_string(),
            "required": spec.required,
        }))
        .collect::<Vec<_>>())
}

/// Structures reachable from the specs, each once, in the order they are met
fn nested_structures(specs: &[PropertySpec]) -> Vec<StructSchema> {
    let mut found: Vec<StructSchema> = vec![];
    let mut queue: Vec<ValueKind> = specs.iter().map(|spec| spec.kind.clone()).collect();

    while !queue.is_empty() {
        let kind = queue.remove(0);

        match kind {
            ValueKind::Struct(schema) if !found.contains(&schema) => {
                queue.extend(schema.specs().into_iter().map(|spec| spec.kind));
                found.push(schema);
            }
            ValueKind::List(item) => queue.push(*item),
            _ => {}
        }
    }

    found
}
