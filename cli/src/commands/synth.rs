use crate::config::Format;
use crate::error::Error;
use crate::runner::{Runnable, Runner};
use crate::writer::Writer;
use crate::{stack_file, stacks};
use clap::ArgGroup;
use serde_json::json;
use std::path::{Path, PathBuf};
use stratus_template::Template;

#[derive(clap::Args, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["stack", "file"])))]
pub(crate) struct SynthCommand {
    /// Name of a built-in stack, see `stratus stacks`
    stack: Option<String>,

    /// Stack file to synthesize, YAML or JSON
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Template format, overrides the one in stratus.toml
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Write the template to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Runnable for SynthCommand {
    fn runner(&self, writer: &Writer) -> impl Runner {
        SynthRunner {
            command: self.clone(),
            writer,
        }
    }
}

struct SynthRunner<'a> {
    command: SynthCommand,
    writer: &'a Writer,
}

impl Runner for SynthRunner<'_> {
    /// Render the template and write it to stdout or a file
    fn run(&mut self) -> Result<(), Error> {
        let config = self.config()?;
        let (name, mut template) = self.template()?;
        log::debug!("Synthesizing {name} in project {}", config.project.name);

        if let Some(description) = &config.synth.description {
            template.set_description(description);
        }

        let rendered = template
            .render()
            .map_err(|e| self.invalid("Invalid stack", e))?;

        let format = self.command.format.unwrap_or(config.synth.format);

        let output = self.command.output.clone().or_else(|| {
            config
                .synth
                .output_dir
                .as_ref()
                .map(|dir| dir.join(format!("{name}.template.{}", format.extension())))
        });

        let Some(path) = output else {
            if self.writer.is_structured() {
                return self.writer.json(json!({ "stack": name, "template": rendered }));
            }

            return self.writer.text(&self.serialize(&template, format)?);
        };

        self.write(&path, &self.serialize(&template, format)?)?;

        self.writer.text(&format!(
            "{} {name} to {}\n",
            console::style("Synthesized").green().bold(),
            path.display()
        ))?;

        self.writer.json(json!({
            "stack": name,
            "path": path,
            "resources": template.resources().count(),
        }))
    }
}

impl SynthRunner<'_> {
    /// Template of the requested stack, named after the built-in stack or the file
    fn template(&self) -> Result<(String, Template), Error> {
        if let Some(name) = &self.command.stack {
            let stack = stacks::find(name).ok_or_else(|| {
                self.error(
                    Some(&format!("Stack `{name}` not found")),
                    Some("Run `stratus stacks` to list built-in stacks"),
                    None,
                )
            })?;

            let template = stack
                .template()
                .map_err(|e| self.invalid("Invalid stack", e))?;

            return Ok((stack.name.to_string(), template));
        }

        let Some(path) = &self.command.file else {
            return Err(self.error(Some("Either a stack or --file is required"), None, None));
        };

        let document = stack_file::load(path).map_err(|e| {
            log::error!("{e:?}");
            Error::from(e)
        })?;

        let template = document
            .into_template(&stratus_resources::registry())
            .map_err(|e| self.invalid("Invalid stack", e))?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "stack".into());

        Ok((name, template))
    }

    fn serialize(&self, template: &Template, format: Format) -> Result<String, Error> {
        let text = match format {
            Format::Json => template.to_json().map(|json| format!("{json}\n")),
            Format::Yaml => template.to_yaml(),
        };

        text.map_err(|e| self.invalid("Failed to render the template", e))
    }

    fn write(&self, path: &Path, text: &str) -> Result<(), Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                self.error(
                    Some(&format!("Failed to create {}", parent.display())),
                    None,
                    Some(e.into()),
                )
            })?;
        }

        std::fs::write(path, text).map_err(|e| {
            self.error(
                Some(&format!("Failed to write {}", path.display())),
                None,
                Some(e.into()),
            )
        })
    }
}
