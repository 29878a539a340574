use crate::error::Error;
use crate::runner::{Runnable, Runner};
use crate::stack_file;
use crate::writer::Writer;
use serde_json::json;
use std::path::PathBuf;

#[derive(clap::Args, Clone)]
pub(crate) struct ValidateCommand {
    /// Stack file to check, YAML or JSON
    #[arg(short, long)]
    file: PathBuf,
}

impl Runnable for ValidateCommand {
    fn runner(&self, writer: &Writer) -> impl Runner {
        ValidateRunner {
            command: self.clone(),
            writer,
        }
    }
}

struct ValidateRunner<'a> {
    command: ValidateCommand,
    writer: &'a Writer,
}

impl Runner for ValidateRunner<'_> {
    /// Bind every resource of the file and render the template in memory
    fn run(&mut self) -> Result<(), Error> {
        let path = &self.command.file;
        let document = stack_file::load(path).map_err(|e| {
            log::error!("{e:?}");
            Error::from(e)
        })?;

        let template = document
            .into_template(&stratus_resources::registry())
            .map_err(|e| self.invalid("Invalid stack", e))?;

        template
            .render()
            .map_err(|e| self.invalid("Invalid stack", e))?;

        let resources = template.resources().count();
        let outputs = template.outputs().count();

        self.writer.text(&format!(
            "{} {} ({resources} resources, {outputs} outputs)\n",
            console::style("Valid").green().bold(),
            path.display(),
        ))?;

        self.writer.json(json!({
            "valid": true,
            "path": path,
            "resources": resources,
            "outputs": outputs,
        }))
    }
}
