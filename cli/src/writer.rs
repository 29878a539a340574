use crate::error::Error;
use std::io::{Stderr, Stdout, Write};
use tabled::settings::{peaker::Priority, style::Style, Settings, Width};
use tabled::{Table, Tabled};
use terminal_size::{terminal_size, Width as TerminalWidth};

/// Write all stdout/stderr outputs in the app
///
/// In either plain text mode or structured (e.g. JSON).
#[derive(Default)]
pub(crate) struct Writer {
    is_structured: bool,
}

impl Writer {
    pub(crate) fn new(is_structured: bool) -> Self {
        Writer { is_structured }
    }

    /// Output plain text
    ///
    /// Prints out nothing but a warning (in warn log level) when the writer is in structured mode.
    pub(crate) fn text(&self, output: &str) -> Result<(), Error> {
        if self.is_structured {
            log::warn!("Skipping output (not structured data): {output}");
            return Ok(());
        }

        self.write(output, false)
    }

    /// Output serialized JSON
    ///
    /// Prints out nothing but a warning (in warn log level) when the writer is in plain text mode.
    pub(crate) fn json(&self, output: serde_json::Value) -> Result<(), Error> {
        if !self.is_structured {
            log::warn!("Skipping output (not plain text): {output}");
            return Ok(());
        }

        self.write(&format!("{output}\n"), false)
    }

    /// Output a table fitted to the terminal width
    pub(crate) fn table<T: Tabled>(&self, title: &str, rows: Vec<T>) -> Result<(), Error> {
        let mut table = Table::new(rows);
        table.with(Style::modern());

        // Not a terminal, e.g. piped to a file, so keep the natural width
        if let Some((TerminalWidth(width), _)) = terminal_size() {
            let width: usize = width.into();

            table.with(
                Settings::default()
                    .with(Width::wrap(width).priority(Priority::max(true)))
                    .with(Width::increase(width)),
            );
        }

        self.text(&format!("{}\n{table}\n", console::style(title).bold().green()))
    }

    /// Output plain text in stderr
    ///
    /// Prints out nothing but a warning (in warn log level) when the writer is in structured mode.
    pub(crate) fn error(&self, output: &str) -> Result<(), Error> {
        if self.is_structured {
            log::warn!("Skipping output (not structured data): {output}");
            return Ok(());
        }

        self.write(output, true)
    }

    /// General method for writing to stdout/stderr
    fn write(&self, output: &str, is_error: bool) -> Result<(), Error> {
        let mut stderr: Stderr = std::io::stderr();
        let mut stdout: Stdout = std::io::stdout();
        let stream: &mut dyn Write = if is_error { &mut stderr } else { &mut stdout };

        stream.write_all(output.as_bytes()).map_err(|e| {
            log::error!("Error while writing to std*: {e:?}");
            Error::new("Output error", Some("Failed to write to the terminal"))
        })
    }

    pub(crate) fn is_structured(&self) -> bool {
        self.is_structured
    }
}
