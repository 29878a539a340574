use crate::config::ConfigFile;
use crate::error::Error;
use crate::writer::Writer;
use std::error::Error as StdError;

pub(crate) trait Runner {
    /// Configuration of the current directory
    fn config(&self) -> Result<ConfigFile, Error> {
        let dir = std::env::current_dir().map_err(|e| {
            self.error(
                Some("Current directory is not accessible"),
                None,
                Some(e.into()),
            )
        })?;

        ConfigFile::from_path(dir).map_err(|e| {
            self.error(
                Some("Invalid stratus.toml"),
                Some(&format!("{e:#}")),
                Some(e.into()),
            )
        })
    }

    /// Run the command
    ///
    /// Returns an error shown to the user in case of failure
    fn run(&mut self) -> Result<(), Error>;

    /// An error shown to the user, with the origin as details
    fn invalid(&self, title: &str, origin: impl StdError + 'static) -> Error {
        let details = origin.to_string();
        self.error(Some(title), Some(&details), Some(Box::new(origin)))
    }

    /// Construct an error shown to the user
    fn error(
        &self,
        title: Option<&str>,
        description: Option<&str>,
        origin: Option<Box<dyn StdError>>,
    ) -> Error {
        if let Some(origin) = origin {
            log::error!("{origin:?}");
        }

        if let Some(title) = title {
            Error::new(title, description)
        } else {
            Error::new(
                "Failed to run the command",
                Some("Run again with RUST_LOG=debug for details"),
            )
        }
    }
}

/// Return a runner for a command
pub(crate) trait Runnable {
    fn runner(&self, writer: &Writer) -> impl Runner;
}
