/// Display global error message in unified format
#[derive(Debug)]
pub struct Error(String, Option<String>);

impl Error {
    pub fn new(message: &str, details: Option<&str>) -> Self {
        Error(message.to_string(), details.map(|d| d.to_string()))
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Display the message and details, as sort of a hint
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.1 {
            Some(details) => write!(f, "{}\n\n{}", self.0, console::style(details).dim()),
            None => write!(f, "{}", self.0),
        }
    }
}

impl std::error::Error for Error {}

/// Automatically convert all eyre error reports
///
/// A report wrapping an [Error] keeps its message and details.
impl From<eyre::ErrReport> for Error {
    fn from(error: eyre::ErrReport) -> Self {
        error
            .downcast::<Error>()
            .unwrap_or_else(|err| Error::new(&format!("{err:#}"), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;

    #[test]
    fn test_from_report_keeps_user_error() {
        let report = eyre::Report::new(Error::new("Stack not found", Some("Run `stratus stacks`")));
        let error = Error::from(report);

        assert_eq!(error.message(), "Stack not found");
        assert!(error.to_string().contains("stratus stacks"));
    }

    #[test]
    fn test_from_report_with_context() {
        let report = Err::<(), _>(eyre::eyre!("No such file"))
            .wrap_err("Failed to read stack file")
            .unwrap_err();

        assert_eq!(
            Error::from(report).message(),
            "Failed to read stack file: No such file"
        );
    }
}
