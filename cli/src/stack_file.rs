mod yaml;

use crate::error::Error;
use eyre::WrapErr;
use serde_json::Value;
use std::path::Path;
use stratus_template::StackDocument;

/// Read a stack document, YAML or JSON depending on the file extension
pub(crate) fn load(path: &Path) -> eyre::Result<StackDocument> {
    let text = std::fs::read_to_string(path)
        .wrap_err(format!("Failed to read stack file {path:?}"))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let raw: Value = match extension.as_deref() {
        Some("yaml") | Some("yml") => {
            yaml::parse(&text).wrap_err(format!("Invalid YAML in {path:?}"))?
        }
        Some("json") => serde_json::from_str(&text).wrap_err(format!("Invalid JSON in {path:?}"))?,
        _ => {
            return Err(Error::new(
                &format!("Unsupported stack file {path:?}"),
                Some("Use a .yaml, .yml or .json file"),
            )
            .into())
        }
    };

    log::debug!("Loaded stack file {path:?}");
    Ok(StackDocument::from_value(raw)?)
}
