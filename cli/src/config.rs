use eyre::WrapErr;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub(crate) const CONFIG_FILE_NAME: &str = "stratus.toml";

/// Template output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    pub(crate) fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }
}

/// The structure of stratus.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    /// [project]
    /// name = "some-project"
    #[serde(default)]
    pub(crate) project: ProjectSection,

    /// [synth]
    /// format = "yaml"
    /// output_dir = "templates"
    #[serde(default)]
    pub(crate) synth: SynthSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ProjectSection {
    #[serde(default)]
    pub(crate) name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SynthSection {
    #[serde(default)]
    pub(crate) format: Format,

    /// Write templates to `<output_dir>/<stack>.template.<format>` instead of stdout
    pub(crate) output_dir: Option<PathBuf>,

    /// Overrides the description of every synthesized template
    pub(crate) description: Option<String>,
}

impl ConfigFile {
    /// Reads a `ConfigFile` instance from a given directory path
    ///
    /// Falls back to the default configuration when stratus.toml is not present.
    /// The project name defaults to the name of the directory. A relative
    /// `output_dir` is resolved against the directory.
    pub(crate) fn from_path(path: PathBuf) -> eyre::Result<Self> {
        let config_path = path.join(CONFIG_FILE_NAME);

        let mut config = match fs::read_to_string(&config_path) {
            Ok(toml_string) => toml::from_str::<ConfigFile>(&toml_string)
                .wrap_err(format!("Failed to parse {CONFIG_FILE_NAME}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No {CONFIG_FILE_NAME} in {path:?}, using defaults");
                ConfigFile::default()
            }
            Err(e) => return Err(e).wrap_err(format!("Failed to read {config_path:?}")),
        };

        if config.project.name.is_empty() {
            config.project.name = Self::dir_name(&path);
        }

        if let Some(output_dir) = config.synth.output_dir.take() {
            config.synth.output_dir = Some(path.join(output_dir));
        }

        Ok(config)
    }

    fn dir_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "stratus".into())
    }
}
