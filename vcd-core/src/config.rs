//! Optional YAML configuration holding defaults for a VCD run
//!
//! A project that always reads the same sheet and columns can keep them in a
//! `vcd.yaml` next to the requirements instead of repeating them on every
//! command line.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, VcdError};
use crate::report::ReportKind;

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "VCD_CONFIG";
/// Config file picked up from the working directory
pub const LOCAL_CONFIG_FILE: &str = "vcd.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VcdConfig {
    pub requirements_file: Option<PathBuf>,
    pub sheet: Option<String>,
    pub identifier_column: Option<String>,
    pub text_column: Option<String>,
    pub source_directory: Option<PathBuf>,
    pub output_report: Option<PathBuf>,
    pub report_kind: Option<ReportKind>,
    pub skip_malformed: Option<bool>,
}

impl VcdConfig {
    /// Loads the config from the provided path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                VcdError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                VcdError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|e| {
            VcdError::InvalidFormat(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Locates and loads the config to use
    ///
    /// Priority: the explicit path, then `VCD_CONFIG`, then `vcd.yaml` in the
    /// working directory, then `vcd/config.yaml` in the user config directory.
    /// The first two must exist; the others are used only when present.
    /// Returns the defaults when no file is found.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let from_env = env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let candidates: Vec<PathBuf> =
            [Some(PathBuf::from(LOCAL_CONFIG_FILE)), user_config_path()]
                .into_iter()
                .flatten()
                .collect();

        Self::discover_from(explicit, from_env, &candidates)
    }

    /// Applies the discovery order to already gathered inputs
    fn discover_from(
        explicit: Option<&Path>,
        from_env: Option<PathBuf>,
        candidates: &[PathBuf],
    ) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        if let Some(path) = from_env {
            return Ok((Self::load(&path)?, Some(path)));
        }

        for path in candidates {
            if path.is_file() {
                return Ok((Self::load(path)?, Some(path.clone())));
            }
        }

        Ok((Self::default(), None))
    }
}

/// `<config dir>/vcd/config.yaml`, if the platform has a config directory
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vcd").join("config.yaml"))
}
