//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/taxotree/taxotree.toml`
//! 3. Local config: `<dir>/.taxotree.toml` (usually the working directory)
//! 4. Environment variables: `TAXOTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::services::{BrowserOptions, TableFormat};
use crate::application::ApplicationError;

pub const APP_NAME: &str = "taxotree";
pub const ENV_PREFIX: &str = "TAXOTREE";
pub const LOCAL_CONFIG_FILE: &str = ".taxotree.toml";

/// Unified configuration for taxotree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Table or snapshot opened when no input is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// Default output of `build`
    pub snapshot: PathBuf,
    /// Column separator of coded tables
    pub delimiter: char,
    /// Skip the first table row
    pub has_header: bool,
    pub list_width: u16,
    pub list_height: u16,
}

impl Default for Settings {
    fn default() -> Self {
        let browser = BrowserOptions::default();
        Self {
            input: None,
            snapshot: PathBuf::from("taxonomy.json"),
            delimiter: ',',
            has_header: false,
            list_width: browser.list_width,
            list_height: browser.list_height,
        }
    }
}

/// Get the XDG config directory for taxotree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(format!("{APP_NAME}.toml")))
}

pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// `local_dir` is searched for `.taxotree.toml`; pass None to skip the local layer.
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path();
        Self::load_from(global.as_deref(), local_dir)
    }

    /// Load settings from explicit layer locations.
    ///
    /// Missing files are skipped, malformed ones are errors.
    pub fn load_from(
        global_file: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("snapshot", defaults.snapshot.to_string_lossy().to_string())
            .map_err(config_err)?
            .set_default("delimiter", defaults.delimiter.to_string())
            .map_err(config_err)?
            .set_default("has_header", defaults.has_header)
            .map_err(config_err)?
            .set_default("list_width", i64::from(defaults.list_width))
            .map_err(config_err)?
            .set_default("list_height", i64::from(defaults.list_height))
            .map_err(config_err)?;

        if let Some(global) = global_file {
            debug!(path = %global.display(), exists = global.exists(), "global config");
            builder = builder.add_source(
                File::from(global.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }
        if let Some(dir) = local_dir {
            let local = local_config_path(dir);
            debug!(path = %local.display(), exists = local.exists(), "local config");
            builder = builder.add_source(File::from(local).format(FileFormat::Toml).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.expand_paths();
        settings.validate()?;
        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(input) = &self.input {
            self.input = Some(expand_path(input));
        }
        self.snapshot = expand_path(&self.snapshot);
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if !self.delimiter.is_ascii() {
            return Err(ApplicationError::Config {
                message: format!("delimiter must be a single ASCII character, got {:?}", self.delimiter),
            });
        }
        if self.list_width == 0 || self.list_height == 0 {
            return Err(ApplicationError::Config {
                message: "list_width and list_height must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn table_format(&self) -> TableFormat {
        TableFormat {
            // ASCII checked on load
            delimiter: u8::try_from(self.delimiter).unwrap_or(b','),
            has_header: self.has_header,
        }
    }

    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            list_width: self.list_width,
            list_height: self.list_height,
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# taxotree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/taxotree/taxotree.toml
#   Local:  ./.taxotree.toml
#   Env:    TAXOTREE_* environment variables (e.g. TAXOTREE_LIST_WIDTH=40)

# Table or snapshot opened when no input is given
# input = "~/data/taxonomy.csv"

# Default output file of `taxotree build`
# snapshot = "taxonomy.json"

# Column separator of coded tables
# delimiter = ","

# First table row is a header
# has_header = false

# Preferred column width and visible rows per list
# list_width = 30
# list_height = 14
"#
        .to_string()
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(raw.as_ref()) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            debug!(path = %raw, error = %e, "path not expanded");
            path.to_path_buf()
        }
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
