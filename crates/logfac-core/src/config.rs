//! Settings for hosting the facility module.
//!
//! [`Settings::load`] layers an optional TOML file and `LOGFAC_*`
//! environment variables on top of the built-in defaults. The facility
//! configuration text itself can be given inline (`facility.conf`) or as a
//! path (`facility.conf_file`); inline text wins.
//!
//! ```toml
//! [facility]
//! conf_file  = "/etc/logfac/facilities.conf"
//! open_sinks = true
//!
//! [log]
//! filter = "logfac=debug"
//! ```
//!
//! Environment overrides use `__` between section and key, for example
//! `LOGFAC_FACILITY__CONF="backend logger x module a stderr"`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_SETTINGS: &str = r#"
[facility]
open_sinks = false

[log]
filter = "warn"
"#;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("cannot read facility configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Public settings types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub facility: FacilitySettings,
    #[serde(default)]
    pub log: LogSettings,
}

/// `[facility]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FacilitySettings {
    /// Inline configuration text.
    #[serde(default)]
    pub conf: Option<String>,
    /// File holding the configuration text, used when `conf` is unset.
    #[serde(default)]
    pub conf_file: Option<PathBuf>,
    /// Open every appender after building, so bad paths fail early.
    #[serde(default)]
    pub open_sinks: bool,
}

/// `[log]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String { "warn".to_string() }

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Settings {
    /// Load defaults, then `path` (if given, it must exist), then the
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_env(path, None)
    }

    /// Like [`Settings::load`], reading `LOGFAC_*` variables from `env`
    /// instead of the process environment when it is given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, SettingsError> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            DEFAULT_SETTINGS,
            config::FileFormat::Toml,
        ));
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix("LOGFAC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;
        tracing::debug!(?settings, "settings loaded");
        Ok(settings)
    }

    /// The built-in defaults without touching the filesystem or environment.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// The facility configuration text, if any was configured.
    pub fn configuration_text(&self) -> Result<Option<Vec<u8>>, SettingsError> {
        if let Some(conf) = &self.facility.conf {
            return Ok(Some(conf.clone().into_bytes()));
        }
        match &self.facility.conf_file {
            Some(path) => std::fs::read(path)
                .map(Some)
                .map_err(|source| SettingsError::Read {
                    path: path.clone(),
                    source,
                }),
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
