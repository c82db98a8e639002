//! Application configuration.
//!
//! Settings come from an optional TOML file overlaid with the environment:
//!
//! ```toml
//! source = "auto"            # auto | synthetic | remote
//!
//! [remote]
//! url = "https://project.example.co"
//! table = "salary_centiles"
//! timeout_secs = 10
//!
//! [weights.sexe]
//! femme = 0.85
//! ```
//!
//! The endpoint URL and access key are read from `PAYCENTILE_SOURCE_URL` and
//! `PAYCENTILE_SOURCE_KEY`; `PAYCENTILE_SOURCE` overrides the mode. The key is
//! never read from the file.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::warn;
use serde::Deserialize;
use thiserror::Error;

use crate::analyzer::WeightTable;
use crate::data::{
    DataError, DataSource, DistributionProvider, RemoteProvider, RemoteSettings,
    SyntheticProvider,
};
use crate::domain::{FilterCategory, UnknownCategory};

pub const ENV_SOURCE_URL: &str = "PAYCENTILE_SOURCE_URL";
pub const ENV_SOURCE_KEY: &str = "PAYCENTILE_SOURCE_KEY";
pub const ENV_SOURCE_MODE: &str = "PAYCENTILE_SOURCE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("remote source selected but {0} not set")]
    MissingVar(String),

    #[error("invalid source mode '{0}' (expected auto, synthetic or remote)")]
    InvalidMode(String),

    #[error("weights: {0}")]
    UnknownCategory(#[from] UnknownCategory),

    #[error("weight for {category}.{option} must be a finite positive number, got {weight}")]
    InvalidWeight {
        category: FilterCategory,
        option: String,
        weight: f64,
    },

    #[error("data source setup failed: {0}")]
    Provider(#[from] DataError),
}

/// Which provider to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Remote when both connection values are set, synthetic otherwise.
    #[default]
    Auto,
    Synthetic,
    Remote,
}

impl FromStr for SourceMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SourceMode::Auto),
            "synthetic" => Ok(SourceMode::Synthetic),
            "remote" => Ok(SourceMode::Remote),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceMode::Auto => "auto",
            SourceMode::Synthetic => "synthetic",
            SourceMode::Remote => "remote",
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    source: Option<SourceMode>,
    #[serde(default)]
    remote: FileRemote,
    #[serde(default)]
    weights: BTreeMap<String, BTreeMap<String, f64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileRemote {
    url: Option<String>,
    table: Option<String>,
    timeout_secs: Option<u64>,
}

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SourceMode,
    /// Present only when both the URL and the key are set.
    pub remote: Option<RemoteSettings>,
    /// Connection variables that were not set.
    pub missing: Vec<&'static str>,
    pub weights: WeightTable,
}

impl AppConfig {
    /// Load from an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_mode(path, None)
    }

    /// Like [`AppConfig::load`], with a source mode that takes precedence
    /// over `PAYCENTILE_SOURCE` and the file.
    pub fn load_with_mode(
        path: Option<&Path>,
        mode: Option<SourceMode>,
    ) -> Result<Self, ConfigError> {
        Self::load_from(path, mode, |key| std::env::var(key).ok())
    }

    /// Load from an optional file and an injected environment lookup.
    pub fn load_with(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Self::load_from(path, None, lookup)
    }

    /// Load with both the mode override and the environment lookup injected.
    pub fn load_from(
        path: Option<&Path>,
        mode: Option<SourceMode>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let content = match path {
            Some(p) => std::fs::read_to_string(p).map_err(|source| ConfigError::Io {
                path: p.to_path_buf(),
                source,
            })?,
            None => String::new(),
        };
        let file: FileConfig = toml::from_str(&content)?;
        Self::resolve(file, mode, lookup)
    }

    /// Parse TOML content and overlay the looked-up environment.
    pub fn from_toml_str(
        content: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(content)?;
        Self::resolve(file, None, lookup)
    }

    /// Environment only, no file.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::resolve(FileConfig::default(), None, lookup)
    }

    /// Mode precedence: explicit override, then `PAYCENTILE_SOURCE`, then the
    /// file. Requirements are checked once, against the winning mode.
    fn resolve(
        file: FileConfig,
        mode: Option<SourceMode>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source = match (mode, non_empty(ENV_SOURCE_MODE)) {
            (Some(mode), _) => mode,
            (None, Some(mode)) => mode.parse()?,
            (None, None) => file.source.unwrap_or_default(),
        };

        let url = non_empty(ENV_SOURCE_URL).or(file.remote.url);
        let key = non_empty(ENV_SOURCE_KEY);

        let mut missing = Vec::new();
        if url.is_none() {
            missing.push(ENV_SOURCE_URL);
        }
        if key.is_none() {
            missing.push(ENV_SOURCE_KEY);
        }

        let remote = match (url, key) {
            (Some(url), Some(key)) => {
                let mut settings = RemoteSettings::new(url, key);
                if let Some(table) = file.remote.table {
                    settings.table = table;
                }
                if let Some(secs) = file.remote.timeout_secs {
                    settings.timeout = Duration::from_secs(secs);
                }
                Some(settings)
            }
            _ => None,
        };

        let mut weights = WeightTable::default();
        weights.merge(&parse_weights(&file.weights)?);

        let config = Self {
            source,
            remote,
            missing,
            weights,
        };
        config.check_source()?;
        Ok(config)
    }

    /// Replace the source mode, re-checking that it can be satisfied.
    pub fn set_source(&mut self, source: SourceMode) -> Result<(), ConfigError> {
        self.source = source;
        self.check_source()
    }

    fn check_source(&self) -> Result<(), ConfigError> {
        if self.missing.is_empty() {
            return Ok(());
        }
        let names = self.missing.join(" and ");
        match self.source {
            SourceMode::Remote => Err(ConfigError::MissingVar(names)),
            SourceMode::Auto => {
                warn!("{names} not set; using the synthetic salary distribution");
                Ok(())
            }
            SourceMode::Synthetic => Ok(()),
        }
    }

    /// Where the base distribution will come from.
    pub fn effective_source(&self) -> DataSource {
        match (self.source, &self.remote) {
            (SourceMode::Synthetic, _) | (SourceMode::Auto, None) => DataSource::Synthetic,
            _ => DataSource::Remote,
        }
    }

    /// Build the provider selected by this configuration.
    pub fn build_provider(&self) -> Result<Box<dyn DistributionProvider>, ConfigError> {
        match (self.effective_source(), &self.remote) {
            (DataSource::Remote, Some(settings)) => {
                Ok(Box::new(RemoteProvider::new(settings.clone())?))
            }
            (DataSource::Remote, None) => {
                Err(ConfigError::MissingVar(self.missing.join(" and ")))
            }
            (DataSource::Synthetic, _) => Ok(Box::new(SyntheticProvider)),
        }
    }
}

fn parse_weights(
    raw: &BTreeMap<String, BTreeMap<String, f64>>,
) -> Result<WeightTable, ConfigError> {
    let mut table = WeightTable::neutral();
    for (category, options) in raw {
        let category: FilterCategory = category.parse()?;
        for (option, &weight) in options {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(ConfigError::InvalidWeight {
                    category,
                    option: option.clone(),
                    weight,
                });
            }
            table.set(category, option.clone(), weight);
        }
    }
    Ok(table)
}
