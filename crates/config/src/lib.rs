//! Layered configuration.
//!
//! Sources, from lowest to highest precedence:
//!
//! 1. built-in defaults,
//! 2. `config.toml`, `config.yaml` and `config.json` in the user's platform
//!    configuration directory (whichever exist),
//! 3. an explicit file passed on the command line,
//! 4. environment variables prefixed with `STACKS_`, with `__` separating
//!    nested keys (`STACKS_STORAGE__ROOT=/srv/stacks`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use stacks_catalog::{DEFAULT_LOAN_PERIOD, SWEEP_INTERVAL};
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "STACKS_";
const ENV_SEPARATOR: &str = "__";
const USER_FILES: [&str; 3] = ["config.toml", "config.yaml", "config.json"];

pub const DEFAULT_SLOT: &str = "library-books";
pub const DEFAULT_LOAN_DAYS: u32 = DEFAULT_LOAN_PERIOD.whole_days() as u32;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = SWEEP_INTERVAL.as_secs();

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding slot files. Defaults to the platform data directory.
    pub root: PathBuf,
    pub slot: String,
    /// Open the catalog without ever writing back.
    pub read_only: bool,
}
impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: project_dirs().map(|dirs| dirs.data_dir().to_path_buf()).unwrap_or_default(),
            slot: DEFAULT_SLOT.to_string(),
            read_only: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub loan_days: u32,
    pub sweep_interval_secs: u64,
}
impl Default for CatalogConfig {
    fn default() -> Self {
        Self { loan_days: DEFAULT_LOAN_DAYS, sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS }
    }
}
impl CatalogConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Config {
    /// Load from every source and validate.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = Self::from_figment(&figment(explicit)?)?;
        config.validate()?;
        Ok(config)
    }

    /// Extract without validating, for callers that apply overrides first.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        figment.extract().or_raise(|| ErrorKind::Extract)
    }

    pub fn validate(&self) -> Result<()> {
        let root = &self.storage.root;
        if root.as_os_str().is_empty() {
            exn::bail!(invalid("storage.root", "not set and no platform data directory is available"));
        }
        if !root.is_absolute() {
            exn::bail!(invalid("storage.root", format!("{} is not an absolute path", root.display())));
        }
        stacks_storage::validate_key(&self.storage.slot)
            .or_raise(|| invalid("storage.slot", format!("{:?} is not a valid slot name", self.storage.slot)))?;
        if self.catalog.loan_days == 0 {
            exn::bail!(invalid("catalog.loan_days", "must be at least one day"));
        }
        if self.catalog.sweep_interval_secs == 0 {
            exn::bail!(invalid("catalog.sweep_interval_secs", "must be at least one second"));
        }
        Ok(())
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ErrorKind {
    ErrorKind::InvalidValue { key, reason: reason.into() }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "stacks")
}

/// All configuration sources merged in precedence order.
pub fn figment(explicit: Option<&Path>) -> Result<Figment> {
    let user_dir = project_dirs().map(|dirs| dirs.config_dir().to_path_buf());
    layered(user_dir.as_deref(), explicit)
}

fn layered(user_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(dir) = user_dir {
        for name in USER_FILES {
            let path = dir.join(name);
            if path.is_file() {
                tracing::debug!(path = %path.display(), "Loading user configuration");
                figment = merge_file(figment, &path)?;
            }
        }
    }
    if let Some(path) = explicit {
        if !path.is_file() {
            exn::bail!(ErrorKind::MissingFile(path.to_path_buf()));
        }
        tracing::debug!(path = %path.display(), "Loading configuration file");
        figment = merge_file(figment, path)?;
    }
    Ok(figment.merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR)))
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    Ok(match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => figment.merge(Toml::file(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}
