//! Layered settings: built-in defaults, `property-desk.toml` in the working
//! directory, explicit files, then `PROPERTY_DESK__*` environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, ensure, Result};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "property-desk.toml";
pub const ENV_PREFIX: &str = "PROPERTY_DESK";

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    Rest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub backend: Backend,
    /// JSON array of full listing documents, ids and timestamps included,
    /// loaded into the memory backend
    pub seed_file: Option<PathBuf>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FallbackSettings {
    /// Substitute sample listings when live data is empty or refused
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactSettings {
    pub whatsapp_number: String,
    pub consultant_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub store: StoreSettings,
    pub fallback: FallbackSettings,
    pub contact: ContactSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Load settings. `files` are required; the default file is optional and
    /// skipped entirely when `use_default_file` is false.
    pub fn load(files: &[PathBuf], use_default_file: bool) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("store.backend", "memory")?
            .set_default("store.timeout_secs", 30)?
            .set_default("fallback.enabled", true)?
            .set_default("contact.whatsapp_number", "919881199152")?
            .set_default("contact.consultant_name", "Charushila")?
            .set_default("log.level", "info")?;

        if use_default_file {
            if let Ok(dir) = env::current_dir() {
                builder = builder.add_source(File::from(dir.join(DEFAULT_CONFIG_FILE)).required(false));
            }
        }

        for path in files {
            builder = builder.add_source(File::from(path.clone()).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(|err| match err {
            ConfigError::Frozen => anyhow!("configuration builder is frozen"),
            other => other.into(),
        })?;
        let settings: Settings = config
            .try_deserialize()
            .map_err(|err| anyhow!("failed to deserialize configuration: {err}"))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.store.timeout_secs > 0, "store.timeout_secs must be greater than zero");
        if self.store.backend == Backend::Rest {
            ensure!(
                self.store.base_url.as_deref().is_some_and(|u| !u.trim().is_empty()),
                "store.base_url is required for the rest backend"
            );
        }
        ensure!(
            !self.contact.whatsapp_number.trim().is_empty(),
            "contact.whatsapp_number must not be empty"
        );
        Ok(())
    }
}
