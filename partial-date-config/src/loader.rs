//! Layered configuration loading using Figment

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use partial_date::{ConfigStore, FormatSettings, FORMAT_CONFIG, SETTINGS_CONFIG};
use tracing::{debug, info, trace};

use crate::{
    discovery::{ConfigFile, ConfigFormat, FileDiscovery},
    error::ConfigError,
    types::{GlobalSettings, PartialDateConfig},
    ConfigResult,
};

/// Environment variable prefix. `PARTIAL_DATE_FORMAT__DATE_SEPARATOR=/`
/// sets `format.date_separator`.
pub const ENV_PREFIX: &str = "PARTIAL_DATE_";

/// Loads the `partial_date.settings` and `partial_date.format` objects.
///
/// Sources are merged in precedence order (later sources override earlier ones):
/// 1. Built-in defaults
/// 2. Configuration files, global then project
/// 3. `PARTIAL_DATE_` environment variables
///
/// Nothing is cached, so edits to the files are picked up on the next load.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    discovery: FileDiscovery,
    use_env: bool,
}

impl ConfigLoader {
    /// Loader over the standard global and project directories.
    pub fn new() -> Self {
        Self::with_discovery(FileDiscovery::standard())
    }

    pub fn with_discovery(discovery: FileDiscovery) -> Self {
        Self {
            discovery,
            use_env: true,
        }
    }

    /// Skip the environment layer.
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Load both configuration objects.
    pub fn load(&self) -> ConfigResult<PartialDateConfig> {
        let config: PartialDateConfig = self.build_figment().extract()?;
        info!(
            labels = config.settings.component_labels.len(),
            "loaded partial date configuration"
        );
        Ok(config)
    }

    pub fn load_settings(&self) -> ConfigResult<GlobalSettings> {
        Ok(self.build_figment().extract_inner("settings")?)
    }

    pub fn load_format(&self) -> ConfigResult<FormatSettings> {
        Ok(self.build_figment().extract_inner("format")?)
    }

    /// Load the configuration and write both objects into `store`.
    pub fn publish(&self, store: &dyn ConfigStore) -> ConfigResult<PartialDateConfig> {
        let config = self.load()?;
        store.save(SETTINGS_CONFIG, &to_value(SETTINGS_CONFIG, &config.settings)?)?;
        store.save(FORMAT_CONFIG, &to_value(FORMAT_CONFIG, &config.format)?)?;
        debug!("published partial date configuration to store");
        Ok(config)
    }

    fn build_figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(PartialDateConfig::default()));

        for file in self.discovery.discover_all() {
            trace!(path = %file.path.display(), format = ?file.format, "merging config file");
            figment = figment.merge(Self::file_provider(&file));
        }

        if self.use_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }
        figment
    }

    fn file_provider(file: &ConfigFile) -> Figment {
        let path = &file.path;
        match file.format {
            ConfigFormat::Toml => Figment::from(Toml::file(path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(path)),
            ConfigFormat::Json => Figment::from(Json::file(path)),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn to_value<T: serde::Serialize>(name: &str, value: &T) -> ConfigResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|source| ConfigError::InvalidValue {
        name: name.to_string(),
        source,
    })
}
