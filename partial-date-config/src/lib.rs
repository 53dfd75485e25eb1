//! # Partial Date Configuration
//!
//! Loads the module-wide `partial_date.settings` and `partial_date.format`
//! objects from layered sources using [figment](https://docs.rs/figment),
//! and persists them in a directory of YAML files.
//!
//! ## Precedence
//!
//! 1. Built-in defaults
//! 2. Global file: `<user config dir>/partial_date/partial_date.{toml,yaml,yml,json}`
//! 3. Project file: `./.partial_date/partial_date.{toml,yaml,yml,json}`
//! 4. Environment variables: `PARTIAL_DATE_SETTINGS__...`, `PARTIAL_DATE_FORMAT__...`
//!
//! ## Usage
//!
//! ```no_run
//! use partial_date::PartialDateField;
//! use partial_date_config::{ConfigLoader, YamlConfigStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = YamlConfigStore::new("/var/lib/app/config");
//! let config = ConfigLoader::new().publish(&store)?;
//! let field = PartialDateField::new(config.settings.field_defaults.clone());
//!
//! // Removing the field type removes its configuration objects again
//! field.delete(&store)?;
//! # Ok(())
//! # }
//! ```

pub mod discovery;
pub mod error;
pub mod loader;
pub mod types;
pub mod yaml_store;

pub use discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery};
pub use error::ConfigError;
pub use loader::{ConfigLoader, ENV_PREFIX};
pub use types::{GlobalSettings, PartialDateConfig};
pub use yaml_store::YamlConfigStore;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
