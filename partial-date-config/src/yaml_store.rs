//! [`ConfigStore`] backed by a directory of YAML files.
//!
//! Each configuration object lives in `<dir>/<name>.yaml`, e.g.
//! `partial_date.settings.yaml`. Writes go through a temporary file and a
//! rename so readers never see a half-written object.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use partial_date::{ConfigStore, PartialDateError};
use serde_json::Value;
use tracing::{debug, trace};
use ulid::Ulid;

use crate::error::ConfigError;
use crate::ConfigResult;

#[derive(Debug, Clone)]
pub struct YamlConfigStore {
    root: PathBuf,
}

impl YamlConfigStore {
    /// Store rooted at `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `name`.
    pub fn path_for(&self, name: &str) -> ConfigResult<PathBuf> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(ConfigError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.root.join(format!("{name}.yaml")))
    }

    fn read(&self, name: &str) -> ConfigResult<Option<Value>> {
        let path = self.path_for(name)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigError::file_access(path, e)),
        };
        let value = serde_yaml_ng::from_str(&text).map_err(|e| ConfigError::yaml(&path, e))?;
        trace!(path = %path.display(), "read configuration object");
        Ok(Some(value))
    }

    fn write(&self, name: &str, value: &Value) -> ConfigResult<()> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.root).map_err(|e| ConfigError::file_access(&self.root, e))?;
        let yaml = serde_yaml_ng::to_string(value).map_err(|e| ConfigError::yaml(&path, e))?;
        atomic_write(&path, yaml.as_bytes())?;
        debug!(path = %path.display(), "saved configuration object");
        Ok(())
    }

    fn remove(&self, name: &str) -> ConfigResult<bool> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ConfigError::file_access(path, e)),
        }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self, name: &str) -> partial_date::Result<Option<Value>> {
        self.read(name).map_err(PartialDateError::from)
    }

    fn save(&self, name: &str, value: &Value) -> partial_date::Result<()> {
        self.write(name, value).map_err(PartialDateError::from)
    }

    fn delete(&self, name: &str) -> partial_date::Result<bool> {
        self.remove(name).map_err(PartialDateError::from)
    }
}

/// Write to a sibling temp file, then rename over `path`.
fn atomic_write(path: &Path, data: &[u8]) -> ConfigResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    fs::write(&tmp, data).map_err(|e| ConfigError::file_access(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(ConfigError::file_access(path, e));
    }
    Ok(())
}
