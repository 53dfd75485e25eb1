//! Configuration file discovery
//!
//! Looks for `partial_date.{toml,yaml,yml,json}` in a global and a project
//! directory. Project files override global ones when merged.

use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// `partial_date.toml`, `partial_date.yaml`, ...
pub const CONFIG_FILE_STEM: &str = "partial_date";

/// Per-project directory, resolved against the working directory.
pub const PROJECT_DIR_NAME: &str = ".partial_date";

/// Layer a file belongs to. Later layers win, so the derived ordering is
/// also the merge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigScope {
    Global,
    Project,
}

/// Syntax of a configuration file, which picks the figment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Every extension searched for, in lookup order within one directory.
    pub const EXTENSIONS: [&'static str; 4] = ["toml", "yaml", "yml", "json"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(path.extension()?.to_str()?)
    }
}

/// A `partial_date.*` file found on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub format: ConfigFormat,
    pub scope: ConfigScope,
}

/// Finds configuration files in the global and project directories
#[derive(Debug, Clone, Default)]
pub struct FileDiscovery {
    global_dir: Option<PathBuf>,
    project_dir: Option<PathBuf>,
}

impl FileDiscovery {
    /// Discovery over the standard directories, resolved now.
    pub fn standard() -> Self {
        Self {
            global_dir: Self::resolve_global_dir(),
            project_dir: Self::resolve_project_dir(),
        }
    }

    /// Discovery over explicit directories. Either may be omitted.
    pub fn with_directories(global_dir: Option<PathBuf>, project_dir: Option<PathBuf>) -> Self {
        Self {
            global_dir,
            project_dir,
        }
    }

    /// Every file found, global ones first.
    pub fn discover_all(&self) -> Vec<ConfigFile> {
        let mut files = Vec::new();
        if let Some(dir) = &self.global_dir {
            files.extend(self.search_directory(dir, ConfigScope::Global));
        }
        if let Some(dir) = &self.project_dir {
            files.extend(self.search_directory(dir, ConfigScope::Project));
        }
        // stable, so lookup order survives within a scope
        files.sort_by_key(|f| f.scope);

        debug!(count = files.len(), "discovered partial date configuration files");
        for file in &files {
            trace!(path = %file.path.display(), format = ?file.format, "found config");
        }
        files
    }

    fn search_directory(&self, dir: &Path, scope: ConfigScope) -> Vec<ConfigFile> {
        if !dir.exists() {
            debug!(dir = %dir.display(), "configuration directory does not exist");
            return Vec::new();
        }
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "configuration path is not a directory");
            return Vec::new();
        }

        ConfigFormat::EXTENSIONS
            .into_iter()
            .map(|ext| dir.join(format!("{CONFIG_FILE_STEM}.{ext}")))
            .filter(|candidate| candidate.is_file())
            .filter_map(|path| {
                let format = ConfigFormat::from_path(&path)?;
                Some(ConfigFile { path, format, scope })
            })
            .collect()
    }

    fn resolve_global_dir() -> Option<PathBuf> {
        let dir = dirs::config_dir()?.join(CONFIG_FILE_STEM);
        dir.is_dir().then_some(dir)
    }

    fn resolve_project_dir() -> Option<PathBuf> {
        let dir = std::env::current_dir().ok()?.join(PROJECT_DIR_NAME);
        dir.is_dir().then_some(dir)
    }
}
