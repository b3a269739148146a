//! On-disk layout of the gradle-init home directory.
//!
//! ```text
//! ~/.gradleInit/
//!   config                 persisted TOML config
//!   templates/official/    templates fetched from the official repository
//!   templates/custom/      user templates (overridable via [templates] custom_dir)
//!   cache/compiled/        compiled template cache, one directory per template
//! ```

use crate::config::PersistedConfig;
use crate::config::schema::DEFAULT_CONFIG;
use crate::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that relocates the home directory.
///
/// Not under the `GRADLE_INIT_` prefix, so it never becomes a context key.
pub const HOME_ENV: &str = "GRADLEINIT_HOME";

/// Name of the home directory under the user's home.
pub const HOME_DIR_NAME: &str = ".gradleInit";

/// Where a template was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateOrigin {
    Official,
    Custom,
}

impl TemplateOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateOrigin::Official => "official",
            TemplateOrigin::Custom => "custom",
        }
    }
}

/// A template directory discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateEntry {
    pub name: String,
    pub origin: TemplateOrigin,
    pub path: PathBuf,
}

/// Resolved paths of the gradle-init home directory.
#[derive(Debug, Clone)]
pub struct AppPaths {
    base_dir: PathBuf,
}

impl AppPaths {
    /// Use an explicit base directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// `$GRADLEINIT_HOME` if set, else `~/.gradleInit`.
    pub fn from_env() -> Result<Self> {
        if let Ok(dir) = std::env::var(HOME_ENV) {
            if !dir.is_empty() {
                return Ok(Self::new(dir));
            }
        }
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Other("Could not determine home directory".to_string()))?;
        Ok(Self::new(home.join(HOME_DIR_NAME)))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.base_dir.join("templates")
    }

    pub fn official_templates_dir(&self) -> PathBuf {
        self.templates_dir().join("official")
    }

    /// Custom template directory, honouring `[templates] custom_dir`.
    pub fn custom_templates_dir(&self, config: &PersistedConfig) -> PathBuf {
        match &config.templates.custom_dir {
            Some(dir) => expand_home(Path::new(dir)),
            None => self.templates_dir().join("custom"),
        }
    }

    /// Root of the compiled template cache.
    pub fn cache_dir(&self) -> PathBuf {
        self.base_dir.join("cache").join("compiled")
    }

    /// Create the directory layout and a default config if none exists.
    pub fn ensure_structure(&self) -> Result<()> {
        fs::create_dir_all(self.official_templates_dir())?;
        fs::create_dir_all(self.templates_dir().join("custom"))?;
        fs::create_dir_all(self.cache_dir())?;
        let config_file = self.config_file();
        if !config_file.exists() {
            fs::write(&config_file, DEFAULT_CONFIG)?;
        }
        Ok(())
    }

    /// Load the persisted config (empty when missing).
    pub fn load_config(&self) -> Result<PersistedConfig> {
        PersistedConfig::load(&self.config_file())
    }

    /// All template directories, custom first, each group sorted by name.
    pub fn list_templates(&self, config: &PersistedConfig) -> Vec<TemplateEntry> {
        let mut entries = list_dirs(&self.custom_templates_dir(config), TemplateOrigin::Custom);
        entries.extend(list_dirs(
            &self.official_templates_dir(),
            TemplateOrigin::Official,
        ));
        entries
    }

    /// Resolve a template argument.
    ///
    /// An existing directory path is used as-is; otherwise the name is looked
    /// up in the custom and then the official template directory.
    pub fn find_template(&self, name_or_path: &str, config: &PersistedConfig) -> Result<PathBuf> {
        let direct = expand_home(Path::new(name_or_path));
        if direct.is_dir() {
            return Ok(direct);
        }
        for dir in [
            self.custom_templates_dir(config),
            self.official_templates_dir(),
        ] {
            let candidate = dir.join(name_or_path);
            if candidate.is_dir() {
                return Ok(candidate);
            }
        }
        Err(Error::NotFound(format!("Template not found: {}", name_or_path)))
    }
}

fn list_dirs(dir: &Path, origin: TemplateOrigin) -> Vec<TemplateEntry> {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut entries: Vec<TemplateEntry> = read_dir
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let name = e.file_name().to_str()?.to_string();
            if name.starts_with('.') {
                return None;
            }
            Some(TemplateEntry {
                name,
                origin,
                path: e.path(),
            })
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
