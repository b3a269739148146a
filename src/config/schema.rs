//! TOML schema for the persisted `config` file.
//!
//! ```toml
//! [templates]
//! custom_dir = "~/my-templates"   # optional
//!
//! [defaults]
//! group = "com.example"
//! jdk_version = "21"
//!
//! [custom]
//! author = "Jane Doe"
//! ```
//!
//! `[defaults]` and `[custom]` are free-form key/value tables that feed the
//! render context. On a key present in both, `[defaults]` wins.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Document written by `config init` when no config exists.
pub const DEFAULT_CONFIG: &str = r#"# gradle-init configuration

[templates]
# Directory searched for custom templates (defaults to ~/.gradleInit/templates/custom)
# custom_dir = "~/my-templates"

[defaults]
group = "com.example"
version = "0.1.0-SNAPSHOT"
gradle_version = "8.14.3"
kotlin_version = "2.2.20"
jdk_version = "21"

[custom]
# author = "Your Name"
# email = "you@example.com"
"#;

/// Which table of the config file a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Defaults,
    Custom,
}

impl ConfigSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSection::Defaults => "defaults",
            ConfigSection::Custom => "custom",
        }
    }
}

impl std::fmt::Display for ConfigSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `[templates]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatesSection {
    /// Override for the custom template directory (`~` is expanded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_dir: Option<String>,
}

/// Parsed contents of the persisted config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedConfig {
    #[serde(default)]
    pub templates: TemplatesSection,

    #[serde(default)]
    pub defaults: BTreeMap<String, toml::Value>,

    #[serde(default)]
    pub custom: BTreeMap<String, toml::Value>,
}

impl PersistedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config document.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from disk. A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Serialize and write to disk, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Look up a key: `[defaults]` first, then `[custom]`.
    pub fn get(&self, key: &str) -> Option<(&toml::Value, ConfigSection)> {
        self.defaults
            .get(key)
            .map(|v| (v, ConfigSection::Defaults))
            .or_else(|| self.custom.get(key).map(|v| (v, ConfigSection::Custom)))
    }

    /// Every key across both tables with its winning value.
    pub fn merged(&self) -> BTreeMap<&str, (&toml::Value, ConfigSection)> {
        let mut merged = BTreeMap::new();
        for (key, value) in &self.defaults {
            merged.insert(key.as_str(), (value, ConfigSection::Defaults));
        }
        for (key, value) in &self.custom {
            merged
                .entry(key.as_str())
                .or_insert((value, ConfigSection::Custom));
        }
        merged
    }
}
