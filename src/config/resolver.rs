//! Render-context resolution with a fixed precedence law.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI: named flags, then repeatable `--config KEY=VALUE` pairs
//! 2. Environment variables prefixed with `GRADLE_INIT_`
//! 3. Persisted config: `[defaults]`, then `[custom]` for keys absent from `[defaults]`
//! 4. Template-declared default of the matching variable
//! 5. Empty string, for declared variables nothing else supplies
//!
//! The computed keys `timestamp`, `year` and `date` are injected last and
//! cannot be overridden.

use crate::config::schema::{ConfigSection, PersistedConfig};
use crate::template::registry::VariableRegistry;
use crate::template::validate::{ValidationError, validate_all};
use crate::{Error, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Prefix of environment variables that feed the render context.
pub const ENV_PREFIX: &str = "GRADLE_INIT_";

/// Keys injected after all sources and never overridable.
pub const COMPUTED_KEYS: &[&str] = &["timestamp", "year", "date"];

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Named CLI flag (e.g. `--group`)
    CliFlag,
    /// `--config KEY=VALUE`
    CliConfig,
    /// Environment variable
    EnvVar(String),
    /// Persisted config file section
    Config(ConfigSection),
    /// Default declared in the template hint
    TemplateDefault,
    /// Answer typed at an interactive prompt
    Prompt,
    /// Declared variable with no value from any source
    Empty,
    /// Injected date/time value
    Computed,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::CliConfig => write!(f, "cli:config"),
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::Config(section) => write!(f, "config:{}", section),
            ValueSource::TemplateDefault => write!(f, "template-default"),
            ValueSource::Prompt => write!(f, "prompt"),
            ValueSource::Empty => write!(f, "empty"),
            ValueSource::Computed => write!(f, "computed"),
        }
    }
}

impl Serialize for ValueSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A render-context value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    String(String),
    Bool(bool),
    Int(i64),
    List(Vec<String>),
}

impl ContextValue {
    /// Typed coercion applied to `--config` and environment values.
    ///
    /// - `true`/`yes`/`1` and `false`/`no`/`0` (any case) become booleans
    /// - base-10 integers become `Int`
    /// - anything containing a comma becomes a trimmed list
    /// - everything else stays a string
    pub fn coerce(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => return ContextValue::Bool(true),
            "false" | "no" | "0" => return ContextValue::Bool(false),
            _ => {}
        }
        if let Ok(n) = raw.trim().parse::<i64>() {
            return ContextValue::Int(n);
        }
        if raw.contains(',') {
            return ContextValue::List(raw.split(',').map(|s| s.trim().to_string()).collect());
        }
        ContextValue::String(raw.to_string())
    }

    /// Convert a TOML value from the persisted config.
    pub fn from_toml(value: &toml::Value) -> Self {
        match value {
            toml::Value::String(s) => ContextValue::String(s.clone()),
            toml::Value::Boolean(b) => ContextValue::Bool(*b),
            toml::Value::Integer(n) => ContextValue::Int(*n),
            toml::Value::Array(items) => ContextValue::List(
                items
                    .iter()
                    .map(|item| match item {
                        toml::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            other => ContextValue::String(other.to_string()),
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::String(s) => write!(f, "{}", s),
            ContextValue::Bool(b) => write!(f, "{}", b),
            ContextValue::Int(n) => write!(f, "{}", n),
            ContextValue::List(items) => write!(f, "{}", items.join(",")),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::String(s.to_string())
    }
}

/// A resolved value with its source and the text it was supplied as.
///
/// `raw` is what pattern validation sees, so `--config flag=1` still
/// satisfies a `0|1` pattern after coercion to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextEntry {
    pub value: ContextValue,
    pub raw: String,
    pub source: ValueSource,
}

impl ContextEntry {
    pub fn new(value: ContextValue, raw: impl Into<String>, source: ValueSource) -> Self {
        Self {
            value,
            raw: raw.into(),
            source,
        }
    }

    /// A string value whose raw text is itself.
    pub fn text(value: impl Into<String>, source: ValueSource) -> Self {
        let value = value.into();
        Self::new(ContextValue::String(value.clone()), value, source)
    }

    fn coerced(raw: &str, source: ValueSource) -> Self {
        Self::new(ContextValue::coerce(raw), raw, source)
    }
}

/// Final key -> value map handed to the renderer.
pub type RenderContext = BTreeMap<String, ContextValue>;

/// Split a `KEY=VALUE` argument, flattening dotted keys (`a.b` -> `a_b`).
pub fn parse_config_pair(arg: &str) -> Result<(String, String)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| Error::InvalidInput(format!("Expected KEY=VALUE, got: {}", arg)))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::InvalidInput(format!("Empty key in: {}", arg)));
    }
    Ok((key.split('.').collect::<Vec<_>>().join("_"), value.to_string()))
}

/// CLI-tier values: explicit flags plus `--config` pairs.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    flags: Vec<(String, String)>,
    config_pairs: Vec<(String, String)>,
}

impl CliArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a named flag. `None` (flag not given) records nothing.
    pub fn with_flag(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.flags.push((key.into(), value.into()));
        }
        self
    }

    /// Record a `--config` pair (key already flattened).
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_pairs.push((key.into(), value.into()));
        self
    }

    /// Record raw `KEY=VALUE` arguments.
    pub fn with_config_args<S: AsRef<str>>(mut self, args: &[S]) -> Result<Self> {
        for arg in args {
            let (key, value) = parse_config_pair(arg.as_ref())?;
            self.config_pairs.push((key, value));
        }
        Ok(self)
    }

    /// Effective CLI values; `--config` pairs are applied after named flags.
    pub fn entries(&self) -> BTreeMap<String, ContextEntry> {
        let mut entries = BTreeMap::new();
        for (key, value) in &self.flags {
            entries.insert(key.clone(), ContextEntry::text(value.clone(), ValueSource::CliFlag));
        }
        for (key, value) in &self.config_pairs {
            entries.insert(key.clone(), ContextEntry::coerced(value, ValueSource::CliConfig));
        }
        entries
    }
}

/// The prefixed subset of the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    /// context key -> (variable name, value)
    vars: BTreeMap<String, (String, String)>,
}

impl EnvVars {
    /// Capture `GRADLE_INIT_*` from the process environment.
    pub fn from_process() -> Self {
        Self::from_pairs(std::env::vars())
    }

    /// Build from arbitrary name/value pairs, keeping only prefixed names.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut vars = BTreeMap::new();
        for (name, value) in pairs {
            let name = name.into();
            let Some(rest) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            vars.insert(rest.to_lowercase(), (name.clone(), value.into()));
        }
        Self { vars }
    }

    fn entries(&self) -> impl Iterator<Item = (&String, ContextEntry)> {
        self.vars.iter().map(|(key, (name, value))| {
            (key, ContextEntry::coerced(value, ValueSource::EnvVar(name.clone())))
        })
    }
}

/// All inputs to context resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub cli: CliArgs,
    pub env: EnvVars,
    pub persisted: PersistedConfig,
}

/// Resolved render context with per-key source tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedContext {
    entries: BTreeMap<String, ContextEntry>,
}

impl ResolvedContext {
    pub fn get(&self, key: &str) -> Option<&ContextEntry> {
        self.entries.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&ContextValue> {
        self.entries.get(key).map(|e| &e.value)
    }

    pub fn source(&self, key: &str) -> Option<&ValueSource> {
        self.entries.get(key).map(|e| &e.source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ContextEntry)> {
        self.entries.iter()
    }

    /// Replace a value with an interactive answer. Computed keys are left alone.
    pub fn set_answer(&mut self, key: &str, answer: &str) {
        if COMPUTED_KEYS.contains(&key) {
            return;
        }
        self.entries
            .insert(key.to_string(), ContextEntry::text(answer, ValueSource::Prompt));
    }

    /// The text each value was supplied as, for pattern validation.
    pub fn raw_values(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(k, e)| (k.clone(), e.raw.clone()))
            .collect()
    }

    /// Validate every declared variable, collecting all violations.
    pub fn validate(&self, registry: &VariableRegistry) -> Vec<ValidationError> {
        validate_all(&self.raw_values(), registry.get_sorted())
    }

    /// Plain key -> value map for the renderer.
    pub fn to_render_context(&self) -> RenderContext {
        self.entries
            .iter()
            .map(|(k, e)| (k.clone(), e.value.clone()))
            .collect()
    }
}

/// Merges all configuration sources into a render context.
pub struct ContextResolver<'a> {
    registry: &'a VariableRegistry,
}

impl<'a> ContextResolver<'a> {
    pub fn new(registry: &'a VariableRegistry) -> Self {
        Self { registry }
    }

    /// Resolve using the current local time for computed keys.
    pub fn resolve(&self, sources: &ConfigSources) -> ResolvedContext {
        self.resolve_at(sources, Local::now())
    }

    /// Resolve with an explicit clock.
    ///
    /// Sources are layered lowest-first so each tier overwrites the ones below.
    pub fn resolve_at(&self, sources: &ConfigSources, now: DateTime<Local>) -> ResolvedContext {
        let mut entries: BTreeMap<String, ContextEntry> = BTreeMap::new();

        for descriptor in self.registry.iter() {
            let entry = match descriptor.default_value() {
                Some(default) => ContextEntry::text(default, ValueSource::TemplateDefault),
                None => ContextEntry::text("", ValueSource::Empty),
            };
            entries.insert(descriptor.name().to_string(), entry);
        }

        for (key, (value, section)) in sources.persisted.merged() {
            let context_value = ContextValue::from_toml(value);
            let raw = context_value.to_string();
            entries.insert(
                key.to_string(),
                ContextEntry::new(context_value, raw, ValueSource::Config(section)),
            );
        }

        for (key, entry) in sources.env.entries() {
            entries.insert(key.clone(), entry);
        }

        entries.extend(sources.cli.entries());

        for (key, value) in computed_values(now) {
            entries.insert(key.to_string(), ContextEntry::text(value, ValueSource::Computed));
        }

        ResolvedContext { entries }
    }
}

fn computed_values(now: DateTime<Local>) -> [(&'static str, String); 3] {
    [
        ("timestamp", now.format("%Y-%m-%d %H:%M:%S").to_string()),
        ("year", now.format("%Y").to_string()),
        ("date", now.format("%Y-%m-%d").to_string()),
    ]
}
