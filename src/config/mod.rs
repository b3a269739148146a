//! Configuration for gradle-init.
//!
//! ## config - User preferences
//!
//! Located at `~/.gradleInit/config` (or `$GRADLEINIT_HOME/config`), TOML with:
//! - `[templates]` - `custom_dir` override for the custom template directory
//! - `[defaults]` - values for well-known project variables
//! - `[custom]` - arbitrary user variables
//!
//! ## Precedence
//!
//! For render-context values: CLI > `GRADLE_INIT_*` env > `[defaults]` >
//! `[custom]` > template default > empty.
//!
//! Use the [`resolver`] module for unified precedence resolution.

pub mod paths;
pub mod resolver;
pub mod schema;

pub use paths::{AppPaths, HOME_ENV, TemplateEntry, TemplateOrigin};
pub use resolver::{
    COMPUTED_KEYS, CliArgs, ConfigSources, ContextEntry, ContextResolver, ContextValue,
    ENV_PREFIX, EnvVars, RenderContext, ResolvedContext, ValueSource, parse_config_pair,
};
pub use schema::{ConfigSection, DEFAULT_CONFIG, PersistedConfig};
