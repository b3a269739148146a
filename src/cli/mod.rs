//! CLI argument definitions for gradle-init.

use clap::{Parser, Subcommand};

/// Version string with build metadata from `build.rs`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GRADLE_INIT_GIT_COMMIT"),
    ", built ",
    env!("GRADLE_INIT_BUILD_TIMESTAMP"),
    ")"
);

/// gradle-init - Gradle project scaffolding from annotated templates.
///
/// Templates reference variables as `{{ name }}` or, with prompt metadata,
/// `{{ @@[sort|][(pattern)|]help[=default]@@name }}`.
#[derive(Parser, Debug)]
#[command(name = "gradle-init")]
#[command(author, version, long_version = LONG_VERSION, about = "Resolve and validate template variables for Gradle project scaffolding", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Use <path> as the gradle-init home instead of ~/.gradleInit.
    /// Can also be set via GRADLEINIT_HOME environment variable.
    #[arg(long = "home", global = true, env = "GRADLEINIT_HOME")]
    pub home: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the render context for a template
    ///
    /// Values come from CLI flags, GRADLE_INIT_* environment variables,
    /// the config file and template defaults, in that order of precedence.
    /// Exits non-zero if any value fails its template pattern.
    Context {
        /// Template name or directory
        template: String,

        /// Project name (sets `project_name`)
        project_name: Option<String>,

        #[command(flatten)]
        flags: ContextFlags,

        /// Extra value as KEY=VALUE (repeatable; dotted keys become a_b)
        #[arg(long = "config", value_name = "KEY=VALUE")]
        config: Vec<String>,

        /// Prompt for every template variable before validating
        #[arg(short, long)]
        interactive: bool,
    },

    /// Compile a template into the cache, stripping hint metadata
    Compile {
        /// Template name or directory
        template: String,

        /// Recompile every file even if the cache is fresh
        #[arg(long)]
        force: bool,
    },

    /// Template discovery commands
    Templates {
        #[command(subcommand)]
        command: TemplatesCommands,
    },

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Named CLI flags for well-known project variables.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ContextFlags {
    /// Maven group ID (sets `group`)
    #[arg(long)]
    pub group: Option<String>,

    /// Project version (sets `version`)
    #[arg(long = "project-version")]
    pub project_version: Option<String>,

    /// Gradle wrapper version (sets `gradle_version`)
    #[arg(long)]
    pub gradle_version: Option<String>,

    /// Kotlin version (sets `kotlin_version`)
    #[arg(long)]
    pub kotlin_version: Option<String>,

    /// JDK version (sets `jdk_version`)
    #[arg(long)]
    pub jdk_version: Option<String>,
}

/// Template subcommands
#[derive(Subcommand, Debug)]
pub enum TemplatesCommands {
    /// List available templates
    List,

    /// Show the variables a template declares
    Info {
        /// Template name or directory
        template: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the config file (or the default document if none exists)
    Show,

    /// Write the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
