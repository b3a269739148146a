//! Command implementations for gradle-init CLI.
//!
//! This module contains the business logic for each CLI command:
//! - `context` - Resolve, optionally prompt for, and validate template variables
//! - `compile` - Compile a template into the cache
//! - `templates` - List templates and show their variables
//! - `config` - Show or initialize the config file

use crate::cli::ContextFlags;
use crate::config::{
    AppPaths, CliArgs, ConfigSources, ContextResolver, DEFAULT_CONFIG, EnvVars, ResolvedContext,
    TemplateEntry,
};
use crate::template::prompt::prompt_for_variables;
use crate::template::{CacheInfo, TemplateCompiler, VariableDescriptor, VariableRegistry, scan_tree};
use crate::{Error, Result};
use serde::Serialize;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

/// Locate a template and scan it into a fresh registry.
fn load_template(paths: &AppPaths, template: &str) -> Result<(PathBuf, VariableRegistry, usize)> {
    let config = paths.load_config()?;
    let dir = paths.find_template(template, &config)?;
    let mut registry = VariableRegistry::new();
    let files_scanned = scan_tree(&dir, &mut registry);
    Ok((dir, registry, files_scanned))
}

fn display_name(dir: &Path) -> String {
    crate::template::template_name(dir)
}

// === Templates Commands ===

#[derive(Serialize)]
pub struct TemplateList {
    pub count: usize,
    pub templates: Vec<TemplateEntry>,
}

impl Output for TemplateList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.templates.is_empty() {
            return "No templates found.".to_string();
        }
        let mut lines = vec![format!("{} template(s):", self.count)];
        for t in &self.templates {
            lines.push(format!("  {} ({})", t.name, t.origin.as_str()));
        }
        lines.join("\n")
    }
}

/// List available templates, custom first.
pub fn templates_list(paths: &AppPaths) -> Result<TemplateList> {
    let config = paths.load_config()?;
    let templates = paths.list_templates(&config);
    Ok(TemplateList {
        count: templates.len(),
        templates,
    })
}

#[derive(Serialize)]
pub struct TemplateInfo {
    pub name: String,
    pub path: PathBuf,
    pub files_scanned: usize,
    pub files: Vec<PathBuf>,
    pub variables: Vec<VariableDescriptor>,
}

impl Output for TemplateInfo {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Template: {}", self.name),
            format!("  Path: {}", self.path.display()),
            format!(
                "  Files: {} scanned, {} with placeholders",
                self.files_scanned,
                self.files.len()
            ),
        ];
        if self.variables.is_empty() {
            lines.push("  No variables.".to_string());
            return lines.join("\n");
        }
        lines.push(format!("  Variables ({}):", self.variables.len()));
        for v in &self.variables {
            let mut line = format!("    {}", v.name());
            if v.is_enhanced() {
                line.push_str(&format!(" - {} [order {}]", v.label(), v.sort_order()));
                if let Some(pattern) = v.pattern() {
                    line.push_str(&format!(" pattern: {}", pattern));
                }
                if let Some(default) = v.default_value() {
                    line.push_str(&format!(" default: {}", default));
                }
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

/// Show the variables a template declares, in prompt order.
pub fn templates_info(paths: &AppPaths, template: &str) -> Result<TemplateInfo> {
    let (dir, registry, files_scanned) = load_template(paths, template)?;
    Ok(TemplateInfo {
        name: display_name(&dir),
        files: registry.files().into_iter().map(Path::to_path_buf).collect(),
        variables: registry.get_sorted().into_iter().cloned().collect(),
        path: dir,
        files_scanned,
    })
}

// === Compile Command ===

#[derive(Serialize)]
pub struct CompileResult {
    pub template: String,
    pub compiled_dir: PathBuf,
    pub files_compiled: usize,
    pub compiled_at: f64,
    pub forced: bool,
}

impl Output for CompileResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Compiled {} ({} file(s)) into {}",
            self.template,
            self.files_compiled,
            self.compiled_dir.display()
        )
    }
}

/// Compile a template into the cache.
pub fn compile(paths: &AppPaths, template: &str, force: bool) -> Result<CompileResult> {
    let config = paths.load_config()?;
    let dir = paths.find_template(template, &config)?;
    let compiler = TemplateCompiler::new(&dir, Some(paths.cache_dir()));
    let compiled_dir = compiler.compile_tree(force)?;
    let info = CacheInfo::load(&compiled_dir)
        .ok_or_else(|| Error::Other("Cache manifest missing after compile".to_string()))?;
    Ok(CompileResult {
        template: compiler.template_name().to_string(),
        compiled_dir,
        files_compiled: info.files_compiled,
        compiled_at: info.compiled_at,
        forced: force,
    })
}

// === Context Command ===

/// Arguments of the `context` command.
#[derive(Debug, Clone, Default)]
pub struct ContextArgs {
    pub template: String,
    pub project_name: Option<String>,
    pub flags: ContextFlags,
    pub config: Vec<String>,
}

impl ContextArgs {
    /// CLI tier of the resolver: named flags then `--config` pairs.
    fn cli_args(&self) -> Result<CliArgs> {
        CliArgs::new()
            .with_flag("project_name", self.project_name.clone())
            .with_flag("group", self.flags.group.clone())
            .with_flag("version", self.flags.project_version.clone())
            .with_flag("gradle_version", self.flags.gradle_version.clone())
            .with_flag("kotlin_version", self.flags.kotlin_version.clone())
            .with_flag("jdk_version", self.flags.jdk_version.clone())
            .with_config_args(&self.config)
    }
}

#[derive(Serialize)]
pub struct ContextResult {
    pub template: String,
    pub variables: usize,
    pub context: ResolvedContext,
}

impl Output for ContextResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Context for {} ({} declared variable(s)):",
            self.template, self.variables
        )];
        for (key, entry) in self.context.iter() {
            lines.push(format!("  {} = {}  ({})", key, entry.value, entry.source));
        }
        lines.join("\n")
    }
}

/// Resolve and validate the render context of a template.
pub fn context(paths: &AppPaths, args: &ContextArgs, env: EnvVars) -> Result<ContextResult> {
    resolve_context(paths, args, env, None::<(&mut std::io::Empty, &mut std::io::Sink)>)
}

/// Like [`context`], prompting for each variable on `input`/`output` first.
pub fn context_interactive<R: BufRead, W: Write>(
    paths: &AppPaths,
    args: &ContextArgs,
    env: EnvVars,
    input: &mut R,
    output: &mut W,
) -> Result<ContextResult> {
    resolve_context(paths, args, env, Some((input, output)))
}

fn resolve_context<R: BufRead, W: Write>(
    paths: &AppPaths,
    args: &ContextArgs,
    env: EnvVars,
    prompt: Option<(&mut R, &mut W)>,
) -> Result<ContextResult> {
    let cli = args.cli_args()?;
    let (dir, registry, _) = load_template(paths, &args.template)?;
    let sources = ConfigSources {
        cli,
        env,
        persisted: paths.load_config()?,
    };

    let mut resolved = ContextResolver::new(&registry).resolve(&sources);
    if let Some((input, output)) = prompt {
        let changed = prompt_for_variables(&registry, &mut resolved, input, output)?;
        tracing::debug!("{} value(s) changed interactively", changed);
    }

    let errors = resolved.validate(&registry);
    if !errors.is_empty() {
        return Err(Error::Validation(errors));
    }

    Ok(ContextResult {
        template: display_name(&dir),
        variables: registry.len(),
        context: resolved,
    })
}

// === Config Commands ===

#[derive(Serialize)]
pub struct ConfigShow {
    pub path: PathBuf,
    pub exists: bool,
    pub content: String,
}

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut out = format!("# {}", self.path.display());
        if !self.exists {
            out.push_str(" (not created yet, showing defaults)");
        }
        out.push('\n');
        out.push_str(self.content.trim_end());
        out
    }
}

/// Show the persisted config, or the default document if none exists.
pub fn config_show(paths: &AppPaths) -> Result<ConfigShow> {
    let path = paths.config_file();
    let exists = path.is_file();
    let content = if exists {
        let content = fs::read_to_string(&path)?;
        crate::config::PersistedConfig::parse(&content)?;
        content
    } else {
        DEFAULT_CONFIG.to_string()
    };
    Ok(ConfigShow {
        path,
        exists,
        content,
    })
}

#[derive(Serialize)]
pub struct ConfigInit {
    pub path: PathBuf,
    pub created: bool,
}

impl Output for ConfigInit {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.created {
            format!("Wrote default config to {}", self.path.display())
        } else {
            format!(
                "Config already exists at {} (use --force to overwrite)",
                self.path.display()
            )
        }
    }
}

/// Create the home layout and write the default config.
pub fn config_init(paths: &AppPaths, force: bool) -> Result<ConfigInit> {
    let path = paths.config_file();
    let existed = path.exists();
    if existed && force {
        fs::remove_file(&path)?;
    }
    paths.ensure_structure()?;
    Ok(ConfigInit {
        path,
        created: !existed || force,
    })
}
