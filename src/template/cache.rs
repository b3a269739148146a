//! Compiled template cache.
//!
//! Compiled content is stored at `<cache_root>/<cache_key>/<relative_path>`,
//! where the key is the template name plus a hash of its canonical path,
//! mirroring the template tree one file per source file. A cached file is
//! fresh iff its mtime is at least the source file's mtime; nothing else is
//! consulted. Every cache failure degrades to recompiling from source.

use crate::template::{cache_key, hints, is_scannable, template_name};
use crate::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the manifest written into a compiled template directory.
pub const CACHE_INFO_FILE: &str = ".cache_info.json";

/// Manifest describing the last whole-tree compilation of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheInfo {
    pub template_name: String,
    pub source_path: String,
    /// Seconds since the Unix epoch
    pub compiled_at: f64,
    pub files_compiled: usize,
}

impl CacheInfo {
    /// Load a manifest, or `None` if missing or unreadable.
    pub fn load(compiled_dir: &Path) -> Option<Self> {
        let content = fs::read_to_string(compiled_dir.join(CACHE_INFO_FILE)).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn save(&self, compiled_dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(compiled_dir.join(CACHE_INFO_FILE), json)?;
        Ok(())
    }
}

/// Produces render-ready content for the files of one template.
#[derive(Debug, Clone)]
pub struct TemplateCompiler {
    template_name: String,
    cache_key: String,
    template_dir: PathBuf,
    cache_root: Option<PathBuf>,
}

impl TemplateCompiler {
    /// Create a compiler named after the template directory.
    ///
    /// With `cache_root = None` every request compiles directly with no cache I/O.
    pub fn new(template_dir: impl Into<PathBuf>, cache_root: Option<PathBuf>) -> Self {
        let template_dir = template_dir.into();
        Self {
            template_name: template_name(&template_dir),
            cache_key: cache_key(&template_dir),
            template_dir,
            cache_root,
        }
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    /// Directory holding this template's compiled files, if caching is enabled.
    pub fn compiled_dir(&self) -> Option<PathBuf> {
        self.cache_root
            .as_ref()
            .map(|root| root.join(&self.cache_key))
    }

    fn relative_path<'a>(&self, source_file: &'a Path) -> Option<&'a Path> {
        match source_file.strip_prefix(&self.template_dir) {
            Ok(rel) => Some(rel),
            Err(_) if source_file.is_relative() => Some(source_file),
            Err(_) => None,
        }
    }

    fn source_path(&self, source_file: &Path) -> PathBuf {
        if source_file.is_relative() && !source_file.starts_with(&self.template_dir) {
            self.template_dir.join(source_file)
        } else {
            source_file.to_path_buf()
        }
    }

    /// Cache location for `source_file`, if caching is enabled and the file
    /// belongs to this template.
    pub fn cache_path(&self, source_file: &Path) -> Option<PathBuf> {
        let compiled_dir = self.compiled_dir()?;
        let rel = self.relative_path(source_file)?;
        Some(compiled_dir.join(rel))
    }

    /// Return the compiled content of `source_file`.
    ///
    /// Serves the cached copy when fresh, otherwise recompiles and rewrites
    /// the cache. Returns `None` only when the source itself cannot be read as
    /// UTF-8 text.
    pub fn get_compiled(&self, source_file: &Path) -> Option<String> {
        self.compile_file(source_file, false).map(|(content, _)| content)
    }

    /// Compile one file, reporting whether the cache was (re)written.
    fn compile_file(&self, source_file: &Path, force: bool) -> Option<(String, bool)> {
        let source = self.source_path(source_file);

        let Some(cache_path) = self.cache_path(source_file) else {
            return compile_source(&source).map(|c| (c, false));
        };

        if !force {
            if let Some(content) = read_fresh(&cache_path, &source) {
                tracing::debug!("cache hit: {}", cache_path.display());
                return Some((content, false));
            }
        }

        let compiled = compile_source(&source)?;
        tracing::debug!("compiled {} -> {}", source.display(), cache_path.display());
        match write_cache(&cache_path, compiled.as_bytes()) {
            Ok(()) => Some((compiled, true)),
            Err(e) => {
                tracing::warn!("failed to write cache {}: {}", cache_path.display(), e);
                Some((compiled, false))
            }
        }
    }

    /// Compile the whole template into its cache directory.
    ///
    /// Allow-listed text files go through the same freshness check as
    /// [`get_compiled`](Self::get_compiled); everything else is copied
    /// verbatim when missing or stale. `.git` is skipped. The manifest's
    /// `compiled_at` only moves when something was rewritten.
    pub fn compile_tree(&self, force: bool) -> Result<PathBuf> {
        let compiled_dir = self
            .compiled_dir()
            .ok_or_else(|| Error::Other("No compiled cache directory configured".to_string()))?;
        if !self.template_dir.is_dir() {
            return Err(Error::NotFound(format!(
                "Template directory not found: {}",
                self.template_dir.display()
            )));
        }
        fs::create_dir_all(&compiled_dir)?;

        let mut files_compiled = 0;
        let mut changed = false;

        let walker = WalkDir::new(&self.template_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git");

        for entry in walker.filter_map(|e| e.ok()) {
            let Ok(rel) = entry.path().strip_prefix(&self.template_dir) else {
                continue;
            };
            if rel.as_os_str().is_empty() {
                continue;
            }
            let target = compiled_dir.join(rel);

            if entry.file_type().is_dir() {
                if let Err(e) = fs::create_dir_all(&target) {
                    tracing::warn!("failed to create {}: {}", target.display(), e);
                }
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            if is_scannable(entry.path()) {
                if let Some((_, written)) = self.compile_file(entry.path(), force) {
                    files_compiled += 1;
                    changed |= written;
                    continue;
                }
            }

            // Binary or non-allow-listed file: copy as-is.
            if force || !is_fresh(&target, entry.path()) {
                match copy_verbatim(entry.path(), &target) {
                    Ok(()) => changed = true,
                    Err(e) => tracing::warn!("failed to copy {}: {}", entry.path().display(), e),
                }
            }
        }

        let previous = CacheInfo::load(&compiled_dir);
        let info = match previous {
            Some(info) if !changed && !force && info.files_compiled == files_compiled => info,
            _ => CacheInfo {
                template_name: self.template_name.clone(),
                source_path: self.template_dir.display().to_string(),
                compiled_at: Utc::now().timestamp_micros() as f64 / 1_000_000.0,
                files_compiled,
            },
        };
        if let Err(e) = info.save(&compiled_dir) {
            tracing::warn!("failed to write cache manifest: {}", e);
        }

        Ok(compiled_dir)
    }
}

fn compile_source(source: &Path) -> Option<String> {
    match fs::read(source).map(String::from_utf8) {
        Ok(Ok(content)) => Some(hints::compile(&content)),
        Ok(Err(_)) => {
            tracing::debug!("not UTF-8 text: {}", source.display());
            None
        }
        Err(e) => {
            tracing::debug!("cannot read {}: {}", source.display(), e);
            None
        }
    }
}

fn is_fresh(cached: &Path, source: &Path) -> bool {
    let mtime = |p: &Path| fs::metadata(p).and_then(|m| m.modified());
    match (mtime(cached), mtime(source)) {
        (Ok(cached), Ok(source)) => cached >= source,
        _ => false,
    }
}

fn read_fresh(cached: &Path, source: &Path) -> Option<String> {
    if !is_fresh(cached, source) {
        return None;
    }
    fs::read_to_string(cached).ok()
}

fn write_cache(path: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

fn copy_verbatim(source: &Path, target: &Path) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, target).map(|_| ())
}
