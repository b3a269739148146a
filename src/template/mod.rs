//! Template variable discovery, compilation and validation.
//!
//! - [`hints`] - scanner for the `{{ @@...@@name }}` micro-syntax
//! - [`registry`] - descriptors consolidated across a template tree
//! - [`cache`] - compiled (hint-free) template content, cached on disk
//! - [`validate`] - pattern checks for resolved values
//! - [`prompt`] - interactive re-prompting for values

pub mod cache;
pub mod hints;
pub mod prompt;
pub mod registry;
pub mod validate;

pub use cache::{CacheInfo, TemplateCompiler};
pub use hints::{compile, scan_tree};
pub use registry::{HintMeta, Location, Occurrence, VariableDescriptor, VariableRegistry};
pub use validate::{ValidationError, validate, validate_all};

use sha2::{Digest, Sha256};
use std::path::Path;

/// Extensions of files that may contain placeholders.
pub const SCANNABLE_EXTENSIONS: &[&str] = &[
    // source
    "kt", "kts", "java", "groovy", "scala",
    // build scripts
    "gradle",
    // config
    "properties", "toml", "yml", "yaml", "json", "xml", "conf", "cfg", "ini", "env",
    // markup
    "md", "txt", "html", "adoc",
    // shell scripts
    "sh", "bat", "cmd", "ps1",
];

/// Extensionless or dot-files that may contain placeholders.
pub const SCANNABLE_FILE_NAMES: &[&str] = &[
    ".gitignore",
    ".gitattributes",
    ".editorconfig",
    "editorconfig.template",
    "gradlew",
    "Dockerfile",
    "Makefile",
];

/// Whether `path` is on the text-file allow-list.
pub fn is_scannable(path: &Path) -> bool {
    let by_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| SCANNABLE_FILE_NAMES.contains(&n));
    if by_name {
        return true;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SCANNABLE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Display name of a template: the last path component.
pub fn template_name(template_dir: &Path) -> String {
    template_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "template".to_string())
}

/// Cache directory name for a template: `<name>-<hash>`.
///
/// The hash is the first 12 hex chars of the SHA-256 of the canonical
/// template path, so same-named templates in different locations get
/// separate caches. Paths that cannot be canonicalized hash as given.
pub fn cache_key(template_dir: &Path) -> String {
    let canonical = template_dir
        .canonicalize()
        .unwrap_or_else(|_| template_dir.to_path_buf());

    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string_lossy().as_bytes());
    let hash_hex = format!("{:x}", hasher.finalize());

    format!("{}-{}", template_name(template_dir), &hash_hex[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_scannable() {
        assert!(is_scannable(Path::new("build.gradle.kts")));
        assert!(is_scannable(Path::new("src/main/kotlin/Main.kt")));
        assert!(is_scannable(Path::new("gradle.properties")));
        assert!(is_scannable(Path::new("README.MD")));
        assert!(is_scannable(Path::new(".editorconfig")));
        assert!(is_scannable(Path::new("gradlew")));
        assert!(!is_scannable(Path::new("image.png")));
        assert!(!is_scannable(Path::new("gradle/wrapper/gradle-wrapper.jar")));
        assert!(!is_scannable(Path::new("LICENSE")));
    }

    #[test]
    fn test_template_name() {
        assert_eq!(template_name(Path::new("/tmp/templates/kotlin-single")), "kotlin-single");
    }

    #[test]
    fn test_cache_key_distinguishes_same_named_templates() {
        let a = cache_key(Path::new("/nonexistent/team-a/kotlin-single"));
        let b = cache_key(Path::new("/nonexistent/team-b/kotlin-single"));
        assert_ne!(a, b);
        assert!(a.starts_with("kotlin-single-"));
        assert_eq!(a.len(), "kotlin-single-".len() + 12);
        assert_eq!(a, cache_key(Path::new("/nonexistent/team-a/kotlin-single")));
    }
}
