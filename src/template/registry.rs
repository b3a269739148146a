//! Variable descriptors and the per-invocation registry that consolidates them.
//!
//! A template tree references the same variable from many files. The first
//! occurrence creates the descriptor; later ones only append locations, with
//! one exception: an enhanced occurrence upgrades a plain descriptor. The
//! upgrade is one-way, so a descriptor never loses its metadata.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Sort order used for variables that carry no explicit ordering.
pub const DEFAULT_SORT_ORDER: u32 = 999;

/// Authoring metadata carried by an enhanced placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HintMeta {
    /// Prompt text shown to the user
    pub help: String,

    /// Position in prompt order (lower first)
    pub sort_order: u32,

    /// Regex alternation the value must fully match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Value used when no other source supplies one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Whether a variable has been seen with metadata yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintState {
    /// Only bare `{{ name }}` references so far
    Plain,
    /// At least one `{{ @@...@@name }}` reference
    Enhanced(HintMeta),
}

/// A single place where a variable is referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: PathBuf,
    /// 1-based line number
    pub line: usize,
}

/// One occurrence of a variable as produced by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub name: String,
    /// `None` for a plain placeholder
    pub meta: Option<HintMeta>,
    pub location: Location,
}

/// Structured record of one discovered template variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDescriptor {
    name: String,
    state: HintState,
    locations: Vec<Location>,
}

impl VariableDescriptor {
    /// Create a plain descriptor with no known locations.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: HintState::Plain,
            locations: Vec::new(),
        }
    }

    /// Create an enhanced descriptor with no known locations.
    pub fn enhanced(name: impl Into<String>, meta: HintMeta) -> Self {
        Self {
            name: name.into(),
            state: HintState::Enhanced(meta),
            locations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn is_enhanced(&self) -> bool {
        matches!(self.state, HintState::Enhanced(_))
    }

    /// Help text; empty for plain descriptors.
    pub fn help(&self) -> &str {
        match &self.state {
            HintState::Plain => "",
            HintState::Enhanced(meta) => &meta.help,
        }
    }

    pub fn sort_order(&self) -> u32 {
        match &self.state {
            HintState::Plain => DEFAULT_SORT_ORDER,
            HintState::Enhanced(meta) => meta.sort_order,
        }
    }

    pub fn pattern(&self) -> Option<&str> {
        match &self.state {
            HintState::Plain => None,
            HintState::Enhanced(meta) => meta.pattern.as_deref(),
        }
    }

    pub fn default_value(&self) -> Option<&str> {
        match &self.state {
            HintState::Plain => None,
            HintState::Enhanced(meta) => meta.default.as_deref(),
        }
    }

    /// Prompt label: the help text, or the variable name when there is none.
    pub fn label(&self) -> &str {
        let help = self.help();
        if help.is_empty() { &self.name } else { help }
    }

    /// Apply a later occurrence of the same variable.
    ///
    /// Plain -> Enhanced is the only state transition.
    fn absorb(&mut self, meta: Option<HintMeta>, location: Location) {
        if let Some(meta) = meta {
            if self.state == HintState::Plain {
                self.state = HintState::Enhanced(meta);
            }
        }
        self.locations.push(location);
    }
}

impl Serialize for VariableDescriptor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("VariableDescriptor", 7)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("help", self.help())?;
        s.serialize_field("sort_order", &self.sort_order())?;
        s.serialize_field("pattern", &self.pattern())?;
        s.serialize_field("default", &self.default_value())?;
        s.serialize_field("enhanced", &self.is_enhanced())?;
        s.serialize_field("locations", &self.locations)?;
        s.end()
    }
}

/// Deduplicating collection of descriptors for one template.
///
/// Built from scratch on every invocation and passed explicitly to the
/// resolver and commands.
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    variables: BTreeMap<String, VariableDescriptor>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one scanned occurrence into the registry.
    pub fn record(&mut self, occurrence: Occurrence) {
        let Occurrence {
            name,
            meta,
            location,
        } = occurrence;

        match self.variables.get_mut(&name) {
            Some(existing) => existing.absorb(meta, location),
            None => {
                let mut descriptor = match meta {
                    Some(meta) => VariableDescriptor::enhanced(name.clone(), meta),
                    None => VariableDescriptor::plain(name.clone()),
                };
                descriptor.locations.push(location);
                self.variables.insert(name, descriptor);
            }
        }
    }

    /// Merge every occurrence from an iterator, in order.
    pub fn record_all(&mut self, occurrences: impl IntoIterator<Item = Occurrence>) {
        for occurrence in occurrences {
            self.record(occurrence);
        }
    }

    pub fn get(&self, name: &str) -> Option<&VariableDescriptor> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterate descriptors in name order.
    pub fn iter(&self) -> impl Iterator<Item = &VariableDescriptor> {
        self.variables.values()
    }

    /// Descriptors ordered by `(sort_order, name)`.
    pub fn get_sorted(&self) -> Vec<&VariableDescriptor> {
        let mut sorted: Vec<&VariableDescriptor> = self.variables.values().collect();
        sorted.sort_by(|a, b| {
            a.sort_order()
                .cmp(&b.sort_order())
                .then_with(|| a.name.cmp(&b.name))
        });
        sorted
    }

    /// All files that reference at least one variable.
    pub fn files(&self) -> Vec<&Path> {
        let mut files: Vec<&Path> = self
            .variables
            .values()
            .flat_map(|d| d.locations.iter().map(|l| l.file.as_path()))
            .collect();
        files.sort();
        files.dedup();
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(file: &str, line: usize) -> Location {
        Location {
            file: PathBuf::from(file),
            line,
        }
    }

    fn plain(name: &str, file: &str, line: usize) -> Occurrence {
        Occurrence {
            name: name.to_string(),
            meta: None,
            location: at(file, line),
        }
    }

    fn enhanced(name: &str, help: &str, sort_order: u32, file: &str, line: usize) -> Occurrence {
        Occurrence {
            name: name.to_string(),
            meta: Some(HintMeta {
                help: help.to_string(),
                sort_order,
                pattern: None,
                default: Some("x".to_string()),
            }),
            location: at(file, line),
        }
    }

    #[test]
    fn test_first_occurrence_creates_descriptor() {
        let mut registry = VariableRegistry::new();
        registry.record(plain("group", "build.gradle.kts", 3));

        let group = registry.get("group").unwrap();
        assert!(!group.is_enhanced());
        assert_eq!(group.sort_order(), DEFAULT_SORT_ORDER);
        assert_eq!(group.help(), "");
        assert_eq!(group.locations(), &[at("build.gradle.kts", 3)]);
    }

    #[test]
    fn test_enhanced_upgrades_plain() {
        let mut registry = VariableRegistry::new();
        registry.record(plain("group", "settings.gradle.kts", 1));
        registry.record(enhanced("group", "Maven group", 1, "build.gradle.kts", 2));

        let group = registry.get("group").unwrap();
        assert!(group.is_enhanced());
        assert_eq!(group.help(), "Maven group");
        assert_eq!(group.sort_order(), 1);
        assert_eq!(group.default_value(), Some("x"));
        assert_eq!(group.locations().len(), 2);
    }

    #[test]
    fn test_plain_never_downgrades_enhanced() {
        let mut registry = VariableRegistry::new();
        registry.record(enhanced("group", "Maven group", 1, "a.kts", 1));
        registry.record(plain("group", "b.kts", 7));

        let group = registry.get("group").unwrap();
        assert!(group.is_enhanced());
        assert_eq!(group.help(), "Maven group");
        assert_eq!(group.locations(), &[at("a.kts", 1), at("b.kts", 7)]);
    }

    #[test]
    fn test_second_enhanced_keeps_first_metadata() {
        let mut registry = VariableRegistry::new();
        registry.record(enhanced("version", "Version", 2, "a.kts", 1));
        registry.record(enhanced("version", "Other text", 5, "b.kts", 1));

        let version = registry.get("version").unwrap();
        assert_eq!(version.help(), "Version");
        assert_eq!(version.sort_order(), 2);
        assert_eq!(version.locations().len(), 2);
    }

    #[test]
    fn test_get_sorted_orders_by_sort_then_name() {
        let mut registry = VariableRegistry::new();
        registry.record(plain("zeta", "f", 1));
        registry.record(plain("alpha", "f", 2));
        registry.record(enhanced("version", "Version", 2, "f", 3));
        registry.record(enhanced("group", "Group", 1, "f", 4));
        registry.record(enhanced("artifact", "Artifact", 2, "f", 5));

        let names: Vec<&str> = registry.get_sorted().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["group", "artifact", "version", "alpha", "zeta"]);
    }

    #[test]
    fn test_label_falls_back_to_name() {
        assert_eq!(VariableDescriptor::plain("project_name").label(), "project_name");
        let d = VariableDescriptor::enhanced(
            "group",
            HintMeta {
                help: "Maven group ID".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(d.label(), "Maven group ID");
    }

    #[test]
    fn test_files_deduplicated() {
        let mut registry = VariableRegistry::new();
        registry.record(plain("a", "x.kts", 1));
        registry.record(plain("b", "x.kts", 2));
        registry.record(plain("c", "y.kts", 1));

        assert_eq!(registry.files(), vec![Path::new("x.kts"), Path::new("y.kts")]);
    }

    #[test]
    fn test_descriptor_serialization() {
        let mut registry = VariableRegistry::new();
        registry.record(enhanced("group", "Group", 1, "a.kts", 4));

        let json = serde_json::to_value(registry.get("group").unwrap()).unwrap();
        assert_eq!(json["name"], "group");
        assert_eq!(json["help"], "Group");
        assert_eq!(json["sort_order"], 1);
        assert_eq!(json["enhanced"], true);
        assert_eq!(json["pattern"], serde_json::Value::Null);
        assert_eq!(json["locations"][0]["line"], 4);
    }
}
