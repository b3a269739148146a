//! Scanner for the placeholder micro-syntax embedded in template files.
//!
//! Two forms are recognised:
//!
//! ```text
//! {{ name }}
//! {{ @@[SORT|][(PATTERN)|]HELP[=DEFAULT]@@name }}
//! ```
//!
//! `SORT` is decimal digits, `PATTERN` is a parenthesised regex alternation,
//! and the rightmost `=` in `HELP` splits off the default value. Both forms
//! are confined to a single line.

use crate::template::is_scannable;
use crate::template::registry::{DEFAULT_SORT_ORDER, HintMeta, Location, Occurrence, VariableRegistry};
use regex::{Captures, Regex};
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;
use walkdir::WalkDir;

const ENHANCED_PATTERN: &str = r"\{\{[ \t]*@@(?:(?P<sort>\d+)\|)?(?:\((?P<pattern>.*?)\)\|)?(?P<help>.*?)@@(?P<name>[A-Za-z_][A-Za-z0-9_]*)[ \t]*\}\}";

const PLAIN_PATTERN: &str = r"\{\{[ \t]*(?P<name>[A-Za-z_][A-Za-z0-9_]*)[ \t]*\}\}";

fn enhanced_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ENHANCED_PATTERN).expect("Invalid enhanced hint regex"))
}

fn plain_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PLAIN_PATTERN).expect("Invalid plain placeholder regex"))
}

/// Enhanced placeholders in `text`, left to right.
///
/// A placeholder never spans a `}}`: a candidate whose metadata runs past
/// one (an unterminated hint swallowing later text) is rejected and the
/// search resumes just after its opening braces.
fn enhanced_captures(text: &str) -> Vec<Captures<'_>> {
    let re = enhanced_regex();
    let mut found = Vec::new();
    let mut pos = 0;
    while let Some(caps) = re.captures_at(text, pos) {
        let Some(whole) = caps.get(0) else { break };
        let body = &text[whole.start() + 2..whole.end() - 2];
        if body.contains("}}") {
            pos = whole.start() + 2;
            continue;
        }
        pos = whole.end();
        found.push(caps);
    }
    found
}

/// Rewrite every enhanced placeholder to `{{ name }}`.
///
/// Plain placeholders and all other text are left untouched, so the result
/// is a fixed point: `compile(&compile(t)) == compile(t)`.
pub fn compile(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for caps in enhanced_captures(content) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&content[last..whole.start()]);
        out.push_str(&format!("{{{{ {} }}}}", &caps["name"]));
        last = whole.end();
    }
    out.push_str(&content[last..]);
    out
}

fn parse_sort(caps: &Captures) -> u32 {
    let Some(m) = caps.name("sort") else {
        return DEFAULT_SORT_ORDER;
    };
    m.as_str().parse().unwrap_or_else(|_| {
        tracing::debug!("sort order {} out of range, placing {} last", m.as_str(), &caps["name"]);
        u32::MAX
    })
}

fn parse_meta(caps: &Captures) -> HintMeta {
    let sort_order = parse_sort(caps);
    let pattern = caps.name("pattern").map(|m| m.as_str().to_string());

    let raw_help = caps.name("help").map(|m| m.as_str()).unwrap_or_default();
    let (help, default) = match raw_help.rsplit_once('=') {
        Some((help, default)) => (help.trim(), Some(default.trim().to_string())),
        None => (raw_help.trim(), None),
    };

    HintMeta {
        help: help.to_string(),
        sort_order,
        pattern,
        default,
    }
}

fn overlaps(span: &Range<usize>, claimed: &[Range<usize>]) -> bool {
    claimed
        .iter()
        .any(|c| span.start < c.end && c.start < span.end)
}

/// Extract occurrences from a single line.
///
/// Enhanced matches are collected first; plain matches inside a span already
/// claimed by an enhanced match are ignored.
pub fn scan_line(line: &str, file: &Path, line_number: usize) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();
    let mut claimed = Vec::new();

    for caps in enhanced_captures(line) {
        let Some(whole) = caps.get(0) else { continue };
        claimed.push(whole.range());
        occurrences.push(Occurrence {
            name: caps["name"].to_string(),
            meta: Some(parse_meta(&caps)),
            location: Location {
                file: file.to_path_buf(),
                line: line_number,
            },
        });
    }

    for caps in plain_regex().captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        if overlaps(&whole.range(), &claimed) {
            continue;
        }
        occurrences.push(Occurrence {
            name: caps["name"].to_string(),
            meta: None,
            location: Location {
                file: file.to_path_buf(),
                line: line_number,
            },
        });
    }

    occurrences
}

/// Extract occurrences from file content, line by line.
pub fn scan_content(content: &str, file: &Path) -> Vec<Occurrence> {
    content
        .lines()
        .enumerate()
        .flat_map(|(idx, line)| scan_line(line, file, idx + 1))
        .collect()
}

/// Extract occurrences from a file on disk.
///
/// Unreadable or non-UTF-8 files yield nothing.
pub fn scan_file(path: &Path, display_path: &Path) -> Vec<Occurrence> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("skipping unreadable file {}: {}", path.display(), e);
            return Vec::new();
        }
    };
    match String::from_utf8(bytes) {
        Ok(content) => scan_content(&content, display_path),
        Err(_) => {
            tracing::debug!("skipping non-UTF-8 file {}", path.display());
            Vec::new()
        }
    }
}

/// Scan every allow-listed file under `root` into `registry`.
///
/// Files are visited in sorted path order so that first-seen semantics are
/// deterministic. Locations are recorded relative to `root`. `.git` is never
/// entered.
pub fn scan_tree(root: &Path, registry: &mut VariableRegistry) -> usize {
    let mut scanned = 0;
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() || !is_scannable(entry.path()) {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        registry.record_all(scan_file(entry.path(), relative));
        scanned += 1;
    }

    tracing::debug!(
        "scanned {} files under {}, found {} variables",
        scanned,
        root.display(),
        registry.len()
    );
    scanned
}
