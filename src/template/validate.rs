//! Pattern validation for resolved variable values.

use crate::template::registry::VariableDescriptor;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// A value that does not fully match its variable's pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("Validation error: '{value}' for {variable} does not match pattern '{pattern}' ({help})")]
pub struct ValidationError {
    pub variable: String,
    pub value: String,
    pub pattern: String,
    pub help: String,
}

/// Compile `^(?:pattern)$`, or `None` (with a warning) if the pattern is malformed.
fn anchored(descriptor: &VariableDescriptor, pattern: &str) -> Option<Regex> {
    match Regex::new(&format!("^(?:{})$", pattern)) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(
                "ignoring invalid pattern '{}' for variable {}: {}",
                pattern,
                descriptor.name(),
                e
            );
            None
        }
    }
}

/// Check one value against a descriptor's pattern.
///
/// Descriptors without a pattern, or with a pattern that is not a valid
/// regex, accept every value.
pub fn validate(value: &str, descriptor: &VariableDescriptor) -> Result<(), ValidationError> {
    let Some(pattern) = descriptor.pattern() else {
        return Ok(());
    };
    let Some(re) = anchored(descriptor, pattern) else {
        return Ok(());
    };
    if re.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError {
            variable: descriptor.name().to_string(),
            value: value.to_string(),
            pattern: pattern.to_string(),
            help: descriptor.label().to_string(),
        })
    }
}

/// Validate every descriptor's value, collecting all violations.
///
/// A descriptor with no entry in `values` is checked against the empty string.
pub fn validate_all<'a>(
    values: &BTreeMap<String, String>,
    descriptors: impl IntoIterator<Item = &'a VariableDescriptor>,
) -> Vec<ValidationError> {
    descriptors
        .into_iter()
        .filter_map(|d| {
            let value = values.get(d.name()).map(String::as_str).unwrap_or_default();
            validate(value, d).err()
        })
        .collect()
}
