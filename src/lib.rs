//! gradle-init - Template variable resolution for Gradle project scaffolding.
//!
//! This library provides the core functionality for the `gradle-init` CLI tool,
//! including placeholder discovery, template compilation, and render-context
//! resolution with validation.

pub mod cli;
pub mod commands;
pub mod config;
pub mod template;


/// Library-level error type for gradle-init operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{}", format_validation(.0))]
    Validation(Vec<template::ValidationError>),

    #[error("{0}")]
    Other(String),
}

fn format_validation(errors: &[template::ValidationError]) -> String {
    let mut msg = format!("{} variable(s) failed validation", errors.len());
    for e in errors {
        msg.push_str("\n  ");
        msg.push_str(&e.to_string());
    }
    msg
}

/// Result type alias for gradle-init operations.
pub type Result<T> = std::result::Result<T, Error>;
