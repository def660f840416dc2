// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for conformance-mapper

use serde::Serialize;
use std::any::Any;
use thiserror::Error;

/// The single error value returned by the mapping facade.
///
/// Carries a human-readable cause and nothing else; once this is produced no
/// part of the report is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("mapping failed: {cause}")]
pub struct MappingError {
    #[serde(rename = "error")]
    pub cause: String,
}

impl MappingError {
    pub fn new(cause: impl Into<String>) -> Self {
        Self { cause: cause.into() }
    }

    /// Convert a caught panic payload into a mapping error
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let detail = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::new(format!("internal failure during mapping: {}", detail))
    }
}

/// Errors raised while loading or writing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
