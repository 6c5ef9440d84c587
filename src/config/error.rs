// ABOUTME: Configuration error types.
// ABOUTME: Missing required settings fail closed and name the exact field.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::{PrincipalError, RegionError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no {0} specified in renderdeploy settings")]
    MissingField(&'static str),

    #[error("invalid region '{value}': {source}")]
    InvalidRegion { value: String, source: RegionError },

    #[error("invalid deployTimeoutInSeconds: {0}")]
    InvalidDeployTimeout(f64),

    #[error("invalid user name '{value}' declared for {logical_id}: {source}")]
    InvalidDeclaredPrincipal {
        logical_id: &'static str,
        value: String,
        source: PrincipalError,
    },

    #[error("bridge command cannot be empty")]
    EmptyBridgeCommand,

    #[error("configuration file not found in {0}")]
    NotFound(PathBuf),

    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    /// The setting a `MissingField` error refers to.
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            ConfigError::MissingField(field) => Some(field),
            _ => None,
        }
    }
}
