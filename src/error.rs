// ABOUTME: Application-wide error type for renderdeploy.
// ABOUTME: Wraps each subsystem's error so the CLI has one type to report.

use thiserror::Error;

use crate::config::ConfigError;
use crate::credentials::CredentialError;
use crate::deploy::DeployError;
use crate::teardown::TeardownError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Teardown(#[from] TeardownError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
