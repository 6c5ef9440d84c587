// ABOUTME: Deploy orchestration error types with SNAFU context selectors.
// ABOUTME: Per-step failures carry their region; exhaustion wraps the last transient failure.

use snafu::Snafu;
use std::time::Duration;

use crate::credentials::CredentialError;
use crate::remote::RemoteError;
use crate::types::Region;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DeployError {
    #[snafu(display("failed to read renderer version: {source}"))]
    RendererVersion { source: RemoteError },

    #[snafu(display("failed to deploy function to {region}: {source}"))]
    Function { region: Region, source: RemoteError },

    #[snafu(display("failed to get or create bucket in {region}: {source}"))]
    Bucket { region: Region, source: RemoteError },

    #[snafu(display(
        "bucket reference {logical_id} does not name a declared resource with Properties.BucketName"
    ))]
    UnresolvedBucket { logical_id: String },

    #[snafu(display("failed to deploy site to {region}: {source}"))]
    Site { region: Region, source: RemoteError },

    #[snafu(display("deploy timed out after {attempts} attempt(s): {source}"))]
    Exhausted {
        attempts: u32,
        source: Box<DeployError>,
    },

    #[snafu(display("deploy timed out after {budget:?} before any attempt completed"))]
    TimedOut { budget: Duration },

    #[snafu(display("{source}"))]
    Credentials { source: CredentialError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// A remote call failed; see `remote_source` for the cause.
    Remote,
    /// The bucket reference does not resolve against the declared resources.
    UnresolvedBucket,
    /// The time budget ran out.
    Timeout,
    /// Rotation or revocation of the deploy credentials failed.
    Credentials,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::RendererVersion { .. }
            | DeployError::Function { .. }
            | DeployError::Bucket { .. }
            | DeployError::Site { .. } => DeployErrorKind::Remote,
            DeployError::UnresolvedBucket { .. } => DeployErrorKind::UnresolvedBucket,
            DeployError::Exhausted { .. } | DeployError::TimedOut { .. } => {
                DeployErrorKind::Timeout
            }
            DeployError::Credentials { .. } => DeployErrorKind::Credentials,
        }
    }

    /// The remote failure behind this error, if any.
    pub fn remote_source(&self) -> Option<&RemoteError> {
        match self {
            DeployError::RendererVersion { source }
            | DeployError::Function { source, .. }
            | DeployError::Bucket { source, .. }
            | DeployError::Site { source, .. } => Some(source),
            DeployError::Exhausted { source, .. } => source.remote_source(),
            _ => None,
        }
    }

    /// The last transient failure recorded before the budget ran out.
    pub fn last_error(&self) -> Option<&DeployError> {
        match self {
            DeployError::Exhausted { source, .. } => Some(source),
            _ => None,
        }
    }

    /// True when a single pass failed on not-yet-propagated credentials.
    pub fn is_transient_auth(&self) -> bool {
        match self {
            DeployError::Function { source, .. }
            | DeployError::Bucket { source, .. }
            | DeployError::Site { source, .. } => source.is_transient_auth(),
            _ => false,
        }
    }
}

impl From<CredentialError> for DeployError {
    fn from(source: CredentialError) -> Self {
        DeployError::Credentials { source }
    }
}
