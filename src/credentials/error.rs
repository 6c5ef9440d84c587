// ABOUTME: Credential rotation error types with SNAFU context selectors.
// ABOUTME: Each step of rotation and revocation carries the principal involved.

use snafu::Snafu;

use crate::remote::RemoteError;
use crate::types::{AccessKeyId, Principal};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CredentialError {
    #[snafu(display("failed to list access keys for {principal}: {source}"))]
    ListKeys {
        principal: Principal,
        source: RemoteError,
    },

    #[snafu(display("failed to delete stale access key {access_key_id} of {principal}: {source}"))]
    DeleteStaleKey {
        principal: Principal,
        access_key_id: AccessKeyId,
        source: RemoteError,
    },

    #[snafu(display("failed to create access key for {principal}: {source}"))]
    CreateKey {
        principal: Principal,
        source: RemoteError,
    },

    #[snafu(display("failed to revoke access key {access_key_id} of {principal}: {source}"))]
    Revoke {
        principal: Principal,
        access_key_id: AccessKeyId,
        source: RemoteError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialErrorKind {
    ListKeys,
    DeleteStaleKey,
    CreateKey,
    Revoke,
}

impl CredentialError {
    pub fn kind(&self) -> CredentialErrorKind {
        match self {
            CredentialError::ListKeys { .. } => CredentialErrorKind::ListKeys,
            CredentialError::DeleteStaleKey { .. } => CredentialErrorKind::DeleteStaleKey,
            CredentialError::CreateKey { .. } => CredentialErrorKind::CreateKey,
            CredentialError::Revoke { .. } => CredentialErrorKind::Revoke,
        }
    }
}
