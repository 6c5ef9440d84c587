// ABOUTME: Identity provider operations for access key management.
// ABOUTME: List, create, and delete access keys owned by a principal.

use crate::remote::RemoteError;
use crate::types::{AccessKeyId, Principal};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// Access key management. Always runs under ambient credentials.
#[async_trait]
pub trait IdentityOps: Send + Sync {
    async fn list_access_keys(
        &self,
        principal: &Principal,
    ) -> Result<Vec<AccessKeyMetadata>, RemoteError>;

    async fn create_access_key(&self, principal: &Principal) -> Result<AccessKey, RemoteError>;

    async fn delete_access_key(
        &self,
        principal: &Principal,
        access_key_id: &AccessKeyId,
    ) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKeyMetadata {
    pub access_key_id: AccessKeyId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub create_date: Option<DateTime<Utc>>,
}

/// A freshly created key pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKey {
    pub access_key_id: AccessKeyId,
    pub secret_access_key: SecretAccessKey,
    #[serde(default)]
    pub create_date: Option<DateTime<Utc>>,
}

/// Secret half of a key pair. Never printed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SecretAccessKey(String);

impl SecretAccessKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretAccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretAccessKey(<redacted>)")
    }
}
