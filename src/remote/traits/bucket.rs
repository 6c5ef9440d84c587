// ABOUTME: Storage bucket operations for the remote client.
// ABOUTME: Region-scoped get-or-create of the site bucket.

use super::credentials::Credentials;
use crate::remote::RemoteError;
use crate::types::{BucketName, Region};
use async_trait::async_trait;

#[async_trait]
pub trait BucketOps: Send + Sync {
    /// Return the region's site bucket, creating it on first use.
    async fn get_or_create_bucket(
        &self,
        credentials: Credentials<'_>,
        region: &Region,
    ) -> Result<BucketName, RemoteError>;
}
