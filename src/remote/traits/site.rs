// ABOUTME: Static site operations for the remote client.
// ABOUTME: Bundles and uploads the render site into a bucket.

use super::credentials::Credentials;
use crate::remote::RemoteError;
use crate::types::{BucketName, Region, SiteName};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Site deployment operations.
#[async_trait]
pub trait SiteOps: Send + Sync {
    /// Bundle `entry_point` and upload it as `site_name`. Must be idempotent.
    async fn deploy_site(
        &self,
        credentials: Credentials<'_>,
        request: &SiteRequest<'_>,
    ) -> Result<DeployedSite, RemoteError>;

    /// Version of the renderer library the sites are built against.
    async fn renderer_version(&self) -> Result<String, RemoteError>;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRequest<'a> {
    pub site_name: &'a SiteName,
    pub bucket_name: &'a BucketName,
    pub entry_point: &'a Path,
    pub region: &'a Region,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedSite {
    pub serve_url: String,
}
