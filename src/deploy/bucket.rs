// ABOUTME: Site bucket resolution: explicit name, resource reference, or get-or-create.
// ABOUTME: Planning is pure; only the get-or-create branch touches the remote side.

use snafu::ResultExt;

use crate::config::{BucketSource, StageMode};
use crate::remote::{BucketOps, Credentials};
use crate::resources::ResourceSet;
use crate::types::{BucketName, Region};

use super::error::{BucketSnafu, DeployError};

/// How the site bucket is obtained for every region of a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketPlan {
    /// A fixed bucket, from the settings or a declared resource.
    Use(BucketName),
    /// A region-scoped bucket fetched or created on demand.
    GetOrCreate,
}

/// Result of resolving the bucket for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketResolution {
    Resolved(BucketName),
    /// No bucket is configured and this run does not own the deployment.
    Skipped,
}

/// Decide where the site bucket comes from.
///
/// A `{ Ref: X }` source resolves to `resources[X].Properties.BucketName`
/// and fails if that is missing.
pub fn plan_bucket(
    source: Option<&BucketSource>,
    resources: &ResourceSet,
) -> Result<BucketPlan, DeployError> {
    match source {
        Some(BucketSource::Explicit(name)) => Ok(BucketPlan::Use(name.clone())),
        Some(BucketSource::Reference { logical_id }) => resources
            .bucket_name(logical_id)
            .map(BucketPlan::Use)
            .ok_or_else(|| DeployError::UnresolvedBucket {
                logical_id: logical_id.clone(),
            }),
        None => Ok(BucketPlan::GetOrCreate),
    }
}

pub(crate) async fn materialize<B>(
    client: &B,
    plan: &BucketPlan,
    credentials: Credentials<'_>,
    region: &Region,
) -> Result<BucketName, DeployError>
where
    B: BucketOps + ?Sized,
{
    match plan {
        BucketPlan::Use(name) => Ok(name.clone()),
        BucketPlan::GetOrCreate => client
            .get_or_create_bucket(credentials, region)
            .await
            .context(BucketSnafu {
                region: region.clone(),
            }),
    }
}

/// Resolve the bucket for the reduced site path.
///
/// Get-or-create only runs when this run owns the deployment; an observing
/// run without a configured bucket skips the region instead.
pub(crate) async fn resolve<B>(
    client: &B,
    plan: &BucketPlan,
    mode: StageMode,
    credentials: Credentials<'_>,
    region: &Region,
) -> Result<BucketResolution, DeployError>
where
    B: BucketOps + ?Sized,
{
    if *plan == BucketPlan::GetOrCreate && !mode.is_deploying() {
        return Ok(BucketResolution::Skipped);
    }

    materialize(client, plan, credentials, region)
        .await
        .map(BucketResolution::Resolved)
}
