// ABOUTME: Deploy cycle across all configured regions with time-bounded retry.
// ABOUTME: Also hosts the reduced site-only path used when observing another stage.

use snafu::ResultExt;

use crate::config::{DeploymentConfig, StageMode};
use crate::credentials::CredentialLease;
use crate::output::Output;
use crate::remote::{Credentials, RemoteClient, SiteOps, SiteRequest};
use crate::resources::ResourceSet;
use crate::types::{BucketName, Region, SiteName};

use super::bucket::{self, BucketPlan, BucketResolution, plan_bucket};
use super::error::{DeployError, FunctionSnafu, RendererVersionSnafu, SiteSnafu};
use super::outcome::{DeployOutcome, DeployReport, SiteOutcome, SitesReport};
use super::retry::{RetryPolicy, RetryState};

/// Deploy the function and site to every region under `lease`.
///
/// Regions run sequentially in declared order. A transient auth failure in
/// any region restarts the whole region loop after the configured backoff,
/// until the deploy timeout has elapsed. Any other failure is returned at once.
pub async fn deploy<C>(
    client: &C,
    config: &DeploymentConfig,
    resources: &ResourceSet,
    lease: &CredentialLease,
    output: &Output,
) -> Result<DeployReport, DeployError>
where
    C: RemoteClient + ?Sized,
{
    let plan = plan_bucket(config.bucket.as_ref(), resources)?;
    deploy_with_plan(client, config, &plan, lease, output).await
}

/// Like [`deploy`], with the bucket already planned by the caller.
pub async fn deploy_with_plan<C>(
    client: &C,
    config: &DeploymentConfig,
    plan: &BucketPlan,
    lease: &CredentialLease,
    output: &Output,
) -> Result<DeployReport, DeployError>
where
    C: RemoteClient + ?Sized,
{
    let policy = RetryPolicy::from_config(config);
    let credentials = Credentials::Leased(lease);
    let site_name = site_name(client, config).await?;

    let mut state = RetryState::start();
    loop {
        if state.expired(&policy) {
            output.error("Deploying timed out - no function deployed");
            return Err(state.into_error(&policy));
        }

        let attempt = state.begin_attempt();
        tracing::debug!("Deploy attempt {} as {}", attempt, lease.access_key_id());

        match deploy_regions(client, config, plan, &site_name, credentials, output).await {
            Ok(outcomes) => {
                return Ok(DeployReport {
                    outcomes,
                    attempts: attempt,
                });
            }
            Err(err) if err.is_transient_auth() => {
                tracing::warn!(
                    "Credentials not recognized yet (attempt {}), retrying in {:?}: {}",
                    attempt,
                    policy.backoff,
                    err
                );
                state.record(err);
                tokio::time::sleep(policy.backoff).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Deploy only the site to every region using ambient credentials.
///
/// No function is deployed and nothing is retried. When no bucket is
/// configured and `mode` is observing, the region is skipped.
pub async fn deploy_sites<C>(
    client: &C,
    config: &DeploymentConfig,
    resources: &ResourceSet,
    mode: StageMode,
    output: &Output,
) -> Result<SitesReport, DeployError>
where
    C: RemoteClient + ?Sized,
{
    let plan = plan_bucket(config.bucket.as_ref(), resources)?;
    let site_name = site_name(client, config).await?;
    let mut report = SitesReport::default();

    for region in config.deploy_regions.iter() {
        let resolution =
            bucket::resolve(client, &plan, mode, Credentials::Ambient, region).await?;

        let bucket_name = match resolution {
            BucketResolution::Resolved(name) => name,
            BucketResolution::Skipped => {
                tracing::info!(
                    "No bucket configured while {}, skipping site deploy to {}",
                    mode,
                    region
                );
                report.skipped.push(region.clone());
                continue;
            }
        };

        let site = deploy_site(
            client,
            config,
            &site_name,
            bucket_name,
            Credentials::Ambient,
            region,
            output,
        )
        .await?;
        report.deployed.push(site);
    }

    Ok(report)
}

async fn deploy_regions<C>(
    client: &C,
    config: &DeploymentConfig,
    plan: &BucketPlan,
    site_name: &SiteName,
    credentials: Credentials<'_>,
    output: &Output,
) -> Result<Vec<DeployOutcome>, DeployError>
where
    C: RemoteClient + ?Sized,
{
    let mut outcomes = Vec::with_capacity(config.deploy_regions.len());

    for region in config.deploy_regions.iter() {
        let function = client
            .deploy_function(credentials, region, &config.lambda)
            .await
            .context(FunctionSnafu {
                region: region.clone(),
            })?;

        let verb = if function.already_existed {
            "Ensured"
        } else {
            "Deployed"
        };
        output.progress(&format!(
            "{verb} function \"{}\" to {region}",
            function.function_name
        ));

        let bucket_name = bucket::materialize(client, plan, credentials, region).await?;
        let site = deploy_site(
            client,
            config,
            site_name,
            bucket_name,
            credentials,
            region,
            output,
        )
        .await?;

        outcomes.push(DeployOutcome {
            function_name: function.function_name,
            already_existed: function.already_existed,
            site,
        });
    }

    Ok(outcomes)
}

async fn deploy_site<S>(
    client: &S,
    config: &DeploymentConfig,
    site_name: &SiteName,
    bucket_name: BucketName,
    credentials: Credentials<'_>,
    region: &Region,
    output: &Output,
) -> Result<SiteOutcome, DeployError>
where
    S: SiteOps + ?Sized,
{
    output.progress(&format!("Using bucket {bucket_name} in {region}"));

    let request = SiteRequest {
        site_name,
        bucket_name: &bucket_name,
        entry_point: &config.entry_point,
        region,
    };
    let site = client
        .deploy_site(credentials, &request)
        .await
        .context(SiteSnafu {
            region: region.clone(),
        })?;

    output.progress(&format!("Deployed site {site_name} to {region}: {}", site.serve_url));

    Ok(SiteOutcome {
        region: region.clone(),
        bucket_name,
        site_name: site_name.clone(),
        serve_url: site.serve_url,
    })
}

/// `<site_id>-<renderer version>`.
async fn site_name<S>(client: &S, config: &DeploymentConfig) -> Result<SiteName, DeployError>
where
    S: SiteOps + ?Sized,
{
    let version = client
        .renderer_version()
        .await
        .context(RendererVersionSnafu)?;
    Ok(SiteName::new(format!("{}-{}", config.site_id, version)))
}
