// ABOUTME: Deploy command implementation.
// ABOUTME: Registers resources, then runs the after-deploy hook for the active stage.

use renderdeploy::config::Project;
use renderdeploy::error::Result;
use renderdeploy::lifecycle::{AfterDeployReport, HookOutcome, Lifecycle, LifecycleEvent};
use renderdeploy::output::Output;
use std::path::Path;

pub async fn deploy(dir: &Path, stage: &str, mut output: Output) -> Result<()> {
    let project = Project::discover(dir)?;
    let client = project.bridge_client();
    let mut resources = project.resources.clone();

    output.start_timer();
    let lifecycle = Lifecycle::new(&project.config, &client, &output, stage);

    output.progress(&format!(
        "Deploying {} to {} region(s) as stage {} ({})",
        project.config.site_id,
        project.config.deploy_regions.len(),
        stage,
        lifecycle.mode()
    ));

    lifecycle
        .dispatch(LifecycleEvent::Initialize, &mut resources)
        .await?;

    match lifecycle
        .dispatch(LifecycleEvent::AfterDeploy, &mut resources)
        .await?
    {
        HookOutcome::Deployed(AfterDeployReport::Full(report)) => {
            for outcome in &report.outcomes {
                output.progress(&format!("{}: {}", outcome.region(), outcome.serve_url()));
            }
            output.success(&format!(
                "Deployed to {} region(s) in {} attempt(s)",
                report.outcomes.len(),
                report.attempts
            ));
        }
        HookOutcome::Deployed(AfterDeployReport::SitesOnly(report)) => {
            for site in &report.deployed {
                output.progress(&format!("{}: {}", site.region, site.serve_url));
            }
            if !report.skipped.is_empty() {
                output.warning(&format!(
                    "No bucket configured, site not deployed to {} region(s)",
                    report.skipped.len()
                ));
            }
            output.success(&format!(
                "Deployed site to {} region(s)",
                report.deployed.len()
            ));
        }
        _ => {}
    }

    Ok(())
}
