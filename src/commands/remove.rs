// ABOUTME: Remove command implementation.
// ABOUTME: Tears down deployed functions when the active stage owns the deployment.

use renderdeploy::config::Project;
use renderdeploy::error::Result;
use renderdeploy::lifecycle::{HookOutcome, Lifecycle, LifecycleEvent};
use renderdeploy::output::Output;
use std::path::Path;

pub async fn remove(dir: &Path, stage: &str, mut output: Output) -> Result<()> {
    let project = Project::discover(dir)?;
    let client = project.bridge_client();
    let mut resources = project.resources.clone();

    output.start_timer();
    let lifecycle = Lifecycle::new(&project.config, &client, &output, stage);

    match lifecycle
        .dispatch(LifecycleEvent::Remove, &mut resources)
        .await?
    {
        HookOutcome::Removed(report) => output.success(&format!(
            "Removed {} function(s) from {} region(s)",
            report.deleted_count(),
            report.regions.len()
        )),
        _ => output.warning(&format!(
            "Stage {} does not own the deployment (deploy stage is {}), nothing removed",
            stage, project.config.deploy_stage
        )),
    }

    Ok(())
}
