// ABOUTME: Resources command implementation.
// ABOUTME: Prints the declared resources after the init hook registered its own.

use renderdeploy::config::Project;
use renderdeploy::error::Result;
use renderdeploy::lifecycle::{Lifecycle, LifecycleEvent};
use renderdeploy::output::Output;
use std::path::Path;

pub async fn print_resources(dir: &Path, stage: &str, output: Output) -> Result<()> {
    let project = Project::discover(dir)?;
    let client = project.bridge_client();
    let mut resources = project.resources.clone();

    let lifecycle = Lifecycle::new(&project.config, &client, &output, stage);
    lifecycle
        .dispatch(LifecycleEvent::Initialize, &mut resources)
        .await?;

    print!("{}", resources.to_yaml()?);
    Ok(())
}
