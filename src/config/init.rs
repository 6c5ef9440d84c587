// ABOUTME: Settings scaffolding for new projects.
// ABOUTME: Creates a renderdeploy.yml template with every default spelled out.

use std::path::Path;

use crate::types::Region;

use super::{CONFIG_FILENAME, ConfigError, DEFAULT_PRINCIPAL, DEFAULT_SITE_ID};

pub fn init_config(
    dir: &Path,
    entry_point: Option<&str>,
    stage: Option<&str>,
    regions: &[String],
    force: bool,
) -> Result<(), ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(ConfigError::AlreadyExists(config_path));
    }

    for value in regions {
        Region::new(value).map_err(|source| ConfigError::InvalidRegion {
            value: value.clone(),
            source,
        })?;
    }

    let regions = if regions.is_empty() {
        vec!["us-east-1".to_string()]
    } else {
        regions.to_vec()
    };

    let yaml = generate_template_yaml(
        entry_point.unwrap_or("src/index.ts"),
        stage.unwrap_or("prod"),
        &regions,
    );
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(entry_point: &str, stage: &str, regions: &[String]) -> String {
    let regions = regions
        .iter()
        .map(|r| format!("  - {r}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"entryPoint: {entry_point}
deployStage: {stage}
deployRegions:
{regions}
siteId: {DEFAULT_SITE_ID}
# bucketName: my-render-bucket        # or: {{ Ref: RenderBucket }}
# principal: {DEFAULT_PRINCIPAL}
lambda:
  architecture: arm64
  createCloudWatchLogGroup: true
  memorySizeInMb: 2048
  timeoutInSeconds: 240
deployTimeoutInSeconds: 30
# retryBackoff: 2500ms
# bridge: [node, .renderdeploy/bridge.mjs]
resources: {{}}
"#
    )
}
