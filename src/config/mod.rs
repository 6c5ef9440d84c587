// ABOUTME: Settings parsing and resolution for renderdeploy.yml.
// ABOUTME: Merges user settings with defaults and fails closed on missing required fields.

mod bucket;
mod error;
mod init;
mod lambda;
mod stage;

pub use bucket::BucketSource;
pub use error::ConfigError;
pub use init::init_config;
pub use lambda::{Architecture, LambdaSettings};
pub use stage::StageMode;

use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::remote::BridgeClient;
use crate::resources::ResourceSet;
use crate::types::{Principal, Region};

pub use crate::types::DEFAULT_PRINCIPAL;

pub const CONFIG_FILENAME: &str = "renderdeploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "renderdeploy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".renderdeploy/config.yml";

pub const DEFAULT_SITE_ID: &str = "remotion-render-app";
pub const DEFAULT_DEPLOY_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(2500);

/// Settings exactly as the user wrote them. Nothing is validated yet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub entry_point: Option<PathBuf>,

    #[serde(default)]
    pub deploy_stage: Option<String>,

    #[serde(default)]
    pub deploy_regions: Vec<String>,

    #[serde(default)]
    pub bucket_name: Option<BucketSource>,

    #[serde(default)]
    pub site_id: Option<String>,

    #[serde(default)]
    pub lambda: LambdaSettings,

    /// Seconds, fractions allowed.
    #[serde(default)]
    pub deploy_timeout_in_seconds: Option<f64>,

    #[serde(default, with = "humantime_serde")]
    pub retry_backoff: Option<Duration>,

    #[serde(default)]
    pub principal: Option<Principal>,

    #[serde(default)]
    pub policy_document: Option<serde_yaml::Value>,

    #[serde(default)]
    pub bridge: Option<Vec<String>>,

    #[serde(default)]
    pub resources: ResourceSet,
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(ConfigError::from)
    }
}

/// Validated, immutable deployment settings.
#[derive(Debug, Clone)]
pub struct DeploymentConfig {
    pub entry_point: PathBuf,
    pub deploy_stage: String,
    pub deploy_regions: NonEmpty<Region>,
    pub bucket: Option<BucketSource>,
    pub site_id: String,
    pub lambda: LambdaSettings,
    pub deploy_timeout: Duration,
    pub retry_backoff: Duration,
    pub principal: Principal,
    pub policy_document: Option<serde_yaml::Value>,
}

impl DeploymentConfig {
    /// Apply defaults to `settings` and check required fields.
    ///
    /// Required fields are checked in the order `entryPoint`,
    /// `deployRegions`, `deployStage`; an empty region list counts as
    /// missing. A relative entry point is resolved against `project_dir`.
    pub fn resolve(settings: &Settings, project_dir: &Path) -> Result<Self, ConfigError> {
        let entry_point = settings
            .entry_point
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingField("entryPoint"))?;

        let regions = settings
            .deploy_regions
            .iter()
            .map(|value| {
                Region::new(value).map_err(|source| ConfigError::InvalidRegion {
                    value: value.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let deploy_regions =
            NonEmpty::from_vec(regions).ok_or(ConfigError::MissingField("deployRegions"))?;

        let deploy_stage = settings
            .deploy_stage
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingField("deployStage"))?;

        // An empty bucket name means "not configured".
        let bucket = settings.bucket_name.clone().filter(|source| {
            !matches!(source, BucketSource::Explicit(name) if name.as_str().is_empty())
        });

        let deploy_timeout = match settings.deploy_timeout_in_seconds {
            Some(seconds) => Duration::try_from_secs_f64(seconds)
                .map_err(|_| ConfigError::InvalidDeployTimeout(seconds))?,
            None => DEFAULT_DEPLOY_TIMEOUT,
        };

        Ok(DeploymentConfig {
            entry_point: project_dir.join(entry_point),
            deploy_stage: deploy_stage.to_string(),
            deploy_regions,
            bucket,
            site_id: settings
                .site_id
                .clone()
                .unwrap_or_else(|| DEFAULT_SITE_ID.to_string()),
            lambda: settings.lambda.clone(),
            deploy_timeout,
            retry_backoff: settings.retry_backoff.unwrap_or(DEFAULT_RETRY_BACKOFF),
            principal: settings.principal.clone().unwrap_or_default(),
            policy_document: settings.policy_document.clone(),
        })
    }
}

/// A project directory with its resolved settings and declared resources.
#[derive(Debug, Clone)]
pub struct Project {
    pub dir: PathBuf,
    pub config: DeploymentConfig,
    pub resources: ResourceSet,
    pub bridge: NonEmpty<String>,
}

impl Project {
    pub fn from_yaml(yaml: &str, dir: &Path) -> Result<Self, ConfigError> {
        let settings = Settings::from_yaml(yaml)?;
        Self::from_settings(settings, dir)
    }

    pub fn from_settings(settings: Settings, dir: &Path) -> Result<Self, ConfigError> {
        let config = DeploymentConfig::resolve(&settings, dir)?;

        let bridge = match settings.bridge {
            Some(command) => NonEmpty::from_vec(command).ok_or(ConfigError::EmptyBridgeCommand)?,
            None => default_bridge_command(),
        };

        Ok(Project {
            dir: dir.to_path_buf(),
            config,
            resources: settings.resources,
            bridge,
        })
    }

    pub fn load(path: &Path, dir: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content, dir)
    }

    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("Loading settings from {}", path.display());
                return Self::load(path, dir);
            }
        }

        Err(ConfigError::NotFound(dir.to_path_buf()))
    }

    /// Bridge client for this project; `RENDERDEPLOY_BRIDGE` wins over settings.
    pub fn bridge_client(&self) -> BridgeClient {
        let command = crate::remote::resolve_program(&self.dir, self.bridge.clone());
        BridgeClient::from_env_or(command).working_dir(&self.dir)
    }
}

pub fn default_bridge_command() -> NonEmpty<String> {
    NonEmpty::from((
        "node".to_string(),
        vec![".renderdeploy/bridge.mjs".to_string()],
    ))
}
