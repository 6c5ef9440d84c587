// ABOUTME: Stage gate deciding whether this run owns the deployment.
// ABOUTME: A mismatched active stage observes instead of failing.

use std::fmt;

use super::DeploymentConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageMode {
    /// Active stage equals `deployStage`: rotate, deploy, tear down.
    Deploying,
    /// Any other stage: only the reduced site path runs.
    Observing,
}

impl StageMode {
    pub fn for_stage(config: &DeploymentConfig, active_stage: &str) -> Self {
        if config.deploy_stage == active_stage {
            StageMode::Deploying
        } else {
            StageMode::Observing
        }
    }

    pub fn is_deploying(&self) -> bool {
        matches!(self, StageMode::Deploying)
    }
}

impl fmt::Display for StageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageMode::Deploying => write!(f, "deploying"),
            StageMode::Observing => write!(f, "observing"),
        }
    }
}
