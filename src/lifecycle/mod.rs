// ABOUTME: Lifecycle hooks binding the orchestrators to init, after-deploy and remove.
// ABOUTME: The stage mode decides which hooks are registered at all.

use std::fmt;

use crate::config::{ConfigError, DeploymentConfig, StageMode};
use crate::credentials::{CredentialLease, with_lease};
use crate::deploy::{self, DeployReport, SitesReport};
use crate::error::Result;
use crate::output::Output;
use crate::remote::RemoteClient;
use crate::resources::{Registration, ResourceSet, USER_LOGICAL_ID, principal_resources};
use crate::teardown::{self, TeardownReport};
use crate::types::Principal;

/// Points in the host lifecycle this tool hooks into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Initialize,
    AfterDeploy,
    Remove,
}

impl LifecycleEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::Initialize => "init",
            LifecycleEvent::AfterDeploy => "after-deploy",
            LifecycleEvent::Remove => "remove",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the after-deploy hook, depending on the stage mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AfterDeployReport {
    /// Rotation, function and site deploy in every region.
    Full(DeployReport),
    /// Site-only path run while observing another stage.
    SitesOnly(SitesReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    Initialized(Registration),
    Deployed(AfterDeployReport),
    Removed(TeardownReport),
    /// The event is not registered for this stage mode.
    Skipped,
}

const DEPLOYING_HOOKS: &[LifecycleEvent] = &[
    LifecycleEvent::Initialize,
    LifecycleEvent::AfterDeploy,
    LifecycleEvent::Remove,
];

const OBSERVING_HOOKS: &[LifecycleEvent] = &[LifecycleEvent::AfterDeploy];

/// Runs lifecycle events for one project against one remote client.
pub struct Lifecycle<'a, C: ?Sized> {
    config: &'a DeploymentConfig,
    client: &'a C,
    output: &'a Output,
    mode: StageMode,
}

impl<'a, C> Lifecycle<'a, C>
where
    C: RemoteClient + ?Sized,
{
    pub fn new(
        config: &'a DeploymentConfig,
        client: &'a C,
        output: &'a Output,
        active_stage: &str,
    ) -> Self {
        let mode = StageMode::for_stage(config, active_stage);
        tracing::debug!(
            "Stage {} against deploy stage {}: {}",
            active_stage,
            config.deploy_stage,
            mode
        );

        Self {
            config,
            client,
            output,
            mode,
        }
    }

    pub fn mode(&self) -> StageMode {
        self.mode
    }

    /// Events registered for the current stage mode.
    pub fn hooks(&self) -> &'static [LifecycleEvent] {
        match self.mode {
            StageMode::Deploying => DEPLOYING_HOOKS,
            StageMode::Observing => OBSERVING_HOOKS,
        }
    }

    pub fn is_registered(&self, event: LifecycleEvent) -> bool {
        self.hooks().contains(&event)
    }

    /// Run `event` if it is registered for the current stage mode.
    pub async fn dispatch(
        &self,
        event: LifecycleEvent,
        resources: &mut ResourceSet,
    ) -> Result<HookOutcome> {
        if !self.is_registered(event) {
            tracing::debug!("Hook {} not registered while {}", event, self.mode);
            return Ok(HookOutcome::Skipped);
        }

        tracing::debug!("Running {} hook", event);

        match event {
            LifecycleEvent::Initialize => {
                Ok(HookOutcome::Initialized(self.on_initialize(resources)))
            }
            LifecycleEvent::AfterDeploy => {
                let report = self.on_after_deploy(resources).await?;
                Ok(HookOutcome::Deployed(report))
            }
            LifecycleEvent::Remove => {
                let report = teardown::teardown(self.client, self.config, self.output).await?;
                Ok(HookOutcome::Removed(report))
            }
        }
    }

    fn on_initialize(&self, resources: &mut ResourceSet) -> Registration {
        let offered = principal_resources(
            &self.config.principal,
            self.config.policy_document.as_ref(),
        );
        let registration = resources.register(offered);

        for logical_id in &registration.kept {
            self.output
                .warning(&format!("Resource {logical_id} already declared, keeping it"));
        }

        registration
    }

    /// The IAM user keys are rotated for.
    ///
    /// A `UserName` declared on the deploy user resource wins over the
    /// configured principal.
    fn rotation_principal(&self, resources: &ResourceSet) -> Result<Principal> {
        let Some(value) = resources.declared_user_name() else {
            return Ok(self.config.principal.clone());
        };

        let principal =
            Principal::new(value).map_err(|source| ConfigError::InvalidDeclaredPrincipal {
                logical_id: USER_LOGICAL_ID,
                value: value.to_string(),
                source,
            })?;

        if principal != self.config.principal {
            tracing::debug!(
                "Using declared user {} instead of principal {}",
                principal,
                self.config.principal
            );
        }

        Ok(principal)
    }

    async fn on_after_deploy(&self, resources: &ResourceSet) -> Result<AfterDeployReport> {
        match self.mode {
            StageMode::Deploying => {
                // Local checks run before any key is touched.
                let plan = deploy::plan_bucket(self.config.bucket.as_ref(), resources)?;
                let principal = self.rotation_principal(resources)?;

                let report = with_lease(
                    self.client,
                    &principal,
                    async |lease: &CredentialLease| {
                        deploy::deploy_with_plan(self.client, self.config, &plan, lease, self.output)
                            .await
                    },
                )
                .await?;
                Ok(AfterDeployReport::Full(report))
            }
            StageMode::Observing => {
                let report = deploy::deploy_sites(
                    self.client,
                    self.config,
                    resources,
                    self.mode,
                    self.output,
                )
                .await?;
                Ok(AfterDeployReport::SitesOnly(report))
            }
        }
    }
}
