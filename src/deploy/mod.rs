// ABOUTME: Deploy orchestration for the render function and site.
// ABOUTME: Sequential region fan-out under one credential lease with bounded retry.

mod bucket;
mod error;
mod orchestrator;
mod outcome;
mod retry;

pub use bucket::{BucketPlan, BucketResolution, plan_bucket};
pub use error::{DeployError, DeployErrorKind};
pub use orchestrator::{deploy, deploy_sites, deploy_with_plan};
pub use outcome::{DeployOutcome, DeployReport, SiteOutcome, SitesReport};
pub use retry::RetryPolicy;
