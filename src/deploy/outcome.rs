// ABOUTME: Per-region results of deploy and site-only passes.
// ABOUTME: Reports also carry how many attempts the region loop needed.

use crate::types::{BucketName, FunctionName, Region, SiteName};

/// One region's successfully deployed site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOutcome {
    pub region: Region,
    pub bucket_name: BucketName,
    pub site_name: SiteName,
    pub serve_url: String,
}

/// One region's function and site after a successful pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub function_name: FunctionName,
    pub already_existed: bool,
    pub site: SiteOutcome,
}

impl DeployOutcome {
    pub fn region(&self) -> &Region {
        &self.site.region
    }

    pub fn serve_url(&self) -> &str {
        &self.site.serve_url
    }
}

/// Result of a full deploy cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    /// Outcomes of the successful pass, in region order.
    pub outcomes: Vec<DeployOutcome>,
    /// Number of times the region loop started, including the successful one.
    pub attempts: u32,
}

/// Result of the reduced site-only path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitesReport {
    pub deployed: Vec<SiteOutcome>,
    /// Regions whose site deploy was gated off (no bucket configured).
    pub skipped: Vec<Region>,
}
