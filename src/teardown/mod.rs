// ABOUTME: Teardown of deployed render functions in every configured region.
// ABOUTME: Runs under ambient credentials; a region with nothing deployed is a no-op.

mod error;

pub use error::TeardownError;

use snafu::ResultExt;

use crate::config::DeploymentConfig;
use crate::output::Output;
use crate::remote::{Credentials, FunctionOps};
use crate::types::{FunctionName, Region};

use error::{DeleteFunctionSnafu, ListFunctionsSnafu};

/// Functions deleted per region, in region order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub regions: Vec<(Region, Vec<FunctionName>)>,
}

impl TeardownReport {
    pub fn deleted_count(&self) -> usize {
        self.regions.iter().map(|(_, deleted)| deleted.len()).sum()
    }
}

/// Delete every function in every configured region.
///
/// Listing is not filtered by compatibility, so functions from older
/// renderer versions are removed too. The first failure aborts the teardown.
pub async fn teardown<F>(
    client: &F,
    config: &DeploymentConfig,
    output: &Output,
) -> Result<TeardownReport, TeardownError>
where
    F: FunctionOps + ?Sized,
{
    let mut report = TeardownReport::default();

    for region in config.deploy_regions.iter() {
        let functions = client
            .get_functions(Credentials::Ambient, region, false)
            .await
            .context(ListFunctionsSnafu {
                region: region.clone(),
            })?;

        tracing::debug!("Found {} function(s) in {}", functions.len(), region);

        let mut deleted = Vec::with_capacity(functions.len());
        for function in functions {
            let name = function.function_name;
            output.progress(&format!("Deleting {name}"));
            client
                .delete_function(Credentials::Ambient, region, &name)
                .await
                .context(DeleteFunctionSnafu {
                    region: region.clone(),
                    function_name: name.clone(),
                })?;
            output.progress(&format!("Deleted {name}"));
            deleted.push(name);
        }

        report.regions.push((region.clone(), deleted));
    }

    Ok(report)
}
