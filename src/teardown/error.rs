// ABOUTME: Teardown error types with SNAFU context selectors.
// ABOUTME: Both failures carry the region being torn down.

use snafu::Snafu;

use crate::remote::RemoteError;
use crate::types::{FunctionName, Region};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TeardownError {
    #[snafu(display("failed to list functions in {region}: {source}"))]
    ListFunctions { region: Region, source: RemoteError },

    #[snafu(display("failed to delete function {function_name} in {region}: {source}"))]
    DeleteFunction {
        region: Region,
        function_name: FunctionName,
        source: RemoteError,
    },
}

impl TeardownError {
    pub fn region(&self) -> &Region {
        match self {
            TeardownError::ListFunctions { region, .. }
            | TeardownError::DeleteFunction { region, .. } => region,
        }
    }

    pub fn remote_source(&self) -> &RemoteError {
        match self {
            TeardownError::ListFunctions { source, .. }
            | TeardownError::DeleteFunction { source, .. } => source,
        }
    }
}
