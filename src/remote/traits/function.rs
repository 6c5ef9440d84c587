// ABOUTME: Render function operations for the remote client.
// ABOUTME: Deploy (idempotent), list, and delete functions in a region.

use super::credentials::Credentials;
use crate::config::LambdaSettings;
use crate::remote::RemoteError;
use crate::types::{FunctionName, Region};
use async_trait::async_trait;
use serde::Deserialize;

/// Render function lifecycle operations.
#[async_trait]
pub trait FunctionOps: Send + Sync {
    /// Deploy the render function to `region`.
    ///
    /// Must be idempotent: deploying an unchanged function again returns
    /// `already_existed = true` and changes nothing.
    async fn deploy_function(
        &self,
        credentials: Credentials<'_>,
        region: &Region,
        settings: &LambdaSettings,
    ) -> Result<DeployedFunction, RemoteError>;

    /// List deployed functions in `region`.
    async fn get_functions(
        &self,
        credentials: Credentials<'_>,
        region: &Region,
        compatible_only: bool,
    ) -> Result<Vec<FunctionSummary>, RemoteError>;

    /// Delete one function from `region`.
    async fn delete_function(
        &self,
        credentials: Credentials<'_>,
        region: &Region,
        function_name: &FunctionName,
    ) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedFunction {
    pub function_name: FunctionName,
    pub already_existed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSummary {
    pub function_name: FunctionName,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub memory_size_in_mb: Option<u32>,
}
