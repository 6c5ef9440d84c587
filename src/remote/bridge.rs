// ABOUTME: Remote client that delegates each operation to a bridge process.
// ABOUTME: JSON request on stdin, JSON response on stdout, JSON error on stderr.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use nonempty::NonEmpty;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::error::RemoteError;
use super::traits::{
    AccessKey, AccessKeyMetadata, BucketOps, Credentials, DeployedFunction, DeployedSite,
    FunctionOps, FunctionSummary, IdentityOps, SiteOps, SiteRequest,
};
use crate::config::LambdaSettings;
use crate::types::{AccessKeyId, BucketName, FunctionName, Principal, Region};

/// Overrides the configured bridge command (whitespace separated).
pub const BRIDGE_ENV: &str = "RENDERDEPLOY_BRIDGE";

/// Child environment variable carrying the leased access key id.
pub const LEASE_KEY_ID_ENV: &str = "REMOTION_AWS_ACCESS_KEY_ID";

/// Child environment variable carrying the leased secret.
pub const LEASE_SECRET_ENV: &str = "REMOTION_AWS_SECRET_ACCESS_KEY";

/// Runs one bridge process per remote operation.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    command: NonEmpty<String>,
    working_dir: Option<PathBuf>,
}

impl BridgeClient {
    pub fn new(command: NonEmpty<String>) -> Self {
        Self {
            command,
            working_dir: None,
        }
    }

    /// Use `RENDERDEPLOY_BRIDGE` when set and non-empty, `fallback` otherwise.
    pub fn from_env_or(fallback: NonEmpty<String>) -> Self {
        let from_env = std::env::var(BRIDGE_ENV).ok().and_then(|value| {
            NonEmpty::from_vec(value.split_whitespace().map(str::to_string).collect())
        });
        Self::new(from_env.unwrap_or(fallback))
    }

    /// Run the bridge from `dir` (relative entry points resolve there).
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn command(&self) -> &NonEmpty<String> {
        &self.command
    }

    async fn invoke<Req: Serialize + ?Sized>(
        &self,
        operation: &str,
        credentials: Credentials<'_>,
        request: &Req,
    ) -> Result<Vec<u8>, RemoteError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| RemoteError::Protocol(format!("failed to encode {operation}: {e}")))?;

        let mut cmd = Command::new(&self.command.head);
        cmd.args(&self.command.tail)
            .arg(operation)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        if let Some(lease) = credentials.lease() {
            cmd.env(LEASE_KEY_ID_ENV, lease.access_key_id().as_str())
                .env(LEASE_SECRET_ENV, lease.secret().expose());
        }

        tracing::debug!(
            "Invoking bridge operation {} (leased credentials: {})",
            operation,
            credentials.lease().is_some()
        );

        let mut child = cmd.spawn().map_err(RemoteError::Spawn)?;

        if let Some(mut stdin) = child.stdin.take() {
            // A bridge may exit without draining stdin; its exit status decides.
            if let Err(e) = stdin.write_all(&payload).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(RemoteError::Spawn(e));
                }
                tracing::debug!("Bridge closed stdin early during {}", operation);
            }
        }

        let output = child.wait_with_output().await.map_err(RemoteError::Spawn)?;

        if output.status.success() {
            return Ok(output.stdout);
        }

        Err(decode_failure(operation, output.status.code(), &output.stderr))
    }

    async fn call<Req, Resp>(
        &self,
        operation: &str,
        credentials: Credentials<'_>,
        request: &Req,
    ) -> Result<Resp, RemoteError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let stdout = self.invoke(operation, credentials, request).await?;
        serde_json::from_slice(&stdout).map_err(|e| {
            RemoteError::Protocol(format!("invalid {operation} response: {e}"))
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct BridgeFailure {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn decode_failure(operation: &str, status: Option<i32>, stderr: &[u8]) -> RemoteError {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();

    let failure = serde_json::from_str::<BridgeFailure>(text).unwrap_or_else(|_| BridgeFailure {
        message: (!text.is_empty()).then(|| text.to_string()),
        ..Default::default()
    });

    let message = failure.message.unwrap_or_else(|| match status {
        Some(code) => format!("{operation} exited with status {code}"),
        None => format!("{operation} terminated by signal"),
    });

    RemoteError::Service {
        code: failure.code,
        name: failure.name,
        message,
    }
}

// Wire shapes

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegionRequest<'a> {
    region: &'a Region,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployFunctionRequest<'a> {
    region: &'a Region,
    #[serde(flatten)]
    settings: &'a LambdaSettings,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GetFunctionsRequest<'a> {
    region: &'a Region,
    compatible_only: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteFunctionRequest<'a> {
    region: &'a Region,
    function_name: &'a FunctionName,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserRequest<'a> {
    user_name: &'a Principal,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_key_id: Option<&'a AccessKeyId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BucketResponse {
    bucket_name: BucketName,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionResponse {
    version: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListAccessKeysResponse {
    #[serde(default)]
    access_key_metadata: Vec<AccessKeyMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccessKeyResponse {
    access_key: AccessKey,
}

#[async_trait]
impl FunctionOps for BridgeClient {
    async fn deploy_function(
        &self,
        credentials: Credentials<'_>,
        region: &Region,
        settings: &LambdaSettings,
    ) -> Result<DeployedFunction, RemoteError> {
        let request = DeployFunctionRequest { region, settings };
        self.call("deployFunction", credentials, &request).await
    }

    async fn get_functions(
        &self,
        credentials: Credentials<'_>,
        region: &Region,
        compatible_only: bool,
    ) -> Result<Vec<FunctionSummary>, RemoteError> {
        let request = GetFunctionsRequest {
            region,
            compatible_only,
        };
        self.call("getFunctions", credentials, &request).await
    }

    async fn delete_function(
        &self,
        credentials: Credentials<'_>,
        region: &Region,
        function_name: &FunctionName,
    ) -> Result<(), RemoteError> {
        let request = DeleteFunctionRequest {
            region,
            function_name,
        };
        self.invoke("deleteFunction", credentials, &request)
            .await
            .map(drop)
    }
}

#[async_trait]
impl SiteOps for BridgeClient {
    async fn deploy_site(
        &self,
        credentials: Credentials<'_>,
        request: &SiteRequest<'_>,
    ) -> Result<DeployedSite, RemoteError> {
        self.call("deploySite", credentials, request).await
    }

    async fn renderer_version(&self) -> Result<String, RemoteError> {
        let response: VersionResponse = self
            .call("version", Credentials::Ambient, &serde_json::json!({}))
            .await?;
        Ok(response.version)
    }
}

#[async_trait]
impl BucketOps for BridgeClient {
    async fn get_or_create_bucket(
        &self,
        credentials: Credentials<'_>,
        region: &Region,
    ) -> Result<BucketName, RemoteError> {
        let response: BucketResponse = self
            .call("getOrCreateBucket", credentials, &RegionRequest { region })
            .await?;
        Ok(response.bucket_name)
    }
}

#[async_trait]
impl IdentityOps for BridgeClient {
    async fn list_access_keys(
        &self,
        principal: &Principal,
    ) -> Result<Vec<AccessKeyMetadata>, RemoteError> {
        let request = UserRequest {
            user_name: principal,
            access_key_id: None,
        };
        let response: ListAccessKeysResponse = self
            .call("iam.listAccessKeys", Credentials::Ambient, &request)
            .await?;
        Ok(response.access_key_metadata)
    }

    async fn create_access_key(&self, principal: &Principal) -> Result<AccessKey, RemoteError> {
        let request = UserRequest {
            user_name: principal,
            access_key_id: None,
        };
        let response: CreateAccessKeyResponse = self
            .call("iam.createAccessKey", Credentials::Ambient, &request)
            .await?;
        Ok(response.access_key)
    }

    async fn delete_access_key(
        &self,
        principal: &Principal,
        access_key_id: &AccessKeyId,
    ) -> Result<(), RemoteError> {
        let request = UserRequest {
            user_name: principal,
            access_key_id: Some(access_key_id),
        };
        self.invoke("iam.deleteAccessKey", Credentials::Ambient, &request)
            .await
            .map(drop)
    }
}

/// Resolve a bridge program path given relative to `base`.
pub(crate) fn resolve_program(base: &Path, command: NonEmpty<String>) -> NonEmpty<String> {
    let head = Path::new(&command.head);
    if head.components().count() > 1 && head.is_relative() {
        let resolved = base.join(head).to_string_lossy().into_owned();
        NonEmpty {
            head: resolved,
            tail: command.tail,
        }
    } else {
        command
    }
}
