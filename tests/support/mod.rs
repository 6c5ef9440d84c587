// ABOUTME: Test support utilities.
// ABOUTME: Provides an in-memory fake cloud and project fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use renderdeploy::config::{LambdaSettings, Project};
use renderdeploy::remote::{
    AccessKey, AccessKeyMetadata, BucketOps, Credentials, DeployedFunction, DeployedSite,
    FunctionOps, FunctionSummary, INVALID_CLIENT_TOKEN_CODE, IdentityOps, RemoteError,
    SecretAccessKey, SiteOps, SiteRequest,
};
use renderdeploy::types::{AccessKeyId, BucketName, FunctionName, Principal, Region};
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("renderdeploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Minimal settings with one region, plus whatever `extra` adds.
pub fn project(extra: &str) -> Project {
    let yaml = format!(
        "entryPoint: src/index.ts\ndeployStage: prod\ndeployRegions:\n  - us-east-1\n{extra}"
    );
    Project::from_yaml(&yaml, Path::new("/work")).unwrap()
}

pub fn region(value: &str) -> Region {
    Region::new(value).unwrap()
}

pub fn principal() -> Principal {
    Principal::new("remotion-user").unwrap()
}

/// The error a freshly created key produces before it has propagated.
pub fn transient() -> RemoteError {
    RemoteError::service(
        INVALID_CLIENT_TOKEN_CODE,
        "The security token included in the request is invalid.",
    )
}

pub fn fatal() -> RemoteError {
    RemoteError::service("AccessDenied", "not allowed")
}

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Version,
    DeployFunction {
        region: String,
        key: Option<String>,
    },
    GetFunctions {
        region: String,
        compatible_only: bool,
    },
    DeleteFunction {
        region: String,
        function_name: String,
    },
    GetOrCreateBucket {
        region: String,
    },
    DeploySite {
        region: String,
        bucket: String,
        site: String,
        key: Option<String>,
    },
    ListKeys,
    CreateKey,
    DeleteKey(String),
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    principals: Vec<String>,
    live_keys: Vec<String>,
    issued: u32,
    functions: BTreeMap<String, Vec<String>>,
    deploy_function_failures: VecDeque<RemoteError>,
    always_fail_deploy_function: Option<fn() -> RemoteError>,
    site_failures: VecDeque<RemoteError>,
    failing_key_deletions: HashSet<String>,
    fail_create_key: bool,
}

/// In-memory stand-in for every remote capability.
///
/// Issued keys are named `AKIANEW1`, `AKIANEW2`, ... in creation order.
pub struct FakeCloud {
    state: Mutex<State>,
    version: String,
}

impl Default for FakeCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCloud {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            version: "4.0.0".to_string(),
        }
    }

    pub fn with_keys(self, keys: &[&str]) -> Self {
        self.state
            .lock()
            .live_keys
            .extend(keys.iter().map(|k| k.to_string()));
        self
    }

    pub fn with_functions(self, region: &str, names: &[&str]) -> Self {
        self.state.lock().functions.insert(
            region.to_string(),
            names.iter().map(|n| n.to_string()).collect(),
        );
        self
    }

    /// Fail the next deploy_function calls with these errors, in order.
    pub fn fail_deploy_function(self, errors: impl IntoIterator<Item = RemoteError>) -> Self {
        self.state.lock().deploy_function_failures.extend(errors);
        self
    }

    pub fn always_fail_deploy_function(self, error: fn() -> RemoteError) -> Self {
        self.state.lock().always_fail_deploy_function = Some(error);
        self
    }

    pub fn fail_deploy_site(self, errors: impl IntoIterator<Item = RemoteError>) -> Self {
        self.state.lock().site_failures.extend(errors);
        self
    }

    pub fn fail_key_deletion(self, key: &str) -> Self {
        self.state.lock().failing_key_deletions.insert(key.to_string());
        self
    }

    pub fn fail_create_key(self) -> Self {
        self.state.lock().fail_create_key = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| matches(c)).count()
    }

    /// Principals named by every identity call, in call order.
    pub fn principals(&self) -> Vec<String> {
        self.state.lock().principals.clone()
    }

    pub fn live_keys(&self) -> Vec<String> {
        self.state.lock().live_keys.clone()
    }

    pub fn functions(&self, region: &str) -> Vec<String> {
        self.state
            .lock()
            .functions
            .get(region)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: Call) {
        self.state.lock().calls.push(call);
    }

    fn record_identity(&self, call: Call, principal: &Principal) {
        let mut state = self.state.lock();
        state.calls.push(call);
        state.principals.push(principal.to_string());
    }
}

fn key_of(credentials: Credentials<'_>) -> Option<String> {
    credentials
        .lease()
        .map(|lease| lease.access_key_id().to_string())
}

#[async_trait]
impl FunctionOps for FakeCloud {
    async fn deploy_function(
        &self,
        credentials: Credentials<'_>,
        region: &Region,
        settings: &LambdaSettings,
    ) -> Result<DeployedFunction, RemoteError> {
        self.record(Call::DeployFunction {
            region: region.to_string(),
            key: key_of(credentials),
        });

        let mut state = self.state.lock();
        if let Some(error) = state.always_fail_deploy_function {
            return Err(error());
        }
        if let Some(error) = state.deploy_function_failures.pop_front() {
            return Err(error);
        }

        let name = format!(
            "render-{}mb-{}sec",
            settings.memory_size_in_mb, settings.timeout_in_seconds
        );
        let deployed = state.functions.entry(region.to_string()).or_default();
        let already_existed = deployed.contains(&name);
        if !already_existed {
            deployed.push(name.clone());
        }

        Ok(DeployedFunction {
            function_name: FunctionName::new(name),
            already_existed,
        })
    }

    async fn get_functions(
        &self,
        _credentials: Credentials<'_>,
        region: &Region,
        compatible_only: bool,
    ) -> Result<Vec<FunctionSummary>, RemoteError> {
        self.record(Call::GetFunctions {
            region: region.to_string(),
            compatible_only,
        });

        Ok(self
            .functions(region.as_str())
            .into_iter()
            .map(|name| FunctionSummary {
                function_name: FunctionName::new(name),
                version: None,
                memory_size_in_mb: None,
            })
            .collect())
    }

    async fn delete_function(
        &self,
        _credentials: Credentials<'_>,
        region: &Region,
        function_name: &FunctionName,
    ) -> Result<(), RemoteError> {
        self.record(Call::DeleteFunction {
            region: region.to_string(),
            function_name: function_name.to_string(),
        });

        if let Some(deployed) = self.state.lock().functions.get_mut(region.as_str()) {
            deployed.retain(|name| name != function_name.as_str());
        }
        Ok(())
    }
}

#[async_trait]
impl SiteOps for FakeCloud {
    async fn deploy_site(
        &self,
        credentials: Credentials<'_>,
        request: &SiteRequest<'_>,
    ) -> Result<DeployedSite, RemoteError> {
        self.record(Call::DeploySite {
            region: request.region.to_string(),
            bucket: request.bucket_name.to_string(),
            site: request.site_name.to_string(),
            key: key_of(credentials),
        });

        if let Some(error) = self.state.lock().site_failures.pop_front() {
            return Err(error);
        }

        Ok(DeployedSite {
            serve_url: format!(
                "https://{}.s3.{}.amazonaws.com/sites/{}/index.html",
                request.bucket_name, request.region, request.site_name
            ),
        })
    }

    async fn renderer_version(&self) -> Result<String, RemoteError> {
        self.record(Call::Version);
        Ok(self.version.clone())
    }
}

#[async_trait]
impl BucketOps for FakeCloud {
    async fn get_or_create_bucket(
        &self,
        _credentials: Credentials<'_>,
        region: &Region,
    ) -> Result<BucketName, RemoteError> {
        self.record(Call::GetOrCreateBucket {
            region: region.to_string(),
        });
        Ok(BucketName::new(format!("remotionlambda-{region}")))
    }
}

#[async_trait]
impl IdentityOps for FakeCloud {
    async fn list_access_keys(
        &self,
        principal: &Principal,
    ) -> Result<Vec<AccessKeyMetadata>, RemoteError> {
        self.record_identity(Call::ListKeys, principal);
        Ok(self
            .live_keys()
            .into_iter()
            .map(|id| AccessKeyMetadata {
                access_key_id: AccessKeyId::new(id),
                status: Some("Active".to_string()),
                create_date: None,
            })
            .collect())
    }

    async fn create_access_key(&self, principal: &Principal) -> Result<AccessKey, RemoteError> {
        self.record_identity(Call::CreateKey, principal);

        let mut state = self.state.lock();
        if state.fail_create_key {
            return Err(RemoteError::service("LimitExceeded", "too many keys"));
        }

        state.issued += 1;
        let id = format!("AKIANEW{}", state.issued);
        state.live_keys.push(id.clone());

        Ok(AccessKey {
            access_key_id: AccessKeyId::new(id),
            secret_access_key: SecretAccessKey::new(format!("secret-{}", state.issued)),
            create_date: None,
        })
    }

    async fn delete_access_key(
        &self,
        principal: &Principal,
        access_key_id: &AccessKeyId,
    ) -> Result<(), RemoteError> {
        self.record_identity(Call::DeleteKey(access_key_id.to_string()), principal);

        let mut state = self.state.lock();
        if state.failing_key_deletions.contains(access_key_id.as_str()) {
            return Err(RemoteError::service("ServiceFailure", "delete failed"));
        }
        state.live_keys.retain(|k| k != access_key_id.as_str());
        Ok(())
    }
}
