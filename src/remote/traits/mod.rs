// ABOUTME: Composable capability traits for the remote resource client.
// ABOUTME: Defines FunctionOps, SiteOps, BucketOps, IdentityOps and the RemoteClient umbrella.

mod bucket;
mod credentials;
mod function;
mod identity;
mod site;

pub use bucket::BucketOps;
pub use credentials::Credentials;
pub use function::{DeployedFunction, FunctionOps, FunctionSummary};
pub use identity::{AccessKey, AccessKeyMetadata, IdentityOps, SecretAccessKey};
pub use site::{DeployedSite, SiteOps, SiteRequest};

/// Everything the orchestrators need from the remote side.
///
/// Blanket-implemented for any type providing all four capabilities.
pub trait RemoteClient: FunctionOps + SiteOps + BucketOps + IdentityOps {}

impl<T> RemoteClient for T where T: FunctionOps + SiteOps + BucketOps + IdentityOps {}
