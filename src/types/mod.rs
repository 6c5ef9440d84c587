// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent resource name confusion at compile time.

mod id;
mod principal;
mod region;

pub use id::{AccessKeyId, BucketName, FunctionName, Id, SiteName};
pub use principal::{DEFAULT_PRINCIPAL, Principal, PrincipalError};
pub use region::{Region, RegionError};
