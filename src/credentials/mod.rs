// ABOUTME: Credential rotation for deploy cycles.
// ABOUTME: Revokes stale keys, mints one lease, and guarantees its revocation.

mod error;
mod lease;
mod rotate;

pub use error::{CredentialError, CredentialErrorKind};
pub use lease::CredentialLease;
pub use rotate::{revoke, rotate, with_lease};
