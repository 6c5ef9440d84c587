// ABOUTME: Credential selection passed explicitly to every remote call.
// ABOUTME: Either the operator's ambient credentials or a rotated lease.

use crate::credentials::CredentialLease;

/// Which credentials a remote call runs under.
#[derive(Debug, Clone, Copy)]
pub enum Credentials<'a> {
    /// Whatever the remote client picks up from its own environment.
    Ambient,
    /// A short-lived key pair owned by the current deploy cycle.
    Leased(&'a CredentialLease),
}

impl<'a> Credentials<'a> {
    pub fn lease(&self) -> Option<&'a CredentialLease> {
        match *self {
            Credentials::Ambient => None,
            Credentials::Leased(lease) => Some(lease),
        }
    }
}
