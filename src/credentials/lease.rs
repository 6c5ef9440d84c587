// ABOUTME: Short-lived access key pair owned by exactly one deploy cycle.
// ABOUTME: Carries the principal it was issued for; the secret never prints.

use chrono::{DateTime, Utc};

use crate::remote::{AccessKey, SecretAccessKey};
use crate::types::{AccessKeyId, Principal};

/// A rotated key pair scoped to one deploy cycle.
///
/// Only `rotate` creates leases and only `revoke` consumes them, so the
/// cycle that holds one is the only thing that can end it.
#[derive(Debug)]
pub struct CredentialLease {
    principal: Principal,
    access_key_id: AccessKeyId,
    secret: SecretAccessKey,
    issued_at: DateTime<Utc>,
}

impl CredentialLease {
    pub(crate) fn issue(principal: Principal, key: AccessKey) -> Self {
        Self {
            principal,
            access_key_id: key.access_key_id,
            secret: key.secret_access_key,
            issued_at: key.create_date.unwrap_or_else(Utc::now),
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn access_key_id(&self) -> &AccessKeyId {
        &self.access_key_id
    }

    pub fn secret(&self) -> &SecretAccessKey {
        &self.secret
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}
