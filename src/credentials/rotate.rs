// ABOUTME: Rotation and revocation of deploy-cycle access keys.
// ABOUTME: with_lease scopes a lease to one async body and revokes on every exit path.

use std::ops::AsyncFnOnce;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::join_all;
use snafu::ResultExt;

use super::error::{
    CreateKeySnafu, CredentialError, DeleteStaleKeySnafu, ListKeysSnafu, RevokeSnafu,
};
use super::lease::CredentialLease;
use crate::remote::IdentityOps;
use crate::types::Principal;

/// Replace every access key of `principal` with one fresh key pair.
///
/// Stale keys are deleted concurrently. All deletions settle before the
/// outcome is decided; if any of them failed, no key is created and the
/// first failure is returned.
pub async fn rotate<I>(identity: &I, principal: &Principal) -> Result<CredentialLease, CredentialError>
where
    I: IdentityOps + ?Sized,
{
    let stale = identity
        .list_access_keys(principal)
        .await
        .context(ListKeysSnafu {
            principal: principal.clone(),
        })?;

    tracing::debug!(
        "Revoking {} stale access key(s) for {}",
        stale.len(),
        principal
    );

    let deletions = stale.iter().map(|key| async move {
        identity
            .delete_access_key(principal, &key.access_key_id)
            .await
            .context(DeleteStaleKeySnafu {
                principal: principal.clone(),
                access_key_id: key.access_key_id.clone(),
            })
    });

    join_all(deletions)
        .await
        .into_iter()
        .collect::<Result<Vec<()>, _>>()?;

    let key = identity
        .create_access_key(principal)
        .await
        .context(CreateKeySnafu {
            principal: principal.clone(),
        })?;

    tracing::info!("Issued access key {} for {}", key.access_key_id, principal);

    Ok(CredentialLease::issue(principal.clone(), key))
}

/// Delete the lease's key. Not retried.
pub async fn revoke<I>(identity: &I, lease: CredentialLease) -> Result<(), CredentialError>
where
    I: IdentityOps + ?Sized,
{
    identity
        .delete_access_key(lease.principal(), lease.access_key_id())
        .await
        .context(RevokeSnafu {
            principal: lease.principal().clone(),
            access_key_id: lease.access_key_id().clone(),
        })?;

    tracing::info!(
        "Revoked access key {} for {}",
        lease.access_key_id(),
        lease.principal()
    );
    Ok(())
}

/// Rotate, run `body` with the lease, then revoke it.
///
/// Revocation happens after success, after failure, and before a panic in
/// `body` resumes unwinding. When `body` fails and revocation fails too, the
/// body's error wins and the orphaned key is logged.
pub async fn with_lease<I, T, E, F>(identity: &I, principal: &Principal, body: F) -> Result<T, E>
where
    I: IdentityOps + ?Sized,
    F: AsyncFnOnce(&CredentialLease) -> Result<T, E>,
    E: From<CredentialError>,
{
    let lease = rotate(identity, principal).await?;

    let outcome = AssertUnwindSafe(body(&lease)).catch_unwind().await;

    let revoked = revoke(identity, lease).await;

    match outcome {
        Ok(Ok(value)) => {
            revoked?;
            Ok(value)
        }
        Ok(Err(err)) => {
            if let Err(revoke_err) = revoked {
                tracing::error!("Access key left behind after failed deploy: {}", revoke_err);
            }
            Err(err)
        }
        Err(panic) => {
            if let Err(revoke_err) = revoked {
                tracing::error!("Access key left behind after panic: {}", revoke_err);
            }
            std::panic::resume_unwind(panic)
        }
    }
}
