// ABOUTME: Remote resource client: capability traits and the bridge implementation.
// ABOUTME: The orchestrators depend only on the traits; BridgeClient talks to the cloud.

mod bridge;
mod error;
pub mod traits;

pub(crate) use bridge::resolve_program;
pub use bridge::{BRIDGE_ENV, BridgeClient, LEASE_KEY_ID_ENV, LEASE_SECRET_ENV};
pub use error::{INVALID_CLIENT_TOKEN_CODE, RemoteError, RemoteErrorKind, UNRECOGNIZED_CLIENT_NAME};
pub use traits::*;
