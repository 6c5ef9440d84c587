// ABOUTME: Library root for renderdeploy - exposes the orchestrators for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod credentials;
pub mod deploy;
pub mod error;
pub mod lifecycle;
pub mod output;
pub mod remote;
pub mod resources;
pub mod teardown;
pub mod types;
