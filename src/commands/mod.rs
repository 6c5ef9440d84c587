// ABOUTME: Command module aggregator for the renderdeploy CLI.
// ABOUTME: Re-exports deploy, remove, and resources command handlers.

mod deploy;
mod remove;
mod resources;

pub use deploy::deploy;
pub use remove::remove;
pub use resources::print_resources;
