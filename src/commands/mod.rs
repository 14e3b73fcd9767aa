// ABOUTME: Command module aggregator for the hephaestus CLI.
// ABOUTME: Re-exports deploy and listing command handlers.

mod deploy;
mod list;

pub use deploy::{DeployRequest, deploy};
pub use list::{list_services, list_targets};
