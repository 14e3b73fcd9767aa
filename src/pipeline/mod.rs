// ABOUTME: Deployment pipeline stages and their failure policy.
// ABOUTME: Each stage performs one external effect and reports a typed Outcome.

mod context;
mod error;
mod stage;
mod stages;

pub use context::DeployContext;
pub use error::StageError;
pub use stage::{Effect, FailurePolicy, Outcome, Stage};
pub use stages::Pipeline;
