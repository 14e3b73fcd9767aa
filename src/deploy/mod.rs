// ABOUTME: Run orchestration: sequences pipeline stages across selected services.
// ABOUTME: Exports the orchestrator, run plan, checkpoint and run report types.

mod checkpoint;
mod orchestrator;
mod plan;
mod report;

pub use checkpoint::{Checkpoint, Proceed, Prompt};
pub use orchestrator::Orchestrator;
pub use plan::RunPlan;
pub use report::{RunReport, ServiceReport, ServiceStatus};
