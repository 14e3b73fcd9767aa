// ABOUTME: Deploy command implementation.
// ABOUTME: Builds the run plan, picks the checkpoint, and prints the run summary.

use hephaestus::deploy::{
    Checkpoint, Orchestrator, Proceed, Prompt, RunPlan, RunReport, ServiceStatus,
};
use hephaestus::error::{Error, Result};
use hephaestus::exec::ProcessRunner;
use hephaestus::output::Output;
use hephaestus::registry::Registry;
use nonempty::NonEmpty;

/// Arguments of the deploy subcommand.
pub struct DeployRequest {
    pub target: String,
    pub services: Vec<String>,
    pub all: bool,
    pub clone: bool,
    pub load_balancers: bool,
    pub node_ports: bool,
    pub confirm: bool,
}

pub async fn deploy(registry: &Registry, request: DeployRequest, mut output: Output) -> Result<()> {
    output.start_timer();
    output.progress("Starting Hephaestus");

    let titles = if request.all {
        registry
            .services(&request.target)?
            .iter()
            .map(|s| s.title().to_string())
            .collect()
    } else {
        request.services
    };
    let services = NonEmpty::from_vec(titles).ok_or_else(|| {
        Error::InvalidConfig(format!("target {} has no services", request.target))
    })?;

    let plan = RunPlan::new(request.target, services)
        .clone_sources(request.clone)
        .apply_load_balancers(request.load_balancers)
        .apply_node_ports(request.node_ports);

    // Only a fresh clone leaves configuration for the operator to fill in.
    let prompt;
    let checkpoint: &dyn Checkpoint = if request.confirm && request.clone {
        prompt = Prompt::stdio();
        &prompt
    } else {
        &Proceed
    };

    let runner = ProcessRunner;
    let report = Orchestrator::new(registry, &runner, checkpoint, &output)
        .run(&plan)
        .await?;

    summarize(&report, &output);
    Ok(())
}

fn summarize(report: &RunReport, output: &Output) {
    output.record("report", report);

    output.progress("");
    for service in &report.services {
        match &service.status {
            ServiceStatus::Deployed => {
                let warnings = report.diagnostics().for_service(&service.title).count();
                if warnings > 0 {
                    output.progress(&format!("  ✓ {} ({warnings} warning(s))", service.title));
                } else {
                    output.progress(&format!("  ✓ {}", service.title));
                }
            }
            ServiceStatus::Failed { stage, error } => {
                output.progress(&format!("  ✗ {} ({stage}): {error}", service.title))
            }
            ServiceStatus::Pending => output.progress(&format!("  - {}", service.title)),
        }
    }

    let failed = report.failed().count();
    if failed == 0 {
        output.success("Hephaestus completed successfully!");
    } else {
        output.warning(&format!(
            "{failed} of {} service(s) failed",
            report.services.len()
        ));
        output.success("Hephaestus completed with failures");
    }

    output.progress("You can check pod status by typing `kubectl get pods`");
    output.progress("You can check service status by typing `kubectl get services`");
    output.progress("To find NodePort IPs and ports type:");
    output.progress("kubectl get nodes -o wide | awk '{print $1\" \"$2\" \"$6}' | column -t");
}
