// ABOUTME: Listing commands for targets and services.
// ABOUTME: Services are shown sorted by title, the order operators pick from.

use hephaestus::error::Result;
use hephaestus::output::{Output, OutputMode};
use hephaestus::registry::Registry;
use serde::Serialize;

#[derive(Serialize)]
struct TargetRow<'a> {
    name: &'a str,
    title: &'a str,
}

#[derive(Serialize)]
struct ServiceRow<'a> {
    title: &'a str,
    label: &'a str,
    folder: &'a str,
    git: Option<&'a str>,
}

pub fn list_targets(registry: &Registry, output: &Output) {
    for (name, title) in registry.targets() {
        if output.mode() == OutputMode::Json {
            let row = TargetRow {
                name: name.as_str(),
                title,
            };
            output.record("target", &row);
        } else {
            println!("{name}\t{title}");
        }
    }
}

pub fn list_services(registry: &Registry, target: &str, output: &Output) -> Result<()> {
    let mut services = registry.services(target)?;
    services.sort_by(|a, b| a.title().cmp(b.title()));

    for service in &services {
        let row = ServiceRow {
            title: service.title(),
            label: service.label().as_str(),
            folder: service.folder(),
            git: service.source().map(|repo| repo.url()),
        };
        if output.mode() == OutputMode::Json {
            output.record("service", &row);
        } else {
            println!(
                "{}\t{}\t{}",
                row.title,
                row.label,
                row.git.unwrap_or("-")
            );
        }
    }

    Ok(())
}
