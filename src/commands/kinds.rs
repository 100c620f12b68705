use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;
use dagkit::{Capabilities, PortDescriptor, Registry};
use serde::Serialize;

use crate::Context;
use crate::cli::KindsArgs;
use crate::services;
use crate::ui;

#[derive(Debug, Serialize)]
struct KindInfo<'a> {
    kind: &'a str,
    description: &'a str,
    ports: &'a PortDescriptor,
    capabilities: Capabilities,
}

fn describe(registry: &Registry) -> Vec<KindInfo<'_>> {
    registry
        .iter()
        .map(|entry| KindInfo {
            kind: entry.kind(),
            description: entry.service().description(),
            ports: entry.ports(),
            capabilities: entry.capabilities(),
        })
        .collect()
}

pub fn run(ctx: &Context, args: KindsArgs) -> Result<()> {
    let registry = services::registry().context("Failed to register built-in services")?;
    let kinds = describe(&registry);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&kinds)?);
        return Ok(());
    }

    if ctx.quiet {
        for info in &kinds {
            println!("{}", info.kind);
        }
        return Ok(());
    }

    ui::header("Registered kinds");
    for info in &kinds {
        println!();
        println!("  {} {}", info.kind.bold(), info.description.dimmed());
        ui::kv("  accepts", &ui::list_or_dash(info.ports.inputs()));
        ui::kv("  offers", &ui::list_or_dash(info.ports.outputs()));

        let mut caps = vec!["deploy"];
        if info.capabilities.wire {
            caps.push("wire");
        }
        if info.capabilities.destroy {
            caps.push("destroy");
        }
        ui::kv("  can", &caps.join(", "));
    }
    Ok(())
}
