use anyhow::Result;
use colored::Colorize;

use crate::Context;
use crate::cli::GraphArgs;
use crate::ui;

pub fn run(ctx: &Context, args: GraphArgs) -> Result<()> {
    let loaded = super::load(ctx, &args.file)?;
    let order = loaded.validator().plan(&loaded.document)?;

    if ctx.quiet {
        for node in &order {
            println!("{}", node.id);
        }
        return Ok(());
    }

    ui::header("Deployment plan");
    for (i, node) in order.iter().enumerate() {
        ui::step(i + 1, order.len(), &format!("{} {}", node.id, node.kind.dimmed()));
    }

    if !loaded.document.edges.is_empty() {
        ui::section("Wiring");
        for edge in &loaded.document.edges {
            ui::dim(&edge.to_string());
        }
    }

    println!();
    ui::success(&format!(
        "Graph is valid: {}, {}",
        ui::count(order.len(), "node"),
        ui::count(loaded.document.edges.len(), "edge")
    ));
    Ok(())
}
