use anyhow::{Result, bail};
use dagkit::{AutoConfirm, ConfirmCallback, DeployContext, TeardownSummary};

use crate::Context;
use crate::cli::DestroyArgs;
use crate::progress::SpinnerObserver;
use crate::ui;

/// Word the operator has to type to confirm
const CONFIRM_WORD: &str = "destroy";

/// Confirmation that requires typing [`CONFIRM_WORD`]
struct TypedConfirm;

impl ConfirmCallback for TypedConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        use dialoguer::Input;

        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(is_confirmation(&answer))
    }
}

fn is_confirmation(answer: &str) -> bool {
    answer.trim() == CONFIRM_WORD
}

pub fn run(ctx: &Context, args: DestroyArgs) -> Result<()> {
    let loaded = super::load(ctx, &args.graph.file)?;
    let node_count = loaded.document.nodes.len();

    if !ctx.quiet {
        ui::header("Destroy");
        ui::kv("graph", &args.graph.file.display().to_string());
        ui::kv("nodes", &node_count.to_string());
        ui::kv("region", dagkit::Session::region(&loaded.session));
        println!();
    }

    let mut confirm: Box<dyn ConfirmCallback> = if args.yes || !loaded.config.confirm_destroy {
        Box::new(AutoConfirm)
    } else {
        Box::new(TypedConfirm)
    };
    let prompt = format!(
        "Type '{}' to tear down {}",
        CONFIRM_WORD,
        ui::count(node_count, "node")
    );
    if !confirm.confirm(&prompt)? {
        ui::warn("Aborted, nothing was destroyed");
        return Ok(());
    }

    let deploy_ctx = DeployContext::new(&loaded.session, &loaded.document);
    let mut observer = SpinnerObserver::new(ctx.quiet);
    let outcomes = dagkit::teardown_with(&loaded.registry, &deploy_ctx, &mut observer);
    drop(observer);

    let summary = TeardownSummary::from_outcomes(&outcomes);
    for outcome in outcomes.iter().filter(|o| o.is_failed()) {
        ui::warn(&format!(
            "{} ({}): {}",
            outcome.node,
            outcome.kind,
            outcome.error().unwrap_or_default()
        ));
    }
    print_summary(&summary);

    if !summary.is_success() {
        bail!(
            "{} failed to tear down",
            ui::count(summary.failed, "node")
        );
    }
    Ok(())
}

fn print_summary(summary: &TeardownSummary) {
    println!();
    if summary.is_success() {
        ui::success("Teardown complete");
    } else {
        ui::warn("Teardown finished with errors");
    }
    if summary.destroyed > 0 {
        println!("    • {} destroyed", ui::count(summary.destroyed, "node"));
    }
    if summary.skipped > 0 {
        println!("    • {} skipped", ui::count(summary.skipped, "node"));
    }
    if summary.failed > 0 {
        println!("    • {} failed", ui::count(summary.failed, "node"));
    }
}
