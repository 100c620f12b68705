use anyhow::Result;
use dagkit::{DeployContext, Deployment};

use crate::Context;
use crate::cli::GraphArgs;
use crate::progress::SpinnerObserver;
use crate::ui;

pub fn run(ctx: &Context, args: GraphArgs) -> Result<()> {
    let loaded = super::load(ctx, &args.file)?;
    let validator = loaded.validator();
    let deploy_ctx = DeployContext::new(&loaded.session, &loaded.document);

    let mut observer = SpinnerObserver::new(ctx.quiet);
    let mut deployment = Deployment::new(&loaded.registry, &deploy_ctx);
    let result = deployment.run_with(&validator, &mut observer);
    observer.clear();

    if let Err(e) = result {
        let refs = deployment.refs();
        if !refs.is_empty() {
            ui::warn(&format!(
                "{} deployed before the failure (nothing was rolled back):",
                ui::count(refs.len(), "node")
            ));
            println!("{}", refs.to_pretty_json()?);
        }
        return Err(anyhow::Error::new(e).context("Deployment failed"));
    }

    let refs = deployment.into_refs();
    println!("{}", refs.to_pretty_json()?);
    if !ctx.quiet {
        ui::success(&format!("Deployed {}", ui::count(refs.len(), "node")));
    }
    Ok(())
}
