pub mod deploy;
pub mod destroy;
pub mod kinds;
pub mod plan;

use anyhow::{Context as AnyhowContext, Result};
use dagkit::{GraphDocument, Registry, Validator};
use std::path::Path;

use crate::Context;
use crate::config::Config;
use crate::document;
use crate::services;
use crate::session::LocalSession;

/// Everything a graph command needs, loaded once
pub struct Loaded {
    pub document: GraphDocument,
    pub config: Config,
    pub registry: Registry,
    pub session: LocalSession,
}

impl Loaded {
    /// Structural validation plus the rules declared in the config
    pub fn validator(&self) -> Validator {
        Validator::for_registry(&self.registry).with_rules(self.config.consistency_rules())
    }
}

pub fn load(ctx: &Context, file: &Path) -> Result<Loaded> {
    let config = Config::load(ctx.config.as_deref())?;
    let document = document::load(file)?;
    let registry = services::registry().context("Failed to register built-in services")?;
    let session = LocalSession::resolve(&document, &config);

    log::info!(
        "loaded {}: {} node(s), {} edge(s), region {}",
        file.display(),
        document.nodes.len(),
        document.edges.len(),
        dagkit::Session::region(&session)
    );

    Ok(Loaded {
        document,
        config,
        registry,
        session,
    })
}
