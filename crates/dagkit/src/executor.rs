//! Deployment orchestrator - the two-phase create-then-wire protocol
//!
//! Phase one deploys every node in scheduler order, storing each record
//! before moving on. Phase two offers every edge, in document order, to the
//! wiring capability of both endpoint kinds. Everything runs sequentially on
//! the calling thread; the first failure aborts the run and nothing is
//! rolled back.

use crate::context::{DeployContext, DeployObserver, NoProgress, Phase};
use crate::error::{Error, GraphError, Result};
use crate::refs::ReferenceTable;
use crate::registry::{Registry, RegisteredService};
use crate::types::Node;
use crate::validator::Validator;
use log::{debug, info};

/// One deployment run over the document held by the context
///
/// The reference table stays readable after a failure, so callers can
/// report which nodes were created before the run stopped.
pub struct Deployment<'a> {
    registry: &'a Registry,
    ctx: &'a DeployContext<'a>,
    refs: ReferenceTable,
}

impl<'a> Deployment<'a> {
    pub fn new(registry: &'a Registry, ctx: &'a DeployContext<'a>) -> Self {
        Self {
            registry,
            ctx,
            refs: ReferenceTable::new(),
        }
    }

    /// Records produced so far
    pub fn refs(&self) -> &ReferenceTable {
        &self.refs
    }

    pub fn into_refs(self) -> ReferenceTable {
        self.refs
    }

    /// Run with structural validation only and no progress reporting
    pub fn run(&mut self) -> Result<()> {
        let validator = Validator::for_registry(self.registry);
        self.run_with(&validator, &mut NoProgress)
    }

    /// Validate, deploy every node, then wire every edge
    pub fn run_with<O: DeployObserver>(
        &mut self,
        validator: &Validator,
        observer: &mut O,
    ) -> Result<()> {
        let order = validator.plan(self.ctx.document)?;
        self.instantiate(&order, observer)?;
        self.wire_edges(observer)
    }

    fn instantiate<O: DeployObserver>(&mut self, order: &[&Node], observer: &mut O) -> Result<()> {
        info!("deploying {} node(s)", order.len());
        observer.on_phase_start(Phase::Deploy, order.len());

        for node in order {
            let entry = self.service_for(node)?;
            observer.on_node_start(Phase::Deploy, node);
            debug!("deploy {} ({})", node.id, node.kind);

            let record = entry
                .service()
                .deploy(node, self.ctx, &self.refs)
                .map_err(|source| Error::Deploy {
                    node: node.id.clone(),
                    kind: node.kind.clone(),
                    source,
                })?;

            observer.on_node_deployed(node, &record);
            self.refs.insert(node.id.clone(), record);
        }

        observer.on_phase_complete(Phase::Deploy);
        Ok(())
    }

    fn wire_edges<O: DeployObserver>(&mut self, observer: &mut O) -> Result<()> {
        let document = self.ctx.document;
        info!("wiring {} edge(s)", document.edges.len());
        observer.on_phase_start(Phase::Wire, document.edges.len());

        for edge in &document.edges {
            for endpoint in [&edge.from, &edge.to] {
                let node = document
                    .node(endpoint)
                    .ok_or_else(|| GraphError::DanglingEdge {
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                        missing: endpoint.clone(),
                    })?;
                let entry = self.service_for(node)?;
                let Some(wiring) = entry.wiring() else {
                    continue;
                };

                let outcome =
                    wiring
                        .wire(edge, &mut self.refs, self.ctx)
                        .map_err(|source| Error::Wire {
                            from: edge.from.clone(),
                            to: edge.to.clone(),
                            via: edge.via.clone(),
                            kind: node.kind.clone(),
                            source,
                        })?;
                debug!("wire {} by {}: {:?}", edge, node.kind, outcome);
                observer.on_edge_wired(edge, &node.kind, outcome);
            }
        }

        observer.on_phase_complete(Phase::Wire);
        Ok(())
    }

    fn service_for(&self, node: &Node) -> Result<&'a RegisteredService> {
        self.registry.get(&node.kind).ok_or_else(|| {
            Error::Graph(GraphError::UnknownKind {
                node: node.id.clone(),
                kind: node.kind.clone(),
            })
        })
    }
}

/// Deploy the context's document and return the final reference table
pub fn deploy(registry: &Registry, ctx: &DeployContext<'_>) -> Result<ReferenceTable> {
    let mut deployment = Deployment::new(registry, ctx);
    deployment.run()?;
    Ok(deployment.into_refs())
}
