//! Teardown orchestrator - best-effort destruction in reverse document order
//!
//! Every node gets an attempt. Failures are collected as outcomes and
//! logged; they never stop the remaining nodes from being processed.

use crate::context::{DeployContext, DeployObserver, NoProgress, Phase};
use crate::registry::Registry;
use crate::types::{Node, NodeId};
use log::{debug, info, warn};
use serde::Serialize;

/// What happened to one node during teardown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TeardownStatus {
    Destroyed,
    /// The kind has no teardown capability
    Skipped { reason: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeardownOutcome {
    pub node: NodeId,
    pub kind: String,
    #[serde(flatten)]
    pub status: TeardownStatus,
}

impl TeardownOutcome {
    fn new(node: &Node, status: TeardownStatus) -> Self {
        Self {
            node: node.id.clone(),
            kind: node.kind.clone(),
            status,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, TeardownStatus::Failed { .. })
    }

    /// Error message of a failed attempt
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            TeardownStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Counts of teardown outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeardownSummary {
    pub destroyed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl TeardownSummary {
    pub fn from_outcomes(outcomes: &[TeardownOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.add(outcome);
        }
        summary
    }

    pub fn add(&mut self, outcome: &TeardownOutcome) {
        match outcome.status {
            TeardownStatus::Destroyed => self.destroyed += 1,
            TeardownStatus::Skipped { .. } => self.skipped += 1,
            TeardownStatus::Failed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.destroyed + self.skipped + self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Destroy every node of the context's document
pub fn teardown(registry: &Registry, ctx: &DeployContext<'_>) -> Vec<TeardownOutcome> {
    teardown_with(registry, ctx, &mut NoProgress)
}

/// Destroy every node, reporting each attempt to an observer
pub fn teardown_with<O: DeployObserver>(
    registry: &Registry,
    ctx: &DeployContext<'_>,
    observer: &mut O,
) -> Vec<TeardownOutcome> {
    let nodes = &ctx.document.nodes;
    info!("tearing down {} node(s)", nodes.len());
    observer.on_phase_start(Phase::Teardown, nodes.len());

    let mut outcomes = Vec::with_capacity(nodes.len());
    for node in nodes.iter().rev() {
        observer.on_node_start(Phase::Teardown, node);
        let outcome = TeardownOutcome::new(node, destroy_one(registry, node, ctx));
        if let Some(error) = outcome.error() {
            warn!("teardown of {} ({}) failed: {}", node.id, node.kind, error);
        }
        observer.on_node_torn_down(&outcome);
        outcomes.push(outcome);
    }

    observer.on_phase_complete(Phase::Teardown);
    outcomes
}

fn destroy_one(registry: &Registry, node: &Node, ctx: &DeployContext<'_>) -> TeardownStatus {
    let Some(entry) = registry.get(&node.kind) else {
        return TeardownStatus::Failed {
            error: format!("unsupported kind '{}'", node.kind),
        };
    };
    let Some(teardown) = entry.teardown() else {
        debug!("skip {} ({}): no teardown", node.id, node.kind);
        return TeardownStatus::Skipped {
            reason: format!("kind '{}' cannot be destroyed", node.kind),
        };
    };

    debug!("destroy {} ({})", node.id, node.kind);
    match teardown.destroy(node, ctx) {
        Ok(()) => TeardownStatus::Destroyed,
        Err(e) => TeardownStatus::Failed {
            error: format!("{e:#}"),
        },
    }
}
