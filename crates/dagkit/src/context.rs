//! Deployment context and provider traits
//!
//! These traits let the engine run without depending on a particular
//! credential mechanism, terminal UI, or prompt implementation.

use crate::service::WireOutcome;
use crate::teardown::TeardownOutcome;
use crate::types::{Edge, GraphDocument, Node, Record};
use anyhow::Result;
use std::collections::BTreeMap;

/// Authenticated session handle supplied by the caller
///
/// Services downcast or wrap this as they need; the engine only reads the
/// resolved region.
pub trait Session: Send + Sync {
    /// Region (or locale) resources are created in
    fn region(&self) -> &str;

    /// Named credential profile, if one was selected
    fn profile(&self) -> Option<&str> {
        None
    }
}

/// Bundle passed to every service call
///
/// Immutable for the duration of a run. The reference table is passed
/// separately so that it is the only piece of mutable run state.
pub struct DeployContext<'a> {
    /// Session used by services to reach the external system
    pub session: &'a dyn Session,
    /// Resolved region
    pub region: String,
    /// User-declared tags applied to created resources
    pub tags: BTreeMap<String, String>,
    /// The document being deployed
    pub document: &'a GraphDocument,
}

impl<'a> DeployContext<'a> {
    /// Create a context; region comes from the session, tags from the document
    pub fn new(session: &'a dyn Session, document: &'a GraphDocument) -> Self {
        Self {
            session,
            region: session.region().to_string(),
            tags: document.tags.clone(),
            document,
        }
    }

    /// Replace the tag set
    pub fn with_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags = tags;
        self
    }

    /// Look up a node of the document being deployed
    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.document.node(id)
    }

    /// Kind of a node of the document being deployed
    pub fn kind_of(&self, id: &str) -> Option<&'a str> {
        self.document.kind_of(id)
    }
}

/// Orchestration phase, for progress reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Phase one: create every node in dependency order
    Deploy,
    /// Phase two: wire every edge in document order
    Wire,
    /// Reverse-order best-effort destruction
    Teardown,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::Wire => "wire",
            Self::Teardown => "teardown",
        }
    }
}

/// Progress callback for orchestration
///
/// Every hook defaults to a no-op; implement the ones you need.
pub trait DeployObserver {
    /// Called when a phase starts, with the number of steps it will take
    fn on_phase_start(&mut self, _phase: Phase, _count: usize) {}

    /// Called before a service is asked to deploy or destroy a node
    fn on_node_start(&mut self, _phase: Phase, _node: &Node) {}

    /// Called after a node's record was produced
    fn on_node_deployed(&mut self, _node: &Node, _record: &Record) {}

    /// Called after a wiring implementation handled an edge
    fn on_edge_wired(&mut self, _edge: &Edge, _kind: &str, _outcome: WireOutcome) {}

    /// Called after a node's teardown attempt, successful or not
    fn on_node_torn_down(&mut self, _outcome: &TeardownOutcome) {}

    /// Called when a phase completes
    fn on_phase_complete(&mut self, _phase: Phase) {}
}

/// No-op progress callback
pub struct NoProgress;

impl DeployObserver for NoProgress {}

/// Confirmation callback for user interaction
///
/// Implement this trait to gate destructive commands.
pub trait ConfirmCallback {
    /// Ask the user to confirm an action
    ///
    /// # Returns
    /// `true` if the user confirmed, `false` otherwise
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}
