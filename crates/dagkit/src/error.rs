//! Error types for graph validation and orchestration.
//!
//! Structural problems ([`GraphError`]) are detected before any service is
//! called. Service failures during deploy or wiring are wrapped with the
//! node or edge they happened on and abort the run. Teardown failures are
//! never errors; they are reported as outcomes.

use crate::types::NodeId;
use thiserror::Error;

/// Structural or ordering problems in a graph document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Two nodes share one id
    #[error("duplicate node id '{id}'")]
    DuplicateNode { id: NodeId },

    /// A node names a kind no service is registered for
    #[error("node '{node}' has unsupported kind '{kind}'")]
    UnknownKind { node: NodeId, kind: String },

    /// An edge endpoint references an undeclared node
    #[error("edge {from}->{to} references undeclared node '{missing}'")]
    DanglingEdge {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    /// The edge port is not among the source kind's outputs
    #[error("edge {from}->{to}: port '{via}' is not produced by kind '{kind}'")]
    PortNotProduced {
        from: NodeId,
        to: NodeId,
        via: String,
        kind: String,
    },

    /// The edge port is not among the target kind's inputs
    #[error("edge {from}->{to}: port '{via}' is not accepted by kind '{kind}'")]
    PortNotAccepted {
        from: NodeId,
        to: NodeId,
        via: String,
        kind: String,
    },

    /// No total order exists
    #[error(
        "cycle detected: {} (unresolved: {})",
        .cycle.join(" -> "),
        .unresolved.join(", ")
    )]
    Cycle {
        /// Nodes that never reached zero in-degree, in document order
        unresolved: Vec<NodeId>,
        /// One closed path through the graph, in edge direction
        cycle: Vec<NodeId>,
    },

    /// A consistency rule rejected the document
    #[error("consistency rule '{rule}' failed: {message}")]
    RuleViolation { rule: String, message: String },
}

/// Errors raised while building a registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("kind '{kind}' is already registered")]
    DuplicateKind { kind: String },
}

/// Errors that abort a deployment run
#[derive(Debug, Error)]
pub enum Error {
    /// The document failed validation or scheduling
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A service failed to deploy a node
    #[error("deploy failed for node '{node}' ({kind})")]
    Deploy {
        node: NodeId,
        kind: String,
        #[source]
        source: anyhow::Error,
    },

    /// A service failed while wiring an edge
    #[error("wiring {from}->{to} via '{via}' failed in {kind}")]
    Wire {
        from: NodeId,
        to: NodeId,
        via: String,
        kind: String,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    /// Node the failure is attributed to, if any
    pub fn node(&self) -> Option<&str> {
        match self {
            Error::Deploy { node, .. } => Some(node),
            Error::Wire { to, .. } => Some(to),
            Error::Graph(_) => None,
        }
    }
}

/// Result type for orchestration
pub type Result<T> = std::result::Result<T, Error>;
