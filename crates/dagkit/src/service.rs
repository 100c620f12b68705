//! Resource service trait - the plugin interface behind each node kind
//!
//! A service knows how to create one kind of resource. Wiring and teardown
//! are optional capabilities: a service opts in by returning itself (or a
//! helper) from [`ResourceService::wiring`] / [`ResourceService::teardown`].
//! The registry records which capabilities a kind has when it is registered.

use crate::context::DeployContext;
use crate::ports::PortDescriptor;
use crate::refs::ReferenceTable;
use crate::types::{Edge, Node, Record};
use anyhow::Result;
use serde::Serialize;
use std::fmt;

/// Core trait for node kinds
///
/// # Example
///
/// ```ignore
/// use dagkit::{DeployContext, Node, PortDescriptor, Record, ReferenceTable, ResourceService};
///
/// #[derive(Debug)]
/// struct Queue;
///
/// impl ResourceService for Queue {
///     fn kind(&self) -> &'static str {
///         "queue"
///     }
///
///     fn ports(&self) -> PortDescriptor {
///         PortDescriptor::new(Vec::<String>::new(), ["records"])
///     }
///
///     fn deploy(
///         &self,
///         node: &Node,
///         _ctx: &DeployContext<'_>,
///         _refs: &ReferenceTable,
///     ) -> anyhow::Result<Record> {
///         let mut record = Record::new();
///         record.insert("queue_name".into(), node.require_str("name")?.into());
///         Ok(record)
///     }
/// }
/// ```
pub trait ResourceService: Send + Sync + fmt::Debug {
    /// Kind string nodes use to select this service (e.g. "fs.dir")
    fn kind(&self) -> &'static str;

    /// Human-readable description of the kind
    fn description(&self) -> &'static str {
        ""
    }

    /// Ports this kind accepts and offers
    fn ports(&self) -> PortDescriptor {
        PortDescriptor::none()
    }

    /// Create (or adopt) the resource for a node
    ///
    /// `refs` holds the records of every node deployed earlier in the run,
    /// which includes all of this node's predecessors. The returned record
    /// is stored under the node's id.
    fn deploy(&self, node: &Node, ctx: &DeployContext<'_>, refs: &ReferenceTable)
    -> Result<Record>;

    /// Wiring capability, if this kind takes part in phase two
    fn wiring(&self) -> Option<&dyn EdgeWiring> {
        None
    }

    /// Teardown capability, if this kind can be destroyed
    fn teardown(&self) -> Option<&dyn Teardown> {
        None
    }
}

/// Phase-two wiring of an edge between two deployed nodes
///
/// Wiring is invoked for both endpoint kinds of every edge. The
/// implementation decides whether it owns the edge by looking at `via`, the
/// endpoint kinds and the reference table, and returns
/// [`WireOutcome::NotApplicable`] when it does not. Implementations should
/// be safe to run again on the same edge.
pub trait EdgeWiring: Send + Sync {
    fn wire(
        &self,
        edge: &Edge,
        refs: &mut ReferenceTable,
        ctx: &DeployContext<'_>,
    ) -> Result<WireOutcome>;
}

/// Best-effort destruction of a node's resource
pub trait Teardown: Send + Sync {
    fn destroy(&self, node: &Node, ctx: &DeployContext<'_>) -> Result<()>;
}

/// Result of offering an edge to a wiring implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WireOutcome {
    /// The service owned the edge and acted on it
    Applied,
    /// The edge is not this service's concern
    NotApplicable,
}

impl WireOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Optional capabilities of a kind, fixed at registration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub wire: bool,
    pub destroy: bool,
}

impl Capabilities {
    /// Inspect a service once
    pub fn of(service: &dyn ResourceService) -> Self {
        Self {
            wire: service.wiring().is_some(),
            destroy: service.teardown().is_some(),
        }
    }
}

/// A boxed service for type-erased storage
pub type BoxedService = Box<dyn ResourceService>;
