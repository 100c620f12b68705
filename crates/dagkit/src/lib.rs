//! # dagkit
//!
//! An engine for typed resource graphs.
//!
//! A graph document declares nodes (each of some kind) and edges between
//! them labelled with a port. The engine checks the document against the
//! ports each kind declares, orders the nodes so that every edge source comes
//! before its target, and then drives per-kind plugins through a two-phase
//! deployment: create every node, then wire every edge.
//!
//! ## Core Concepts
//!
//! - **ResourceService**: plugin for one node kind (deploy, optional wiring and teardown)
//! - **Registry**: frozen kind -> service mapping, built once per run
//! - **Validator**: structural checks plus optional consistency rules
//! - **ReferenceTable**: records published by deployed nodes, read by later ones
//! - **Deployment**: the create-then-wire orchestrator
//! - **teardown**: best-effort destruction in reverse document order
//!
//! ## Example
//!
//! ```ignore
//! use dagkit::{DeployContext, GraphDocument, Registry, Session, deploy};
//!
//! struct Local;
//!
//! impl Session for Local {
//!     fn region(&self) -> &str { "local" }
//! }
//!
//! let registry = Registry::builder()
//!     .register(Queue)?
//!     .register(Worker)?
//!     .build();
//!
//! let document: GraphDocument = serde_yaml::from_str(&text)?;
//! let ctx = DeployContext::new(&Local, &document);
//! let refs = deploy(&registry, &ctx)?;
//! println!("{}", refs.to_pretty_json()?);
//! ```
//!
//! ## Provider Traits
//!
//! - [`Session`]: caller-supplied credentials and region
//! - [`DeployObserver`]: receives progress updates
//! - [`ConfirmCallback`]: gates destructive commands
//!
//! The engine itself never prints, prompts, or reads the environment.

pub mod context;
pub mod error;
pub mod executor;
pub mod ports;
pub mod refs;
pub mod registry;
pub mod rules;
pub mod scheduler;
pub mod service;
pub mod teardown;
pub mod types;
pub mod validator;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use context::{
    AutoConfirm, AutoDecline, ConfirmCallback, DeployContext, DeployObserver, NoProgress, Phase,
    Session,
};
pub use error::{Error, GraphError, RegistryError, Result};
pub use executor::{Deployment, deploy};
pub use ports::{PortCatalog, PortDescriptor};
pub use refs::ReferenceTable;
pub use registry::{RegisteredService, Registry, RegistryBuilder};
pub use rules::{BoxedRule, ConsistencyRule, FnRule, PropertyReference};
pub use scheduler::{schedule, schedule_nodes};
pub use service::{BoxedService, Capabilities, EdgeWiring, ResourceService, Teardown, WireOutcome};
pub use teardown::{TeardownOutcome, TeardownStatus, TeardownSummary, teardown, teardown_with};
pub use types::{Edge, GraphDocument, Node, NodeId, Record};
pub use validator::Validator;
