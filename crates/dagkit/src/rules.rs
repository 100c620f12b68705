//! Consistency rules - optional semantic checks layered on validation
//!
//! Structural validation is kind-agnostic. Some deployments also need
//! cross-node checks, e.g. "the stream a delivery reads from must be the
//! name of a declared stream node". Those are expressed as named rules and
//! run only after the graph is structurally valid.

use crate::types::GraphDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named check over a whole document
pub trait ConsistencyRule: Send + Sync {
    /// Name used in error messages
    fn name(&self) -> &str;

    /// Check the document, returning a human-readable violation
    fn check(&self, document: &GraphDocument) -> Result<(), String>;
}

/// Property of one kind must name a property value of another kind
///
/// For every node of `kind` that sets `property`, some node of
/// `target_kind` must have `target_property` equal to that value. Nodes
/// that do not set `property` are not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyReference {
    pub kind: String,
    pub property: String,
    pub target_kind: String,
    pub target_property: String,
}

impl PropertyReference {
    pub fn new(
        kind: impl Into<String>,
        property: impl Into<String>,
        target_kind: impl Into<String>,
        target_property: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            property: property.into(),
            target_kind: target_kind.into(),
            target_property: target_property.into(),
        }
    }
}

impl ConsistencyRule for PropertyReference {
    fn name(&self) -> &str {
        "property_reference"
    }

    fn check(&self, document: &GraphDocument) -> Result<(), String> {
        let candidates: Vec<&Value> = document
            .nodes_of_kind(&self.target_kind)
            .filter_map(|n| n.property(&self.target_property))
            .collect();

        for node in document.nodes_of_kind(&self.kind) {
            let Some(value) = node.property(&self.property) else {
                continue;
            };
            if !candidates.contains(&value) {
                return Err(format!(
                    "node '{}' sets {}={} but no {} node has a matching '{}'",
                    node.id, self.property, value, self.target_kind, self.target_property
                ));
            }
        }
        Ok(())
    }
}

/// A rule backed by a closure
pub struct FnRule<F> {
    name: String,
    check: F,
}

impl<F> FnRule<F>
where
    F: Fn(&GraphDocument) -> Result<(), String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F> ConsistencyRule for FnRule<F>
where
    F: Fn(&GraphDocument) -> Result<(), String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, document: &GraphDocument) -> Result<(), String> {
        (self.check)(document)
    }
}

/// A boxed rule for type-erased storage
pub type BoxedRule = Box<dyn ConsistencyRule>;
