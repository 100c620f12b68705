//! Graph document types: nodes, edges and the document that holds them

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a node, unique within one graph
pub type NodeId = String;

/// Opaque result record a service publishes for a node
pub type Record = serde_json::Map<String, Value>;

/// A typed declaration of one managed resource
///
/// Documents spell the kind as `type` and the properties as `props`;
/// `kind` and `properties` are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
    #[serde(default, rename = "props", alias = "properties")]
    pub properties: Record,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            properties: Record::new(),
        }
    }

    /// Builder-style property setter
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Get a property value
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Get a property as a string slice, if it is a string
    pub fn str_property(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(Value::as_str)
    }

    /// Get a required string property
    pub fn require_str(&self, key: &str) -> Result<&str> {
        match self.property(key) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => bail!(
                "node '{}' property '{}' must be a string, got {}",
                self.id,
                key,
                other
            ),
            None => bail!("node '{}' is missing required property '{}'", self.id, key),
        }
    }
}

/// A directed, port-labeled wiring relationship between two nodes
///
/// Edges have no identity beyond their triple. Duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub via: String,
}

impl Edge {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>, via: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            via: via.into(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{} ({})", self.from, self.to, self.via)
    }
}

/// The graph document as produced by a loader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

impl GraphDocument {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes,
            edges,
            ..Default::default()
        }
    }

    /// Find a node by id (first declaration wins)
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Kind of the node with the given id
    pub fn kind_of(&self, id: &str) -> Option<&str> {
        self.node(id).map(|n| n.kind.as_str())
    }

    /// Nodes of a given kind, in document order
    pub fn nodes_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_accepts_document_field_names() {
        let node: Node = serde_json::from_value(json!({
            "id": "bucket",
            "type": "fs.dir",
            "props": { "path": "/tmp/x" }
        }))
        .unwrap();
        assert_eq!(node.kind, "fs.dir");
        assert_eq!(node.str_property("path"), Some("/tmp/x"));

        let aliased: Node = serde_json::from_value(json!({
            "id": "bucket",
            "kind": "fs.dir",
            "properties": { "path": "/tmp/x" }
        }))
        .unwrap();
        assert_eq!(aliased, node);
    }

    #[test]
    fn test_require_str() {
        let node = Node::new("a", "X")
            .with_property("name", "alpha")
            .with_property("count", 3);

        assert_eq!(node.require_str("name").unwrap(), "alpha");
        let err = node.require_str("count").unwrap_err().to_string();
        assert!(err.contains("must be a string"), "{err}");
        let err = node.require_str("missing").unwrap_err().to_string();
        assert!(err.contains("missing required property 'missing'"), "{err}");
    }

    #[test]
    fn test_document_defaults() {
        let doc: GraphDocument = serde_json::from_value(json!({
            "nodes": [{ "id": "a", "type": "X" }]
        }))
        .unwrap();
        assert!(doc.edges.is_empty());
        assert!(doc.tags.is_empty());
        assert_eq!(doc.kind_of("a"), Some("X"));
        assert_eq!(doc.kind_of("b"), None);
    }
}
