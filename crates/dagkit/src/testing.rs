//! Shared helpers for the engine's unit tests

use crate::context::{DeployContext, Session};
use crate::ports::PortDescriptor;
use crate::refs::ReferenceTable;
use crate::service::{EdgeWiring, ResourceService, Teardown, WireOutcome};
use crate::types::{Edge, GraphDocument, Node, Record};
use anyhow::{Result, bail};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// Ordered log of service calls, shared between mocks
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Configurable service that records every call it receives
///
/// Deploy stores `{id, kind, seen}` where `seen` lists the predecessors
/// already present in the table. Wiring owns edges that point at a node of
/// its own kind and appends the source id to the target's `wired_from`.
#[derive(Debug)]
pub struct MockService {
    kind: &'static str,
    ports: PortDescriptor,
    log: CallLog,
    wiring: bool,
    teardown: bool,
    fail_deploy: Option<String>,
    fail_wire: Option<String>,
    fail_destroy: Option<String>,
}

impl MockService {
    pub fn new(kind: &'static str, inputs: &[&str], outputs: &[&str], log: &CallLog) -> Self {
        Self {
            kind,
            ports: PortDescriptor::new(inputs.iter().copied(), outputs.iter().copied()),
            log: log.clone(),
            wiring: false,
            teardown: false,
            fail_deploy: None,
            fail_wire: None,
            fail_destroy: None,
        }
    }

    pub fn with_wiring(mut self) -> Self {
        self.wiring = true;
        self
    }

    pub fn with_teardown(mut self) -> Self {
        self.teardown = true;
        self
    }

    pub fn failing_deploy(mut self, id: &str) -> Self {
        self.fail_deploy = Some(id.to_string());
        self
    }

    /// Fail wiring of edges whose target is `id`
    pub fn failing_wire(mut self, id: &str) -> Self {
        self.fail_wire = Some(id.to_string());
        self
    }

    pub fn failing_destroy(mut self, id: &str) -> Self {
        self.fail_destroy = Some(id.to_string());
        self
    }
}

impl ResourceService for MockService {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn ports(&self) -> PortDescriptor {
        self.ports.clone()
    }

    fn deploy(&self, node: &Node, ctx: &DeployContext<'_>, refs: &ReferenceTable) -> Result<Record> {
        self.log.push(format!("deploy:{}", node.id));
        if self.fail_deploy.as_deref() == Some(node.id.as_str()) {
            bail!("mock deploy failure");
        }

        let seen: Vec<Value> = ctx
            .document
            .edges
            .iter()
            .filter(|e| e.to == node.id && refs.contains(&e.from))
            .map(|e| json!(e.from))
            .collect();

        let mut record = Record::new();
        record.insert("id".into(), json!(node.id));
        record.insert("kind".into(), json!(node.kind));
        record.insert("seen".into(), Value::Array(seen));
        Ok(record)
    }

    fn wiring(&self) -> Option<&dyn EdgeWiring> {
        if self.wiring { Some(self) } else { None }
    }

    fn teardown(&self) -> Option<&dyn Teardown> {
        if self.teardown { Some(self) } else { None }
    }
}

impl EdgeWiring for MockService {
    fn wire(
        &self,
        edge: &Edge,
        refs: &mut ReferenceTable,
        ctx: &DeployContext<'_>,
    ) -> Result<WireOutcome> {
        self.log
            .push(format!("wire:{}:{}->{}", self.kind, edge.from, edge.to));
        if ctx.kind_of(&edge.to) != Some(self.kind) {
            return Ok(WireOutcome::NotApplicable);
        }
        if self.fail_wire.as_deref() == Some(edge.to.as_str()) {
            bail!("mock wire failure");
        }

        let mut sources = match refs.value(&edge.to, "wired_from") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        sources.push(json!(edge.from));
        refs.publish(&edge.to, "wired_from", sources);
        Ok(WireOutcome::Applied)
    }
}

impl Teardown for MockService {
    fn destroy(&self, node: &Node, _ctx: &DeployContext<'_>) -> Result<()> {
        self.log.push(format!("destroy:{}", node.id));
        if self.fail_destroy.as_deref() == Some(node.id.as_str()) {
            bail!("mock destroy failure");
        }
        Ok(())
    }
}

/// Session with a fixed region
#[derive(Debug)]
pub struct TestSession;

impl Session for TestSession {
    fn region(&self) -> &str {
        "test-region"
    }
}

pub fn node(id: &str, kind: &str) -> Node {
    Node::new(id, kind)
}

pub fn edge(from: &str, to: &str, via: &str) -> Edge {
    Edge::new(from, to, via)
}

pub fn document(nodes: Vec<Node>, edges: Vec<Edge>) -> GraphDocument {
    GraphDocument::new(nodes, edges)
}
