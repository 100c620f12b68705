//! Graph validator - structural checks, ordering and consistency rules
//!
//! Checks run in a fixed order and stop at the first violation:
//! duplicate ids, unknown kinds, dangling edges, outbound ports, inbound
//! ports, cycles, then any registered consistency rules.

use crate::error::GraphError;
use crate::ports::PortCatalog;
use crate::registry::Registry;
use crate::rules::{BoxedRule, ConsistencyRule};
use crate::scheduler::schedule_nodes;
use crate::types::{GraphDocument, Node, NodeId};
use std::collections::{HashMap, HashSet};

/// Validates documents against a port catalog
pub struct Validator {
    catalog: PortCatalog,
    rules: Vec<BoxedRule>,
}

impl Validator {
    pub fn new(catalog: PortCatalog) -> Self {
        Self {
            catalog,
            rules: Vec::new(),
        }
    }

    /// Validator over the kinds of a registry
    pub fn for_registry(registry: &Registry) -> Self {
        Self::new(registry.catalog())
    }

    /// Add a consistency rule, run after the structural checks
    pub fn with_rule<R: ConsistencyRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Add several boxed rules
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = BoxedRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn catalog(&self) -> &PortCatalog {
        &self.catalog
    }

    /// Validate without keeping the order
    pub fn validate(&self, document: &GraphDocument) -> Result<(), GraphError> {
        self.plan(document).map(|_| ())
    }

    /// Validate and return the deployment order
    pub fn plan<'d>(&self, document: &'d GraphDocument) -> Result<Vec<&'d Node>, GraphError> {
        check_unique_ids(document)?;
        self.check_kinds(document)?;
        self.check_edges(document)?;

        let order = schedule_nodes(&document.nodes, &document.edges)?;

        for rule in &self.rules {
            rule.check(document)
                .map_err(|message| GraphError::RuleViolation {
                    rule: rule.name().to_string(),
                    message,
                })?;
        }

        log::debug!("graph valid: {} node(s), {} edge(s)", order.len(), document.edges.len());
        Ok(order)
    }

    /// Validate and return the deployment order as ids
    pub fn plan_ids(&self, document: &GraphDocument) -> Result<Vec<NodeId>, GraphError> {
        Ok(self
            .plan(document)?
            .into_iter()
            .map(|n| n.id.clone())
            .collect())
    }

    fn check_kinds(&self, document: &GraphDocument) -> Result<(), GraphError> {
        match document
            .nodes
            .iter()
            .find(|n| !self.catalog.contains_kind(&n.kind))
        {
            Some(node) => Err(GraphError::UnknownKind {
                node: node.id.clone(),
                kind: node.kind.clone(),
            }),
            None => Ok(()),
        }
    }

    fn check_edges(&self, document: &GraphDocument) -> Result<(), GraphError> {
        let kinds: HashMap<&str, &str> = document
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.kind.as_str()))
            .collect();

        for edge in &document.edges {
            let dangling = |missing: &str| GraphError::DanglingEdge {
                from: edge.from.clone(),
                to: edge.to.clone(),
                missing: missing.to_string(),
            };
            let from_kind = *kinds.get(edge.from.as_str()).ok_or_else(|| dangling(&edge.from))?;
            let to_kind = *kinds.get(edge.to.as_str()).ok_or_else(|| dangling(&edge.to))?;

            if !self.catalog.produces(from_kind, &edge.via) {
                return Err(GraphError::PortNotProduced {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    via: edge.via.clone(),
                    kind: from_kind.to_string(),
                });
            }
            if !self.catalog.accepts(to_kind, &edge.via) {
                return Err(GraphError::PortNotAccepted {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    via: edge.via.clone(),
                    kind: to_kind.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn check_unique_ids(document: &GraphDocument) -> Result<(), GraphError> {
    let mut seen = HashSet::with_capacity(document.nodes.len());
    for node in &document.nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(GraphError::DuplicateNode {
                id: node.id.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortDescriptor;
    use crate::rules::{FnRule, PropertyReference};
    use crate::testing::{document, edge, node};

    fn catalog() -> PortCatalog {
        PortCatalog::from_descriptors([
            ("X", PortDescriptor::new(["in"], ["p", "shared"])),
            ("Y", PortDescriptor::new(["p", "shared"], ["out"])),
        ])
    }

    #[test]
    fn test_plan_simple_chain() {
        let doc = document(
            vec![node("a", "X"), node("b", "Y")],
            vec![edge("a", "b", "p")],
        );
        let validator = Validator::new(catalog());
        assert_eq!(validator.plan_ids(&doc).unwrap(), ["a", "b"]);
    }

    #[test]
    fn test_outbound_port_mismatch_names_edge_and_port() {
        let doc = document(
            vec![node("a", "X"), node("b", "Y")],
            vec![edge("a", "b", "q")],
        );
        let err = Validator::new(catalog()).validate(&doc).unwrap_err();
        assert_eq!(
            err,
            GraphError::PortNotProduced {
                from: "a".into(),
                to: "b".into(),
                via: "q".into(),
                kind: "X".into(),
            }
        );
        let message = err.to_string();
        assert!(message.contains("a->b"), "{message}");
        assert!(message.contains("'q'"), "{message}");
    }

    #[test]
    fn test_inbound_port_mismatch() {
        let doc = document(
            vec![node("a", "Y"), node("b", "X")],
            vec![edge("a", "b", "out")],
        );
        assert!(matches!(
            Validator::new(catalog()).validate(&doc),
            Err(GraphError::PortNotAccepted { ref kind, .. }) if kind == "X"
        ));
    }

    #[test]
    fn test_port_membership_iff() {
        let catalog = catalog();
        let validator = Validator::new(catalog.clone());
        let ports = ["in", "p", "shared", "out", "nope"];
        for (from_kind, to_kind) in [("X", "Y"), ("Y", "X"), ("X", "X"), ("Y", "Y")] {
            for port in ports {
                let doc = document(
                    vec![node("a", from_kind), node("b", to_kind)],
                    vec![edge("a", "b", port)],
                );
                let expected =
                    catalog.produces(from_kind, port) && catalog.accepts(to_kind, port);
                assert_eq!(
                    validator.validate(&doc).is_ok(),
                    expected,
                    "{from_kind} -{port}-> {to_kind}"
                );
            }
        }
    }

    #[test]
    fn test_unknown_kind_checked_before_edges() {
        let doc = document(
            vec![node("a", "X"), node("b", "Mystery")],
            vec![edge("a", "ghost", "p")],
        );
        assert_eq!(
            Validator::new(catalog()).validate(&doc).unwrap_err(),
            GraphError::UnknownKind {
                node: "b".into(),
                kind: "Mystery".into(),
            }
        );
    }

    #[test]
    fn test_dangling_edge() {
        let doc = document(vec![node("a", "X")], vec![edge("ghost", "a", "p")]);
        assert!(matches!(
            Validator::new(catalog()).validate(&doc),
            Err(GraphError::DanglingEdge { ref missing, .. }) if missing == "ghost"
        ));
    }

    #[test]
    fn test_duplicate_ids() {
        let doc = document(vec![node("a", "X"), node("a", "Y")], vec![]);
        assert_eq!(
            Validator::new(catalog()).validate(&doc).unwrap_err(),
            GraphError::DuplicateNode { id: "a".into() }
        );
    }

    #[test]
    fn test_cycle_on_valid_ports() {
        let catalog = PortCatalog::from_descriptors([(
            "Z",
            PortDescriptor::new(["shared"], ["shared"]),
        )]);
        let doc = document(
            vec![node("a", "Z"), node("b", "Z")],
            vec![edge("a", "b", "shared"), edge("b", "a", "shared")],
        );
        match Validator::new(catalog).validate(&doc).unwrap_err() {
            GraphError::Cycle { unresolved, .. } => assert_eq!(unresolved, ["a", "b"]),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_rules_run_after_structure() {
        let doc = document(
            vec![
                node("a", "X").with_property("stream", "missing"),
                node("b", "Y").with_property("name", "present"),
            ],
            vec![edge("a", "b", "p")],
        );
        let validator =
            Validator::new(catalog()).with_rule(PropertyReference::new("X", "stream", "Y", "name"));
        match validator.validate(&doc).unwrap_err() {
            GraphError::RuleViolation { rule, message } => {
                assert_eq!(rule, "property_reference");
                assert!(message.contains("node 'a'"), "{message}");
            }
            other => panic!("expected rule violation, got {other:?}"),
        }

        // structural errors win over rule violations
        let broken = document(doc.nodes.clone(), vec![edge("a", "b", "q")]);
        assert!(matches!(
            validator.validate(&broken),
            Err(GraphError::PortNotProduced { .. })
        ));
    }

    #[test]
    fn test_rules_run_in_order() {
        let doc = document(vec![node("a", "X")], vec![]);
        let validator = Validator::new(catalog())
            .with_rule(FnRule::new("first", |_: &GraphDocument| Err("one".to_string())))
            .with_rule(FnRule::new("second", |_: &GraphDocument| Err("two".to_string())));
        assert_eq!(
            validator.validate(&doc).unwrap_err(),
            GraphError::RuleViolation {
                rule: "first".into(),
                message: "one".into(),
            }
        );
    }

    #[test]
    fn test_plan_is_idempotent() {
        let doc = document(
            vec![node("b", "Y"), node("a", "X"), node("c", "X")],
            vec![edge("a", "b", "p"), edge("c", "b", "shared")],
        );
        let validator = Validator::new(catalog());
        let first = validator.plan_ids(&doc).unwrap();
        assert_eq!(first, ["a", "c", "b"]);
        assert_eq!(validator.plan_ids(&doc).unwrap(), first);
    }
}
