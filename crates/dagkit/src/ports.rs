//! Port descriptors and the port catalog
//!
//! Each service declares which port labels it accepts wiring through
//! (inputs) and which it offers (outputs). The catalog is the union of
//! those declarations keyed by kind, and is what edge validation consults.

use crate::registry::Registry;
use serde::Serialize;
use std::collections::BTreeMap;

/// Static port declaration of one node kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortDescriptor {
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl PortDescriptor {
    /// Build a descriptor; duplicate labels are dropped, order is kept
    pub fn new<I, O>(inputs: I, outputs: O) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            inputs: ordered_set(inputs),
            outputs: ordered_set(outputs),
        }
    }

    /// A kind with no ports at all
    pub fn none() -> Self {
        Self::default()
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Whether the kind accepts wiring through this port
    pub fn accepts(&self, port: &str) -> bool {
        self.inputs.iter().any(|p| p == port)
    }

    /// Whether the kind offers this port
    pub fn produces(&self, port: &str) -> bool {
        self.outputs.iter().any(|p| p == port)
    }
}

fn ordered_set<I>(ports: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for port in ports {
        let port = port.into();
        if !out.contains(&port) {
            out.push(port);
        }
    }
    out
}

/// Port declarations of every registered kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortCatalog {
    kinds: BTreeMap<String, PortDescriptor>,
}

impl PortCatalog {
    /// Derive the catalog from a registry
    pub fn build(registry: &Registry) -> Self {
        Self::from_descriptors(
            registry
                .iter()
                .map(|entry| (entry.kind().to_string(), entry.ports().clone())),
        )
    }

    /// Build a catalog from explicit (kind, descriptor) pairs
    pub fn from_descriptors<I, K>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = (K, PortDescriptor)>,
        K: Into<String>,
    {
        Self {
            kinds: descriptors
                .into_iter()
                .map(|(kind, ports)| (kind.into(), ports))
                .collect(),
        }
    }

    pub fn contains_kind(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    pub fn ports(&self, kind: &str) -> Option<&PortDescriptor> {
        self.kinds.get(kind)
    }

    /// Whether `kind` offers `port`; unknown kinds offer nothing
    pub fn produces(&self, kind: &str, port: &str) -> bool {
        self.ports(kind).is_some_and(|p| p.produces(port))
    }

    /// Whether `kind` accepts `port`; unknown kinds accept nothing
    pub fn accepts(&self, kind: &str, port: &str) -> bool {
        self.ports(kind).is_some_and(|p| p.accepts(port))
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_dedups_preserving_order() {
        let ports = PortDescriptor::new(["b", "a", "b"], ["x"]);
        assert_eq!(ports.inputs(), ["b", "a"]);
        assert!(ports.accepts("a"));
        assert!(!ports.accepts("x"));
        assert!(ports.produces("x"));
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = PortCatalog::from_descriptors([
            ("X", PortDescriptor::new(Vec::<String>::new(), ["p"])),
            ("Y", PortDescriptor::new(["p"], Vec::<String>::new())),
            ("Z", PortDescriptor::none()),
        ]);

        assert!(catalog.produces("X", "p"));
        assert!(!catalog.accepts("X", "p"));
        assert!(catalog.accepts("Y", "p"));
        assert!(catalog.contains_kind("Z"));
        assert!(!catalog.produces("Z", "p"));
        assert!(!catalog.produces("missing", "p"));
        assert_eq!(catalog.kinds().collect::<Vec<_>>(), ["X", "Y", "Z"]);
    }
}
