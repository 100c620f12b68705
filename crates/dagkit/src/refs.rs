//! Reference table - the run-scoped store of per-node results
//!
//! Every deployed node gets a record here. Wiring steps may add or
//! overwrite keys to publish discovered attributes (an endpoint, an ARN,
//! a path) for other services. Writes are last-writer-wins per key.

use crate::types::{NodeId, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Mapping from node id to the record its service produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceTable {
    entries: BTreeMap<NodeId, Record>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node's record, replacing any previous one
    pub fn insert(&mut self, id: impl Into<NodeId>, record: Record) -> Option<Record> {
        self.entries.insert(id.into(), record)
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Record> {
        self.entries.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Set one key on a node's record, returning the value it replaced
    ///
    /// Creates the record if the node has none yet.
    pub fn publish(
        &mut self,
        id: &str,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.entries
            .entry(id.to_string())
            .or_default()
            .insert(key.into(), value.into())
    }

    /// Merge a record into a node's entry; incoming keys win
    pub fn merge(&mut self, id: &str, record: Record) {
        self.entries.entry(id.to_string()).or_default().extend(record);
    }

    /// Look up one value
    pub fn value(&self, id: &str, key: &str) -> Option<&Value> {
        self.get(id).and_then(|r| r.get(key))
    }

    /// Look up one value as a string slice
    pub fn str_value(&self, id: &str, key: &str) -> Option<&str> {
        self.value(id, key).and_then(Value::as_str)
    }

    /// First entry (in id order) whose record matches the predicate
    pub fn find<F>(&self, mut predicate: F) -> Option<(&NodeId, &Record)>
    where
        F: FnMut(&str, &Record) -> bool,
    {
        self.entries.iter().find(|(id, record)| predicate(id, record))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Record)> {
        self.entries.iter()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as indented JSON with sorted keys
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
