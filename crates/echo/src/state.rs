use std::collections::HashMap;

use {mx_echo_bridge::PuppetId, tracing::debug};

/// Per-puppet state.
///
/// A real protocol would also keep its client connection here; the echo
/// protocol only needs the data the puppet was linked with.
#[derive(Debug, Clone, PartialEq)]
pub struct EchoPuppet {
    pub data: serde_json::Value,
}

/// In-memory map of live puppets. Nothing is persisted.
#[derive(Debug, Default)]
pub struct PuppetTable {
    puppets: HashMap<PuppetId, EchoPuppet>,
}

impl PuppetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a puppet, discarding any existing entry with the same ID first.
    pub fn register(&mut self, puppet_id: PuppetId, data: serde_json::Value) {
        if self.unregister(puppet_id) {
            debug!(puppet_id, "replaced existing puppet");
        }
        self.puppets.insert(puppet_id, EchoPuppet { data });
    }

    /// Remove a puppet. Returns `false` if it was not registered.
    pub fn unregister(&mut self, puppet_id: PuppetId) -> bool {
        self.puppets.remove(&puppet_id).is_some()
    }

    pub fn lookup(&self, puppet_id: PuppetId) -> Option<&EchoPuppet> {
        self.puppets.get(&puppet_id)
    }

    pub fn len(&self) -> usize {
        self.puppets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puppets.is_empty()
    }
}
