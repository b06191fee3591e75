//! Identifier Registry
//!
//! Bookkeeping for the two identifier namespaces of a document:
//!
//! - **SIds** are unique per scope; a scope is the nearest enclosing model
//!   or model definition (the document root for top-level elements).
//! - **Metaids** are unique across the entire document, including every
//!   plugin subtree and nested sub-model.
//!
//! The registry never walks the tree itself; the document layer computes
//! scopes and calls register/unregister in matched pairs around every
//! structural mutation. An unmatched unregister is the classic leak bug in
//! this kind of system, so the unregister operations insist on knowing
//! which node a binding belonged to and warn when the books disagree.

use std::collections::HashMap;

use crate::document::error::DocumentError;
use crate::models::NodeId;

/// Scoped SId and document-global metaid bindings.
#[derive(Debug, Default)]
pub(crate) struct IdentifierRegistry {
    /// scope root -> (id -> node)
    scopes: HashMap<NodeId, HashMap<String, NodeId>>,
    /// metaid -> node, document-global
    meta_ids: HashMap<String, NodeId>,
}

impl IdentifierRegistry {
    pub(crate) fn new() -> Self {
        IdentifierRegistry::default()
    }

    /// Binds `id` to `node` within `scope`.
    ///
    /// Re-registering the same node under the same id is a permitted no-op
    /// (idempotent re-attachment); binding to a different node fails.
    pub(crate) fn register_id(
        &mut self,
        scope: NodeId,
        id: &str,
        node: NodeId,
        scope_label: &str,
    ) -> Result<(), DocumentError> {
        let bindings = self.scopes.entry(scope).or_default();
        match bindings.get(id) {
            Some(existing) if *existing == node => Ok(()),
            Some(_) => Err(DocumentError::duplicate_id(id, scope_label)),
            None => {
                bindings.insert(id.to_string(), node);
                Ok(())
            }
        }
    }

    /// Removes the binding of `id` in `scope`, provided it points at `node`.
    pub(crate) fn unregister_id(&mut self, scope: NodeId, id: &str, node: NodeId) {
        let Some(bindings) = self.scopes.get_mut(&scope) else {
            tracing::warn!(id, "unregister_id: scope has no bindings");
            return;
        };
        match bindings.get(id) {
            Some(existing) if *existing == node => {
                bindings.remove(id);
                if bindings.is_empty() {
                    self.scopes.remove(&scope);
                }
            }
            _ => tracing::warn!(id, "unregister_id: binding missing or foreign"),
        }
    }

    pub(crate) fn register_meta_id(
        &mut self,
        meta_id: &str,
        node: NodeId,
    ) -> Result<(), DocumentError> {
        match self.meta_ids.get(meta_id) {
            Some(existing) if *existing == node => Ok(()),
            Some(_) => Err(DocumentError::duplicate_meta_id(meta_id)),
            None => {
                self.meta_ids.insert(meta_id.to_string(), node);
                Ok(())
            }
        }
    }

    pub(crate) fn unregister_meta_id(&mut self, meta_id: &str, node: NodeId) {
        match self.meta_ids.get(meta_id) {
            Some(existing) if *existing == node => {
                self.meta_ids.remove(meta_id);
            }
            _ => tracing::warn!(meta_id, "unregister_meta_id: binding missing or foreign"),
        }
    }

    pub(crate) fn resolve_id(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        self.scopes.get(&scope)?.get(id).copied()
    }

    pub(crate) fn resolve_meta_id(&self, meta_id: &str) -> Option<NodeId> {
        self.meta_ids.get(meta_id).copied()
    }

    /// True when `id` is free in `scope` (or already bound to `node`).
    pub(crate) fn id_is_free_for(&self, scope: NodeId, id: &str, node: NodeId) -> bool {
        match self.scopes.get(&scope).and_then(|b| b.get(id)) {
            Some(existing) => *existing == node,
            None => true,
        }
    }

    pub(crate) fn meta_id_is_free_for(&self, meta_id: &str, node: NodeId) -> bool {
        match self.meta_ids.get(meta_id) {
            Some(existing) => *existing == node,
            None => true,
        }
    }

    /// Total number of SId bindings across all scopes (test support).
    pub(crate) fn id_count(&self) -> usize {
        self.scopes.values().map(|b| b.len()).sum()
    }

    pub(crate) fn meta_id_count(&self) -> usize {
        self.meta_ids.len()
    }
}
