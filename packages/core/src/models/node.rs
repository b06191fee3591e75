//! Node Payload
//!
//! This module defines the universal node payload and the handle type used
//! to address nodes inside a document.
//!
//! # Architecture
//!
//! - **Universal node**: a single struct represents every element kind;
//!   element-specific scalar data lives in the typed attribute map.
//! - **Handles, not references**: nodes live in a per-document arena and
//!   point at each other through [`NodeId`] handles, so parent back-links
//!   never form ownership cycles and "walk to root" is O(depth).
//! - **Plugins on the side**: extension-package data attaches through a
//!   namespace-keyed plugin table rather than through subclassing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::attribute::AttributeValue;
use crate::models::element::ElementKind;
use crate::models::plugin::Plugin;

/// Generation-checked handle to a node in a document's arena.
///
/// A handle from one document is meaningless in another, and a handle to a
/// removed node goes stale (its generation no longer matches). Every
/// document operation validates the handle before touching the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// The payload stored per node.
///
/// # Fields
///
/// - `kind`: what this element is (see [`ElementKind`])
/// - `id`: optional SId, unique within the nearest enclosing scope
/// - `meta_id`: optional metaid, unique across the whole document
/// - `sbo_term`: optional ontology term reference
/// - `notes` / `annotation`: free-form payloads carried through round trips
/// - `attributes`: typed scalar attributes (see [`AttributeValue`])
/// - `package_version`: for package-owned nodes, the minor version of the
///   package that created them; inherited by containers a plugin creates
#[derive(Debug, Clone)]
pub struct NodeData {
    pub(crate) kind: ElementKind,
    pub(crate) id: Option<String>,
    pub(crate) meta_id: Option<String>,
    pub(crate) sbo_term: Option<u32>,
    pub(crate) notes: Option<String>,
    pub(crate) annotation: Option<serde_json::Value>,
    pub(crate) attributes: BTreeMap<String, AttributeValue>,
    pub(crate) package_version: Option<u32>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) plugins: BTreeMap<String, Plugin>,
}

impl NodeData {
    pub(crate) fn new(kind: ElementKind) -> Self {
        NodeData {
            kind,
            id: None,
            meta_id: None,
            sbo_term: None,
            notes: None,
            annotation: None,
            attributes: BTreeMap::new(),
            package_version: None,
            parent: None,
            children: Vec::new(),
            plugins: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn meta_id(&self) -> Option<&str> {
        self.meta_id.as_deref()
    }

    pub fn sbo_term(&self) -> Option<u32> {
        self.sbo_term
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn annotation(&self) -> Option<&serde_json::Value> {
        self.annotation.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    pub fn package_version(&self) -> Option<u32> {
        self.package_version
    }

    /// Attached plugins, keyed by namespace URI (iteration is namespace
    /// order, which is also serialization order).
    pub fn plugins(&self) -> &BTreeMap<String, Plugin> {
        &self.plugins
    }

    pub fn plugin_by_namespace(&self, namespace: &str) -> Option<&Plugin> {
        self.plugins.get(namespace)
    }

    /// Short human-readable identification for diagnostics: the element
    /// name plus whichever of id/metaid is set.
    pub fn describe(&self) -> String {
        match (&self.id, &self.meta_id) {
            (Some(id), _) => format!("<{} id=\"{}\">", self.kind.name(), id),
            (None, Some(meta)) => format!("<{} metaid=\"{}\">", self.kind.name(), meta),
            (None, None) => format!("<{}>", self.kind.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::element::ListOfKind;

    #[test]
    fn fresh_node_is_orphan_and_empty() {
        let node = NodeData::new(ElementKind::Species);
        assert_eq!(node.kind(), ElementKind::Species);
        assert!(node.parent().is_none());
        assert!(node.children().is_empty());
        assert!(node.plugins().is_empty());
        assert!(node.id().is_none());
    }

    #[test]
    fn describe_prefers_id_over_metaid() {
        let mut node = NodeData::new(ElementKind::Compartment);
        node.meta_id = Some("m1".to_string());
        assert_eq!(node.describe(), "<compartment metaid=\"m1\">");
        node.id = Some("c1".to_string());
        assert_eq!(node.describe(), "<compartment id=\"c1\">");

        let list = NodeData::new(ElementKind::ListOf(ListOfKind::Species));
        assert_eq!(list.describe(), "<listOfSpecies>");
    }
}
