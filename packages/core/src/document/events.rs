//! Document Events
//!
//! Structural and property changes are announced on a per-document event
//! bus. Subscribers receive events over a channel and drain them after the
//! mutating call returns, so a subscriber that reacts by mutating the
//! document again can never corrupt an in-progress notification.
//!
//! # Event Flow
//!
//! 1. A document operation mutates the tree (attach, detach, rename, ...)
//! 2. The operation emits a [`DocumentEvent`] on the bus
//! 3. Every live subscriber's channel receives a copy
//! 4. Subscribers whose receiving end was dropped are pruned at the next
//!    dispatch (unsubscribing is dropping the receiver; it is idempotent)

use std::sync::mpsc::{channel, Receiver, Sender};

use serde::Serialize;

use crate::models::{ElementKind, NodeId, PackageId};

/// Snapshot of a removed node, sufficient to report what was removed
/// without holding a handle to it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedNode {
    pub kind: ElementKind,
    pub id: Option<String>,
    pub meta_id: Option<String>,
    pub former_parent: NodeId,
    pub former_index: usize,
}

/// Events emitted by document mutations.
///
/// Structural events (`NodeAdded`, `NodeRemoved`) fire only after the tree
/// is fully linked or unlinked; `NodeAdded` fires bottom-up over a newly
/// attached subtree.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DocumentEvent {
    NodeAdded { node: NodeId, kind: ElementKind },
    NodeRemoved { removed: RemovedNode },
    IdChanged {
        node: NodeId,
        old: Option<String>,
        new: Option<String>,
    },
    MetaIdChanged {
        node: NodeId,
        old: Option<String>,
        new: Option<String>,
    },
    AttributeChanged { node: NodeId, name: String },
    ExtensionAdded { node: NodeId, namespace: String },
    ExtensionRemoved { node: NodeId, namespace: String },
    PackageEnabled { package: PackageId },
    PackageDisabled { package: PackageId },
}

impl DocumentEvent {
    /// A stable string tag for logging and subscriber dispatch.
    pub fn event_type(&self) -> &'static str {
        match self {
            DocumentEvent::NodeAdded { .. } => "node:added",
            DocumentEvent::NodeRemoved { .. } => "node:removed",
            DocumentEvent::IdChanged { .. } => "node:idChanged",
            DocumentEvent::MetaIdChanged { .. } => "node:metaIdChanged",
            DocumentEvent::AttributeChanged { .. } => "node:attributeChanged",
            DocumentEvent::ExtensionAdded { .. } => "extension:added",
            DocumentEvent::ExtensionRemoved { .. } => "extension:removed",
            DocumentEvent::PackageEnabled { .. } => "package:enabled",
            DocumentEvent::PackageDisabled { .. } => "package:disabled",
        }
    }
}

/// Per-document event fan-out.
#[derive(Debug, Default)]
pub(crate) struct EventBus {
    senders: Vec<Sender<DocumentEvent>>,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        EventBus::default()
    }

    /// Registers a new subscriber and returns its receiving end.
    pub(crate) fn subscribe(&mut self) -> Receiver<DocumentEvent> {
        let (tx, rx) = channel();
        self.senders.push(tx);
        rx
    }

    /// Delivers `event` to every live subscriber, pruning dead ones.
    pub(crate) fn emit(&mut self, event: DocumentEvent) {
        if self.senders.is_empty() {
            return;
        }
        tracing::trace!(event = event.event_type(), "dispatching document event");
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}
