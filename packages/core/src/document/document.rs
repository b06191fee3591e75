//! Document
//!
//! The tree root and the only mutation surface of the library. Every
//! structural operation (attach, detach, rename, plugin add/unset) goes
//! through the document so that the identifier registry, the event bus, and
//! the tree itself can never drift apart.
//!
//! # Architecture
//!
//! - Nodes live in a per-document arena and are addressed by handles;
//!   `&mut Document` is required for any mutation, which makes the
//!   "exclusive access to the whole document" rule a compile-time fact.
//! - Registration is two-phase: a mutation first collects and checks every
//!   id/metaid binding it would create, then commits. A failed operation
//!   therefore leaves the tree exactly as it was.
//! - Structural events are emitted only after the tree is fully linked.

use std::collections::{BTreeMap, HashSet};
use std::sync::mpsc::Receiver;
use std::sync::OnceLock;

use regex::Regex;

use crate::document::arena::NodeArena;
use crate::document::error::DocumentError;
use crate::document::events::{DocumentEvent, EventBus, RemovedNode};
use crate::document::registry::IdentifierRegistry;
use crate::ext;
use crate::models::{AttributeValue, ElementKind, NodeData, NodeId, PackageId, Plugin};

const SID_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";
const META_ID_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_.\-]*$";

/// Whether `id` matches the SId syntax.
pub fn is_valid_sid(id: &str) -> bool {
    static SID_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SID_REGEX.get_or_init(|| Regex::new(SID_PATTERN).unwrap());
    regex.is_match(id)
}

/// Whether `meta_id` matches the metaid (XML name) syntax.
pub fn is_valid_meta_id(meta_id: &str) -> bool {
    static META_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = META_REGEX.get_or_init(|| Regex::new(META_ID_PATTERN).unwrap());
    regex.is_match(meta_id)
}

/// Serialization state of one enabled package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageState {
    pub namespace: String,
    /// Whether readers of the serialized document must understand the
    /// package to interpret the model correctly.
    pub required: bool,
}

/// Bindings a subtree would contribute to the registry, collected before
/// any mutation takes place.
#[derive(Debug, Default)]
struct Bindings {
    ids: Vec<(NodeId, String, NodeId)>,
    meta_ids: Vec<(String, NodeId)>,
}

/// A hierarchical document: the arena, the identifier registry, the event
/// bus, the (level, version) pair, and the package-enablement table.
#[derive(Debug)]
pub struct Document {
    arena: NodeArena,
    root: NodeId,
    level: u32,
    version: u32,
    registry: IdentifierRegistry,
    events: EventBus,
    packages: BTreeMap<PackageId, PackageState>,
}

impl Document {
    /// Creates an empty document for the given schema (level, version).
    ///
    /// The pair is fixed for the document's lifetime and must be set before
    /// any identifier is registered, because package namespaces and scope
    /// determination depend on it.
    pub fn new(level: u32, version: u32) -> Result<Self, DocumentError> {
        let valid = matches!((level, version), (1, 1..=2) | (2, 1..=5) | (3, 1..=2));
        if !valid {
            return Err(DocumentError::InvalidLevelVersion { level, version });
        }
        let mut arena = NodeArena::new();
        let root = arena.insert(NodeData::new(ElementKind::Document));
        Ok(Document {
            arena,
            root,
            level,
            version,
            registry: IdentifierRegistry::new(),
            events: EventBus::new(),
            packages: BTreeMap::new(),
        })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// The tree root (kind [`ElementKind::Document`]).
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The main model, if one has been attached.
    pub fn model(&self) -> Option<NodeId> {
        self.child_of_kind(self.root, ElementKind::Model)
    }

    /// Subscribes to document events; dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<DocumentEvent> {
        self.events.subscribe()
    }

    // ---------------------------------------------------------------------
    // Node access
    // ---------------------------------------------------------------------

    /// Resolves a handle, failing on stale or foreign handles.
    pub fn node(&self, id: NodeId) -> Result<&NodeData, DocumentError> {
        self.arena.get(id).ok_or(DocumentError::StaleHandle)
    }

    /// Non-failing variant of [`Document::node`].
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.arena.get(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id)
    }

    /// Number of live nodes, including the root and any orphan subtrees.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// First child of `parent` with the given kind.
    pub fn child_of_kind(&self, parent: NodeId, kind: ElementKind) -> Option<NodeId> {
        let data = self.arena.get(parent)?;
        data.children
            .iter()
            .copied()
            .find(|c| self.arena.get(*c).map(|d| d.kind) == Some(kind))
    }

    /// True when `node` is reachable from the document root (plugin
    /// subtrees count as reachable through their host).
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            let Some(data) = self.arena.get(current) else {
                return false;
            };
            match data.parent {
                Some(parent) => current = parent,
                None => return current == self.root,
            }
        }
    }

    // ---------------------------------------------------------------------
    // Scope determination
    // ---------------------------------------------------------------------

    /// The SId scope governing `node`'s own id: the nearest strict ancestor
    /// that is a model or model definition, else the document root.
    ///
    /// A node with no path to the root (a detached subtree) has no valid
    /// scope; its registration is deferred until attachment.
    pub fn sid_scope_of(&self, node: NodeId) -> Option<NodeId> {
        let mut scope = None;
        let mut last = node;
        let mut current = self.arena.get(node)?.parent;
        while let Some(ancestor) = current {
            let data = self.arena.get(ancestor)?;
            if scope.is_none() && data.kind.is_scope() {
                scope = Some(ancestor);
            }
            last = ancestor;
            current = data.parent;
        }
        // Only a chain that reaches the real root closes a scope; a scope
        // element inside a detached subtree governs nothing yet.
        if last == self.root {
            Some(scope.unwrap_or(self.root))
        } else {
            None
        }
    }

    /// The scope that ids of `parent`'s children land in.
    fn scope_for_children_of(&self, parent: NodeId) -> Option<NodeId> {
        let data = self.arena.get(parent)?;
        if data.kind.is_scope() {
            if self.is_attached(parent) {
                return Some(parent);
            }
            return None;
        }
        self.sid_scope_of(parent)
    }

    fn scope_label(&self, scope: NodeId) -> String {
        self.arena
            .get(scope)
            .map(|d| d.describe())
            .unwrap_or_else(|| "<unknown>".to_string())
    }

    // ---------------------------------------------------------------------
    // Identifier resolution
    // ---------------------------------------------------------------------

    /// Looks up an id within a scope (a model, model definition, or the
    /// document root).
    pub fn resolve_id(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        self.registry.resolve_id(scope, id)
    }

    /// Looks up a metaid document-globally.
    pub fn resolve_meta_id(&self, meta_id: &str) -> Option<NodeId> {
        self.registry.resolve_meta_id(meta_id)
    }

    /// Resolves `id` in the scope governing `from` (the usual form for
    /// attribute references).
    pub fn resolve_id_from(&self, from: NodeId, id: &str) -> Option<NodeId> {
        let scope = self.sid_scope_of(from)?;
        self.registry.resolve_id(scope, id)
    }

    // ---------------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------------

    /// Creates an orphan node of the given kind. It participates in no
    /// registry until attached.
    pub fn create_element(&mut self, kind: ElementKind) -> NodeId {
        self.arena.insert(NodeData::new(kind))
    }

    /// Creates a node and attaches it at the end of `parent`'s children.
    pub fn create_child(
        &mut self,
        parent: NodeId,
        kind: ElementKind,
    ) -> Result<NodeId, DocumentError> {
        let child = self.create_element(kind);
        if let Err(err) = self.attach(parent, child, None) {
            self.arena.remove(child);
            return Err(err);
        }
        Ok(child)
    }

    /// Factory form: creates a node with `id` already set and attaches it,
    /// registering the id at the destination scope. On any failure the
    /// parent keeps exactly the children it had.
    pub fn create_child_with_id(
        &mut self,
        parent: NodeId,
        kind: ElementKind,
        id: &str,
    ) -> Result<NodeId, DocumentError> {
        if !is_valid_sid(id) {
            return Err(DocumentError::InvalidId { id: id.to_string() });
        }
        let child = self.create_element(kind);
        self.arena
            .get_mut(child)
            .expect("freshly inserted node")
            .id = Some(id.to_string());
        if let Err(err) = self.attach(parent, child, None) {
            self.arena.remove(child);
            return Err(err);
        }
        Ok(child)
    }

    // ---------------------------------------------------------------------
    // Attach / detach
    // ---------------------------------------------------------------------

    /// Inserts `child` at `index` (or the end) of `parent`'s children.
    ///
    /// Fails without mutating anything if the child already has a parent,
    /// the container kind does not accept it, the index is out of bounds,
    /// or any id/metaid in the child's subtree would collide at the
    /// destination. Emits `NodeAdded` bottom-up once the subtree is linked.
    pub fn attach(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: Option<usize>,
    ) -> Result<(), DocumentError> {
        let parent_data = self.node(parent)?;
        let parent_kind = parent_data.kind;
        let parent_len = parent_data.children.len();
        let child_data = self.node(child)?;
        let child_kind = child_data.kind;

        if child == self.root || child == parent {
            return Err(DocumentError::CircularReference {
                node: child_data.describe(),
            });
        }
        if let Some(current) = child_data.parent {
            let holder = self.scope_label(current);
            return Err(DocumentError::already_attached(
                &child_data.describe(),
                &holder,
            ));
        }
        if let ElementKind::ListOf(list_kind) = parent_kind {
            let expected = list_kind.child_kind();
            if child_kind != expected {
                return Err(DocumentError::container_kind_mismatch(
                    parent_kind,
                    expected,
                    child_kind,
                ));
            }
        }
        let index = index.unwrap_or(parent_len);
        if index > parent_len {
            return Err(DocumentError::IndexOutOfBounds {
                index,
                len: parent_len,
            });
        }

        // Phase one: compute every binding the subtree would create and
        // check all of them before touching anything.
        let bindings = match self.scope_for_children_of(parent) {
            Some(scope) => {
                let mut bindings = Bindings::default();
                self.collect_bindings(child, scope, &mut bindings);
                self.check_bindings(&bindings)?;
                Some(bindings)
            }
            // Destination itself is detached: registration stays deferred.
            None => None,
        };

        // Phase two: link, register, notify.
        self.arena
            .get_mut(child)
            .expect("validated above")
            .parent = Some(parent);
        self.arena
            .get_mut(parent)
            .expect("validated above")
            .children
            .insert(index, child);
        if let Some(bindings) = bindings {
            self.commit_bindings(bindings);
        }

        if let Some(data) = self.arena.get(child) {
            tracing::debug!(child = %data.describe(), "attached node");
        }
        for node in self.post_order(child) {
            let kind = self.arena.get(node).expect("linked subtree").kind;
            self.events.emit(DocumentEvent::NodeAdded { node, kind });
        }
        Ok(())
    }

    /// Removes `child` from its parent. The subtree stays alive as an
    /// orphan (re-attachable elsewhere) but loses every registry binding.
    pub fn detach(&mut self, child: NodeId) -> Result<(), DocumentError> {
        let child_data = self.node(child)?;
        let describe = child_data.describe();
        let Some(parent) = child_data.parent else {
            return Err(DocumentError::NotAMember { child: describe });
        };
        let parent_data = self.node(parent)?;
        let Some(position) = parent_data.children.iter().position(|c| *c == child) else {
            // Parent link without membership: a plugin subtree root, which
            // only `unset_plugin` may remove.
            return Err(DocumentError::NotAMember { child: describe });
        };

        if let Some(scope) = self.scope_for_children_of(parent) {
            let mut bindings = Bindings::default();
            self.collect_bindings(child, scope, &mut bindings);
            self.release_bindings(&bindings);
        }

        self.arena
            .get_mut(parent)
            .expect("validated above")
            .children
            .remove(position);
        let data = self.arena.get_mut(child).expect("validated above");
        data.parent = None;
        let removed = RemovedNode {
            kind: data.kind,
            id: data.id.clone(),
            meta_id: data.meta_id.clone(),
            former_parent: parent,
            former_index: position,
        };
        tracing::debug!(child = removed.id.as_deref(), "detached node");
        self.events.emit(DocumentEvent::NodeRemoved { removed });
        Ok(())
    }

    /// Detaches `node` if needed, then frees its whole subtree (plugin
    /// subtrees included). Handles into the subtree go stale.
    pub fn remove_subtree(&mut self, node: NodeId) -> Result<(), DocumentError> {
        if node == self.root {
            return Err(DocumentError::CircularReference {
                node: "document".to_string(),
            });
        }
        let data = self.node(node)?;
        if data.parent.is_some() {
            // Plugin roots are rejected here by detach, by design of
            // `unset_plugin` being their only removal path.
            self.detach(node)?;
        }
        for id in self.post_order(node) {
            self.arena.remove(id);
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Cloning
    // ---------------------------------------------------------------------

    /// Deep-copies a subtree, plugins included. The copy is an orphan with
    /// no registry membership; attaching it re-registers its identifiers
    /// at the destination scope and may fail exactly like a fresh
    /// registration would. No events are fired.
    pub fn clone_subtree(&mut self, src: NodeId) -> Result<NodeId, DocumentError> {
        self.node(src)?;
        let copy = self.clone_rec(src);
        self.arena.get_mut(copy).expect("fresh clone").parent = None;
        Ok(copy)
    }

    fn clone_rec(&mut self, src: NodeId) -> NodeId {
        let mut data = self.arena.get(src).expect("caller validated").clone();
        let old_children = std::mem::take(&mut data.children);
        let old_plugins = std::mem::take(&mut data.plugins);
        data.parent = None;
        let copy = self.arena.insert(data);

        let mut new_children = Vec::with_capacity(old_children.len());
        for child in old_children {
            let new_child = self.clone_rec(child);
            self.arena.get_mut(new_child).expect("fresh clone").parent = Some(copy);
            new_children.push(new_child);
        }
        let mut new_plugins = BTreeMap::new();
        for (namespace, mut plugin) in old_plugins {
            plugin.map_roots(|root| {
                let new_root = self.clone_rec(root);
                self.arena.get_mut(new_root).expect("fresh clone").parent = Some(copy);
                new_root
            });
            new_plugins.insert(namespace, plugin);
        }
        let data = self.arena.get_mut(copy).expect("fresh clone");
        data.children = new_children;
        data.plugins = new_plugins;
        copy
    }

    // ---------------------------------------------------------------------
    // Property setters
    // ---------------------------------------------------------------------

    /// Sets or clears the node's id.
    ///
    /// On an attached node this is a compound operation: the old binding is
    /// released and the new one registered; if the new id collides, the old
    /// binding is restored and the node keeps its previous id.
    pub fn set_id(&mut self, node: NodeId, id: Option<&str>) -> Result<(), DocumentError> {
        if let Some(id) = id {
            if !is_valid_sid(id) {
                return Err(DocumentError::InvalidId { id: id.to_string() });
            }
        }
        let data = self.node(node)?;
        let old = data.id.clone();
        if old.as_deref() == id {
            return Ok(());
        }

        if let Some(scope) = self.registered_scope_of(node) {
            let label = self.scope_label(scope);
            if let Some(old_id) = old.as_deref() {
                self.registry.unregister_id(scope, old_id, node);
            }
            if let Some(new_id) = id {
                if let Err(err) = self.registry.register_id(scope, new_id, node, &label) {
                    // Roll back: the old binding cannot collide.
                    if let Some(old_id) = old.as_deref() {
                        self.registry
                            .register_id(scope, old_id, node, &label)
                            .expect("restoring a just-released binding");
                    }
                    return Err(err);
                }
            }
        }

        let data = self.arena.get_mut(node).expect("validated above");
        data.id = id.map(str::to_string);
        let new = data.id.clone();
        self.events.emit(DocumentEvent::IdChanged { node, old, new });
        Ok(())
    }

    /// Sets or clears the node's metaid (document-global namespace), with
    /// the same rollback behavior as [`Document::set_id`].
    pub fn set_meta_id(&mut self, node: NodeId, meta_id: Option<&str>) -> Result<(), DocumentError> {
        if let Some(meta_id) = meta_id {
            if !is_valid_meta_id(meta_id) {
                return Err(DocumentError::InvalidMetaId {
                    meta_id: meta_id.to_string(),
                });
            }
        }
        let data = self.node(node)?;
        let old = data.meta_id.clone();
        if old.as_deref() == meta_id {
            return Ok(());
        }

        if self.is_attached(node) {
            if let Some(old_meta) = old.as_deref() {
                self.registry.unregister_meta_id(old_meta, node);
            }
            if let Some(new_meta) = meta_id {
                if let Err(err) = self.registry.register_meta_id(new_meta, node) {
                    if let Some(old_meta) = old.as_deref() {
                        self.registry
                            .register_meta_id(old_meta, node)
                            .expect("restoring a just-released binding");
                    }
                    return Err(err);
                }
            }
        }

        let data = self.arena.get_mut(node).expect("validated above");
        data.meta_id = meta_id.map(str::to_string);
        let new = data.meta_id.clone();
        self.events
            .emit(DocumentEvent::MetaIdChanged { node, old, new });
        Ok(())
    }

    /// Sets the ontology term reference (range-checked).
    pub fn set_sbo_term(&mut self, node: NodeId, term: Option<u32>) -> Result<(), DocumentError> {
        if let Some(term) = term {
            if term > 9_999_999 {
                return Err(DocumentError::InvalidSboTerm { term });
            }
        }
        self.arena
            .get_mut(node)
            .ok_or(DocumentError::StaleHandle)?
            .sbo_term = term;
        Ok(())
    }

    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), DocumentError> {
        self.arena
            .get_mut(node)
            .ok_or(DocumentError::StaleHandle)?
            .attributes
            .insert(name.to_string(), value);
        self.events.emit(DocumentEvent::AttributeChanged {
            node,
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn unset_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DocumentError> {
        let data = self.arena.get_mut(node).ok_or(DocumentError::StaleHandle)?;
        if data.attributes.remove(name).is_some() {
            self.events.emit(DocumentEvent::AttributeChanged {
                node,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn set_notes(&mut self, node: NodeId, notes: Option<&str>) -> Result<(), DocumentError> {
        self.arena
            .get_mut(node)
            .ok_or(DocumentError::StaleHandle)?
            .notes = notes.map(str::to_string);
        Ok(())
    }

    pub fn set_annotation(
        &mut self,
        node: NodeId,
        annotation: Option<serde_json::Value>,
    ) -> Result<(), DocumentError> {
        self.arena
            .get_mut(node)
            .ok_or(DocumentError::StaleHandle)?
            .annotation = annotation;
        Ok(())
    }

    pub(crate) fn set_package_version(
        &mut self,
        node: NodeId,
        version: Option<u32>,
    ) -> Result<(), DocumentError> {
        self.arena
            .get_mut(node)
            .ok_or(DocumentError::StaleHandle)?
            .package_version = version;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Traversal
    // ---------------------------------------------------------------------

    /// Pre-order depth-first traversal: the node itself, its plugins'
    /// subtrees in namespace order, then its children in index order.
    ///
    /// The identifier registry and the validation engine both assume this
    /// order for first-declared-wins duplicate detection.
    pub fn traverse(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.traverse_into(from, &mut out);
        out
    }

    fn traverse_into(&self, node: NodeId, out: &mut Vec<NodeId>) {
        let Some(data) = self.arena.get(node) else {
            return;
        };
        out.push(node);
        for plugin in data.plugins.values() {
            for root in plugin.roots() {
                self.traverse_into(root, out);
            }
        }
        for child in &data.children {
            self.traverse_into(*child, out);
        }
    }

    /// Post-order variant (children before parents); used for bottom-up
    /// notification and subtree removal.
    fn post_order(&self, from: NodeId) -> Vec<NodeId> {
        let mut pre = self.traverse(from);
        pre.reverse();
        pre
    }

    // ---------------------------------------------------------------------
    // Binding bookkeeping
    // ---------------------------------------------------------------------

    /// Collects every id/metaid binding the subtree rooted at `node` would
    /// hold, with `outer_scope` governing ids up to the first nested scope
    /// element. Plugin subtrees are treated as native children.
    fn collect_bindings(&self, node: NodeId, outer_scope: NodeId, out: &mut Bindings) {
        let Some(data) = self.arena.get(node) else {
            return;
        };
        if let Some(id) = &data.id {
            out.ids.push((outer_scope, id.clone(), node));
        }
        if let Some(meta_id) = &data.meta_id {
            out.meta_ids.push((meta_id.clone(), node));
        }
        let inner_scope = if data.kind.is_scope() { node } else { outer_scope };
        for plugin in data.plugins.values() {
            for root in plugin.roots() {
                self.collect_bindings(root, inner_scope, out);
            }
        }
        for child in &data.children {
            self.collect_bindings(*child, inner_scope, out);
        }
    }

    /// Verifies that none of the collected bindings collide, either with
    /// the registry or among themselves (first declared wins).
    fn check_bindings(&self, bindings: &Bindings) -> Result<(), DocumentError> {
        let mut seen_ids: HashSet<(NodeId, &str)> = HashSet::new();
        for (scope, id, node) in &bindings.ids {
            if !self.registry.id_is_free_for(*scope, id, *node)
                || !seen_ids.insert((*scope, id.as_str()))
            {
                return Err(DocumentError::duplicate_id(id, &self.scope_label(*scope)));
            }
        }
        let mut seen_metas: HashSet<&str> = HashSet::new();
        for (meta_id, node) in &bindings.meta_ids {
            if !self.registry.meta_id_is_free_for(meta_id, *node)
                || !seen_metas.insert(meta_id.as_str())
            {
                return Err(DocumentError::duplicate_meta_id(meta_id));
            }
        }
        Ok(())
    }

    /// Commits bindings previously validated by [`Document::check_bindings`].
    fn commit_bindings(&mut self, bindings: Bindings) {
        for (scope, id, node) in bindings.ids {
            let label = self.scope_label(scope);
            self.registry
                .register_id(scope, &id, node, &label)
                .expect("bindings were checked");
        }
        for (meta_id, node) in bindings.meta_ids {
            self.registry
                .register_meta_id(&meta_id, node)
                .expect("bindings were checked");
        }
    }

    fn release_bindings(&mut self, bindings: &Bindings) {
        for (scope, id, node) in &bindings.ids {
            self.registry.unregister_id(*scope, id, *node);
        }
        for (meta_id, node) in &bindings.meta_ids {
            self.registry.unregister_meta_id(meta_id, *node);
        }
    }

    /// The scope `node`'s id is currently registered under, if any: the
    /// node must be attached and governed by a live scope.
    fn registered_scope_of(&self, node: NodeId) -> Option<NodeId> {
        if !self.is_attached(node) {
            return None;
        }
        self.sid_scope_of(node)
    }

    // ---------------------------------------------------------------------
    // Package enablement
    // ---------------------------------------------------------------------

    /// Declares a package enabled for serialization, independent of whether
    /// any node carries its plugin.
    pub fn enable_package(&mut self, package: PackageId) -> Result<(), DocumentError> {
        let namespace = ext::namespace_uri(package, self.level, self.version).ok_or(
            DocumentError::PackageUnavailable {
                package: package.short_name(),
                level: self.level,
                version: self.version,
            },
        )?;
        if self.packages.contains_key(&package) {
            return Ok(());
        }
        self.packages.insert(
            package,
            PackageState {
                namespace: namespace.to_string(),
                required: package.default_required(),
            },
        );
        self.events.emit(DocumentEvent::PackageEnabled { package });
        Ok(())
    }

    /// Withdraws a package from serialization. Fails with
    /// [`DocumentError::PackageDataPresent`] if any node still carries the
    /// package's plugin; use [`Document::strip_package`] to remove data
    /// explicitly first. Disabling a package that is not enabled is a no-op.
    pub fn disable_package(&mut self, package: PackageId) -> Result<(), DocumentError> {
        if self.has_package_data(package) {
            return Err(DocumentError::PackageDataPresent {
                package: package.short_name(),
            });
        }
        if self.packages.remove(&package).is_some() {
            self.events.emit(DocumentEvent::PackageDisabled { package });
        }
        Ok(())
    }

    /// Removes every plugin of `package` (unregistering all contributed
    /// identifiers and freeing the subtrees), then disables the package.
    pub fn strip_package(&mut self, package: PackageId) -> Result<(), DocumentError> {
        let hosts: Vec<NodeId> = self
            .traverse(self.root)
            .into_iter()
            .filter(|n| {
                self.arena
                    .get(*n)
                    .map(|d| d.plugins.values().any(|p| p.package == package))
                    .unwrap_or(false)
            })
            .collect();
        for host in hosts {
            if let Some(plugin) = self.unset_plugin(host, package)? {
                for root in plugin.roots() {
                    self.remove_subtree(root)?;
                }
            }
        }
        self.disable_package(package)
    }

    pub fn is_package_enabled(&self, package: PackageId) -> bool {
        self.packages.contains_key(&package)
    }

    pub fn package_state(&self, package: PackageId) -> Option<&PackageState> {
        self.packages.get(&package)
    }

    /// Enabled packages in serialization order.
    pub fn enabled_packages(&self) -> impl Iterator<Item = (PackageId, &PackageState)> {
        self.packages.iter().map(|(p, s)| (*p, s))
    }

    pub fn set_package_required(
        &mut self,
        package: PackageId,
        required: bool,
    ) -> Result<(), DocumentError> {
        let state =
            self.packages
                .get_mut(&package)
                .ok_or(DocumentError::PackageUnavailable {
                    package: package.short_name(),
                    level: self.level,
                    version: self.version,
                })?;
        state.required = required;
        Ok(())
    }

    /// Whether any node attached to the tree carries a plugin of `package`.
    fn has_package_data(&self, package: PackageId) -> bool {
        self.traverse(self.root).into_iter().any(|n| {
            self.arena
                .get(n)
                .map(|d| d.plugins.values().any(|p| p.package == package))
                .unwrap_or(false)
        })
    }

    // ---------------------------------------------------------------------
    // Plugins
    // ---------------------------------------------------------------------

    /// The plugin of `package` on `node`, if attached.
    pub fn plugin(&self, node: NodeId, package: PackageId) -> Option<&Plugin> {
        self.arena
            .get(node)?
            .plugins
            .values()
            .find(|p| p.package == package)
    }

    /// Returns the plugin of `package` on `node`, creating an empty one
    /// (and enabling the package) if none is attached yet. Never absent
    /// for a supported host kind.
    pub fn ensure_plugin(
        &mut self,
        node: NodeId,
        package: PackageId,
    ) -> Result<&Plugin, DocumentError> {
        let kind = self.node(node)?.kind;
        if !ext::supports(package, kind) {
            return Err(DocumentError::unsupported_host(package, kind));
        }
        let namespace = ext::namespace_uri(package, self.level, self.version)
            .ok_or(DocumentError::PackageUnavailable {
                package: package.short_name(),
                level: self.level,
                version: self.version,
            })?
            .to_string();
        if self.plugin(node, package).is_none() {
            let plugin = Plugin::new(
                package,
                namespace.as_str(),
                ext::default_package_version(package),
            );
            self.arena
                .get_mut(node)
                .expect("validated above")
                .plugins
                .insert(namespace.clone(), plugin);
            self.enable_package(package)?;
            self.events.emit(DocumentEvent::ExtensionAdded {
                node,
                namespace: namespace.clone(),
            });
        }
        Ok(self.plugin(node, package).expect("just ensured"))
    }

    /// Attaches a fully built plugin under `namespace`, registering every
    /// id/metaid its subtrees contribute (scoped as if the subtrees were
    /// native children of `node`). An existing plugin for the namespace is
    /// replaced: its contributions are unregistered first and it is
    /// returned with its subtrees as orphans. Fails without mutating
    /// anything if the namespace is wrong for the document's
    /// (level, version) or a binding would collide.
    pub fn add_extension(
        &mut self,
        node: NodeId,
        namespace: &str,
        plugin: Plugin,
    ) -> Result<Option<Plugin>, DocumentError> {
        let kind = self.node(node)?.kind;
        let package = plugin.package();
        if !ext::supports(package, kind) {
            return Err(DocumentError::unsupported_host(package, kind));
        }
        let expected = ext::namespace_uri(package, self.level, self.version).ok_or(
            DocumentError::PackageUnavailable {
                package: package.short_name(),
                level: self.level,
                version: self.version,
            },
        )?;
        if namespace != expected || plugin.namespace() != expected {
            return Err(DocumentError::PackageNamespaceMismatch {
                package: package.short_name(),
                namespace: namespace.to_string(),
                expected: expected.to_string(),
            });
        }
        for root in plugin.roots() {
            let data = self.node(root).map_err(|_| {
                DocumentError::invalid_plugin_subtree("subtree root handle is stale")
            })?;
            if data.parent.is_some() || root == self.root || root == node {
                return Err(DocumentError::invalid_plugin_subtree(
                    "subtree roots must be orphans",
                ));
            }
        }

        // Replace-first: take the old plugin out (releasing its bindings)
        // so the new plugin's bindings are checked against a clean slate.
        let replaced = self.unset_plugin(node, package)?;

        let mut bindings = Bindings::default();
        if let Some(scope) = self.scope_for_children_of(node) {
            for root in plugin.roots() {
                self.collect_bindings(root, scope, &mut bindings);
            }
            if let Err(err) = self.check_bindings(&bindings) {
                // Restore the replaced plugin; its bindings were valid.
                if let Some(old) = replaced {
                    self.reattach_plugin(node, old);
                }
                return Err(err);
            }
        }

        for root in plugin.roots() {
            self.arena.get_mut(root).expect("validated above").parent = Some(node);
        }
        self.commit_bindings(bindings);
        self.arena
            .get_mut(node)
            .expect("validated above")
            .plugins
            .insert(namespace.to_string(), plugin);
        self.enable_package(package)?;
        self.events.emit(DocumentEvent::ExtensionAdded {
            node,
            namespace: namespace.to_string(),
        });
        Ok(replaced)
    }

    /// Removes the plugin of `package` from `node`, unregistering every
    /// identifier it contributed. The plugin is returned with its subtrees
    /// intact as orphans; `Ok(None)` when no such plugin was attached.
    pub fn unset_plugin(
        &mut self,
        node: NodeId,
        package: PackageId,
    ) -> Result<Option<Plugin>, DocumentError> {
        self.node(node)?;
        let Some(namespace) = self
            .arena
            .get(node)
            .and_then(|d| {
                d.plugins
                    .iter()
                    .find(|(_, p)| p.package == package)
                    .map(|(ns, _)| ns.clone())
            })
        else {
            return Ok(None);
        };

        let plugin = self
            .arena
            .get_mut(node)
            .expect("validated above")
            .plugins
            .remove(&namespace)
            .expect("namespace found above");

        if let Some(scope) = self.scope_for_children_of(node) {
            let mut bindings = Bindings::default();
            for root in plugin.roots() {
                self.collect_bindings(root, scope, &mut bindings);
            }
            self.release_bindings(&bindings);
        }
        for root in plugin.roots() {
            if let Some(data) = self.arena.get_mut(root) {
                data.parent = None;
            }
        }
        self.events.emit(DocumentEvent::ExtensionRemoved {
            node,
            namespace,
        });
        Ok(Some(plugin))
    }

    /// Files an orphan container into the matching slot of `node`'s
    /// `package` plugin, linking and registering its subtree. The container
    /// inherits the plugin's package version unless it already has one.
    pub(crate) fn adopt_plugin_root(
        &mut self,
        node: NodeId,
        package: PackageId,
        child: NodeId,
    ) -> Result<(), DocumentError> {
        let child_data = self.node(child)?;
        let child_kind = child_data.kind;
        if child_data.parent.is_some() {
            return Err(DocumentError::invalid_plugin_subtree(
                "subtree roots must be orphans",
            ));
        }
        let (namespace, package_version) = self
            .plugin(node, package)
            .map(|p| (p.namespace().to_string(), p.package_version()))
            .ok_or_else(|| DocumentError::unsupported_host(package, child_kind))?;

        let mut bindings = Bindings::default();
        if let Some(scope) = self.scope_for_children_of(node) {
            self.collect_bindings(child, scope, &mut bindings);
            self.check_bindings(&bindings)?;
        }

        // Slot filing can still fail (wrong kind, occupied slot); it does
        // not mutate in that case, so nothing needs unwinding.
        let plugin = self
            .arena
            .get_mut(node)
            .expect("validated above")
            .plugins
            .get_mut(&namespace)
            .expect("namespace found above");
        plugin
            .data
            .adopt_root(child_kind, child)
            .map_err(DocumentError::invalid_plugin_subtree)?;

        let data = self.arena.get_mut(child).expect("validated above");
        data.parent = Some(node);
        if data.package_version.is_none() {
            data.package_version = Some(package_version);
        }
        self.commit_bindings(bindings);
        for added in self.post_order(child) {
            let kind = self.arena.get(added).expect("linked subtree").kind;
            self.events
                .emit(DocumentEvent::NodeAdded { node: added, kind });
        }
        Ok(())
    }

    /// Puts a previously removed plugin back (used to undo a failed
    /// replacement); its bindings are known-good.
    fn reattach_plugin(&mut self, node: NodeId, plugin: Plugin) {
        let namespace = plugin.namespace().to_string();
        let mut bindings = Bindings::default();
        if let Some(scope) = self.scope_for_children_of(node) {
            for root in plugin.roots() {
                self.collect_bindings(root, scope, &mut bindings);
            }
        }
        for root in plugin.roots() {
            if let Some(data) = self.arena.get_mut(root) {
                data.parent = Some(node);
            }
        }
        self.commit_bindings(bindings);
        if let Some(data) = self.arena.get_mut(node) {
            data.plugins.insert(namespace, plugin);
        }
    }

    // ---------------------------------------------------------------------
    // Registry introspection (test support)
    // ---------------------------------------------------------------------

    pub fn registered_id_count(&self) -> usize {
        self.registry.id_count()
    }

    pub fn registered_meta_id_count(&self) -> usize {
        self.registry.meta_id_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListOfKind;

    fn doc_with_model() -> (Document, NodeId) {
        let mut doc = Document::new(3, 1).unwrap();
        let model = doc
            .create_child_with_id(doc.root(), ElementKind::Model, "m")
            .unwrap();
        (doc, model)
    }

    #[test]
    fn invalid_level_version_is_rejected() {
        assert!(matches!(
            Document::new(4, 1),
            Err(DocumentError::InvalidLevelVersion { .. })
        ));
        assert!(matches!(
            Document::new(3, 3),
            Err(DocumentError::InvalidLevelVersion { .. })
        ));
    }

    #[test]
    fn duplicate_id_fails_and_parent_keeps_one_child() {
        let (mut doc, model) = doc_with_model();
        let list = doc
            .create_child(model, ElementKind::ListOf(ListOfKind::Compartments))
            .unwrap();
        let first = doc
            .create_child_with_id(list, ElementKind::Compartment, "c1")
            .unwrap();

        let err = doc
            .create_child_with_id(list, ElementKind::Compartment, "c1")
            .unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateId { .. }));
        assert_eq!(doc.node(list).unwrap().children(), &[first]);
        assert_eq!(doc.resolve_id(model, "c1"), Some(first));
    }

    #[test]
    fn attach_rejects_a_child_that_already_has_a_parent() {
        let (mut doc, model) = doc_with_model();
        let list = doc
            .create_child(model, ElementKind::ListOf(ListOfKind::Species))
            .unwrap();
        let species = doc
            .create_child_with_id(list, ElementKind::Species, "s1")
            .unwrap();

        let err = doc.attach(model, species, None).unwrap_err();
        assert!(matches!(err, DocumentError::AlreadyAttached { .. }));
    }

    #[test]
    fn containers_only_accept_their_child_kind() {
        let (mut doc, model) = doc_with_model();
        let list = doc
            .create_child(model, ElementKind::ListOf(ListOfKind::Species))
            .unwrap();
        let err = doc.create_child(list, ElementKind::Compartment).unwrap_err();
        assert!(matches!(err, DocumentError::ContainerKindMismatch { .. }));
    }

    #[test]
    fn attach_index_is_bounded_and_ordering_is_preserved() {
        let (mut doc, model) = doc_with_model();
        let list = doc
            .create_child(model, ElementKind::ListOf(ListOfKind::Parameters))
            .unwrap();
        let p1 = doc
            .create_child_with_id(list, ElementKind::Parameter, "p1")
            .unwrap();
        let p2 = doc
            .create_child_with_id(list, ElementKind::Parameter, "p2")
            .unwrap();

        let p0 = doc.create_element(ElementKind::Parameter);
        doc.attach(list, p0, Some(0)).unwrap();
        assert_eq!(doc.node(list).unwrap().children(), &[p0, p1, p2]);

        let beyond = doc.create_element(ElementKind::Parameter);
        let err = doc.attach(list, beyond, Some(5)).unwrap_err();
        assert!(matches!(err, DocumentError::IndexOutOfBounds { .. }));
    }

    #[test]
    fn detach_unregisters_the_whole_subtree() {
        let (mut doc, model) = doc_with_model();
        let list = doc
            .create_child(model, ElementKind::ListOf(ListOfKind::Species))
            .unwrap();
        let species = doc
            .create_child_with_id(list, ElementKind::Species, "s1")
            .unwrap();
        doc.set_meta_id(species, Some("meta_s1")).unwrap();

        doc.detach(list).unwrap();
        assert_eq!(doc.resolve_id(model, "s1"), None);
        assert_eq!(doc.resolve_meta_id("meta_s1"), None);
        assert!(doc.get(species).is_some());
        assert!(!doc.is_attached(species));

        // Re-attachment registers again (idempotent round trip).
        doc.attach(model, list, None).unwrap();
        assert_eq!(doc.resolve_id(model, "s1"), Some(species));
        assert_eq!(doc.resolve_meta_id("meta_s1"), Some(species));
    }

    #[test]
    fn detach_of_a_non_member_fails() {
        let (mut doc, _model) = doc_with_model();
        let orphan = doc.create_element(ElementKind::Species);
        assert!(matches!(
            doc.detach(orphan),
            Err(DocumentError::NotAMember { .. })
        ));
    }

    #[test]
    fn rename_rolls_back_on_collision() {
        let (mut doc, model) = doc_with_model();
        let list = doc
            .create_child(model, ElementKind::ListOf(ListOfKind::Compartments))
            .unwrap();
        let c1 = doc
            .create_child_with_id(list, ElementKind::Compartment, "c1")
            .unwrap();
        let c2 = doc
            .create_child_with_id(list, ElementKind::Compartment, "c2")
            .unwrap();

        let err = doc.set_id(c2, Some("c1")).unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateId { .. }));
        // No partial state: both bindings as before the call.
        assert_eq!(doc.node(c2).unwrap().id(), Some("c2"));
        assert_eq!(doc.resolve_id(model, "c1"), Some(c1));
        assert_eq!(doc.resolve_id(model, "c2"), Some(c2));
    }

    #[test]
    fn rename_moves_the_binding() {
        let (mut doc, model) = doc_with_model();
        let list = doc
            .create_child(model, ElementKind::ListOf(ListOfKind::Compartments))
            .unwrap();
        let c1 = doc
            .create_child_with_id(list, ElementKind::Compartment, "c1")
            .unwrap();

        doc.set_id(c1, Some("c9")).unwrap();
        assert_eq!(doc.resolve_id(model, "c1"), None);
        assert_eq!(doc.resolve_id(model, "c9"), Some(c1));

        doc.set_id(c1, None).unwrap();
        assert_eq!(doc.resolve_id(model, "c9"), None);
        assert_eq!(doc.registered_id_count(), 1); // the model's own id
    }

    #[test]
    fn id_syntax_is_checked_on_set() {
        let (mut doc, model) = doc_with_model();
        let list = doc
            .create_child(model, ElementKind::ListOf(ListOfKind::Compartments))
            .unwrap();
        let c1 = doc.create_child(list, ElementKind::Compartment).unwrap();

        assert!(matches!(
            doc.set_id(c1, Some("1bad")),
            Err(DocumentError::InvalidId { .. })
        ));
        assert!(matches!(
            doc.set_meta_id(c1, Some("has space")),
            Err(DocumentError::InvalidMetaId { .. })
        ));
        doc.set_id(c1, Some("_ok_1")).unwrap();
        doc.set_meta_id(c1, Some("meta.ok-1")).unwrap();
    }

    #[test]
    fn meta_ids_are_unique_across_scopes() {
        let (mut doc, model) = doc_with_model();
        doc.set_meta_id(model, Some("shared")).unwrap();

        let list = doc
            .create_child(model, ElementKind::ListOf(ListOfKind::Species))
            .unwrap();
        let species = doc.create_child(list, ElementKind::Species).unwrap();
        let err = doc.set_meta_id(species, Some("shared")).unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateMetaId { .. }));
        assert_eq!(doc.resolve_meta_id("shared"), Some(model));
    }

    #[test]
    fn clone_is_an_orphan_with_no_registry_membership() {
        let (mut doc, model) = doc_with_model();
        let list = doc
            .create_child(model, ElementKind::ListOf(ListOfKind::Species))
            .unwrap();
        let species = doc
            .create_child_with_id(list, ElementKind::Species, "s1")
            .unwrap();
        doc.set_meta_id(species, Some("meta_s1")).unwrap();

        let ids_before = doc.registered_id_count();
        let metas_before = doc.registered_meta_id_count();

        let copy = doc.clone_subtree(list).unwrap();
        assert!(doc.node(copy).unwrap().parent().is_none());
        assert_eq!(doc.registered_id_count(), ids_before);
        assert_eq!(doc.registered_meta_id_count(), metas_before);

        // The original still resolves; the copy resolves nowhere.
        assert_eq!(doc.resolve_id(model, "s1"), Some(species));
        assert_eq!(doc.resolve_meta_id("meta_s1"), Some(species));
    }

    #[test]
    fn attaching_a_clone_with_conflicting_metaid_fails_cleanly() {
        let (mut doc, model) = doc_with_model();
        let list = doc
            .create_child(model, ElementKind::ListOf(ListOfKind::Species))
            .unwrap();
        let species = doc
            .create_child_with_id(list, ElementKind::Species, "s1")
            .unwrap();
        doc.set_meta_id(species, Some("meta_s1")).unwrap();

        let copy = doc.clone_subtree(species).unwrap();
        doc.set_id(copy, Some("s2")).unwrap(); // detached: no registry

        let err = doc.attach(list, copy, None).unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateMetaId { .. }));
        assert!(!doc.is_attached(copy));
        assert_eq!(doc.resolve_meta_id("meta_s1"), Some(species));

        // After removing the original, the clone attaches fine.
        doc.remove_subtree(species).unwrap();
        doc.attach(list, copy, None).unwrap();
        assert_eq!(doc.resolve_meta_id("meta_s1"), Some(copy));
    }

    #[test]
    fn structural_events_fire_bottom_up_after_linking() {
        let (mut doc, model) = doc_with_model();
        let events = doc.subscribe();

        let list = doc.create_element(ElementKind::ListOf(ListOfKind::Species));
        let species = doc.create_element(ElementKind::Species);
        doc.attach(list, species, None).unwrap(); // detached: still notifies
        let _ = events.try_iter().count();

        doc.attach(model, list, None).unwrap();
        let kinds: Vec<ElementKind> = events
            .try_iter()
            .filter_map(|e| match e {
                DocumentEvent::NodeAdded { kind, .. } => Some(kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ElementKind::Species,
                ElementKind::ListOf(ListOfKind::Species)
            ]
        );

        doc.detach(list).unwrap();
        let removed: Vec<DocumentEvent> = events.try_iter().collect();
        assert_eq!(removed.len(), 1);
        assert!(matches!(removed[0], DocumentEvent::NodeRemoved { .. }));
    }

    #[test]
    fn disable_package_rejects_while_data_is_present() {
        let (mut doc, model) = doc_with_model();
        crate::ext::layout::create_layout(&mut doc, model, "l1").unwrap();
        assert!(doc.is_package_enabled(PackageId::Layout));

        let err = doc.disable_package(PackageId::Layout).unwrap_err();
        assert!(matches!(err, DocumentError::PackageDataPresent { .. }));
        assert!(doc.is_package_enabled(PackageId::Layout));

        doc.strip_package(PackageId::Layout).unwrap();
        assert!(!doc.is_package_enabled(PackageId::Layout));
        assert!(doc.plugin(model, PackageId::Layout).is_none());
        assert_eq!(doc.resolve_id(model, "l1"), None);
    }

    #[test]
    fn enabling_without_data_is_legal_and_visible_to_writers() {
        let mut doc = Document::new(3, 1).unwrap();
        doc.enable_package(PackageId::Layout).unwrap();
        assert!(doc.is_package_enabled(PackageId::Layout));
        assert_eq!(
            doc.enabled_packages().count(),
            1,
            "enablement is independent of plugin presence"
        );
    }

    #[test]
    fn packages_are_rejected_for_levels_without_a_namespace() {
        let mut doc = Document::new(2, 4).unwrap();
        assert!(matches!(
            doc.enable_package(PackageId::Layout),
            Err(DocumentError::PackageUnavailable { .. })
        ));
    }

    #[test]
    fn unset_plugin_unregisters_contributed_ids() {
        let (mut doc, model) = doc_with_model();
        let layout = crate::ext::layout::create_layout(&mut doc, model, "l1").unwrap();
        crate::ext::layout::create_compartment_glyph(&mut doc, layout, "g1", "c1").unwrap();
        assert!(doc.resolve_id(model, "g1").is_some());

        let plugin = doc.unset_plugin(model, PackageId::Layout).unwrap().unwrap();
        assert_eq!(doc.resolve_id(model, "g1"), None);
        assert_eq!(doc.resolve_id(model, "l1"), None);
        // The subtree survives as orphans, re-attachable via add_extension.
        assert_eq!(plugin.roots().len(), 1);
        assert!(doc.get(plugin.roots()[0]).is_some());
    }

    #[test]
    fn add_extension_replaces_and_returns_the_previous_plugin() {
        let (mut doc, model) = doc_with_model();
        let layout = crate::ext::layout::create_layout(&mut doc, model, "l1").unwrap();
        let namespace = doc
            .plugin(model, PackageId::Layout)
            .unwrap()
            .namespace()
            .to_string();

        // Build a replacement plugin holding a fresh, empty container.
        let list = doc.create_element(ElementKind::ListOf(ListOfKind::Layouts));
        let mut replacement = Plugin::new(PackageId::Layout, &*namespace, 1);
        replacement
            .data
            .adopt_root(ElementKind::ListOf(ListOfKind::Layouts), list)
            .unwrap();

        let replaced = doc
            .add_extension(model, &namespace, replacement)
            .unwrap()
            .expect("previous plugin returned");
        assert_eq!(doc.resolve_id(model, "l1"), None, "old ids unregistered");
        assert!(doc.get(layout).is_some(), "old subtree preserved as orphan");
        assert_eq!(replaced.roots().len(), 1);
    }

    #[test]
    fn add_extension_rejects_a_foreign_namespace() {
        let (mut doc, model) = doc_with_model();
        let plugin = Plugin::new(PackageId::Layout, "urn:example:wrong", 1);
        let err = doc
            .add_extension(model, "urn:example:wrong", plugin)
            .unwrap_err();
        assert!(matches!(err, DocumentError::PackageNamespaceMismatch { .. }));
    }

    #[test]
    fn traversal_visits_plugins_before_children() {
        let (mut doc, model) = doc_with_model();
        let list = doc
            .create_child(model, ElementKind::ListOf(ListOfKind::Compartments))
            .unwrap();
        let layout = crate::ext::layout::create_layout(&mut doc, model, "l1").unwrap();

        let order = doc.traverse(model);
        let pos = |n: NodeId| order.iter().position(|x| *x == n).unwrap();
        assert_eq!(pos(model), 0);
        assert!(pos(layout) < pos(list), "plugin subtree precedes children");
    }
}
