//! Extension Plugins
//!
//! A plugin is the per-node side-structure holding one extension package's
//! contributed subtree. The set of packages is a closed sum ([`PluginData`]),
//! so dispatch over package internals is exhaustive at compile time while
//! each package's node kinds vary freely.
//!
//! Plugin subtrees live in the same arena as core nodes; a plugin only
//! records the handles of its subtree roots. For identifier scoping the
//! roots behave as if they were native children of the host node.

use serde::{Deserialize, Serialize};

use crate::models::element::{ElementKind, ListOfKind, PackageId};
use crate::models::node::NodeId;

/// A package attachment on one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plugin {
    /// Which package contributed this plugin.
    pub(crate) package: PackageId,
    /// The namespace URI the plugin serializes under; must match the
    /// package namespace for the owning document's (level, version).
    pub(crate) namespace: String,
    /// The package's own minor version, independent of the document's
    /// (level, version). Containers created through the plugin inherit it.
    pub(crate) package_version: u32,
    pub(crate) data: PluginData,
}

impl Plugin {
    pub fn new(package: PackageId, namespace: impl Into<String>, package_version: u32) -> Self {
        let data = match package {
            PackageId::Comp => PluginData::Comp(CompPlugin::default()),
            PackageId::Fbc => PluginData::Fbc(FbcPlugin::default()),
            PackageId::Layout => PluginData::Layout(LayoutPlugin::default()),
        };
        Plugin {
            package,
            namespace: namespace.into(),
            package_version,
            data,
        }
    }

    pub fn package(&self) -> PackageId {
        self.package
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn package_version(&self) -> u32 {
        self.package_version
    }

    pub fn data(&self) -> &PluginData {
        &self.data
    }

    /// The roots of the subtrees this plugin contributes, in serialization
    /// order. Identifier registration walks exactly these.
    pub fn roots(&self) -> Vec<NodeId> {
        self.data.roots()
    }

    /// True when the plugin carries no subtree at all.
    pub fn is_empty(&self) -> bool {
        self.data.roots().is_empty()
    }

    /// Rewrites every subtree-root handle through `f` (used by subtree
    /// cloning, where all handles move to fresh arena slots).
    pub(crate) fn map_roots(&mut self, mut f: impl FnMut(NodeId) -> NodeId) {
        self.data.map_roots(&mut f);
    }
}

/// Package-specific plugin payload: one variant per supported package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "package", rename_all = "camelCase")]
pub enum PluginData {
    Comp(CompPlugin),
    Fbc(FbcPlugin),
    Layout(LayoutPlugin),
}

impl PluginData {
    pub fn roots(&self) -> Vec<NodeId> {
        match self {
            PluginData::Comp(p) => [p.list_of_model_definitions, p.list_of_submodels]
                .into_iter()
                .flatten()
                .collect(),
            PluginData::Fbc(p) => p.list_of_objectives.into_iter().collect(),
            PluginData::Layout(p) => p.list_of_layouts.into_iter().collect(),
        }
    }

    fn map_roots(&mut self, f: &mut impl FnMut(NodeId) -> NodeId) {
        match self {
            PluginData::Comp(p) => {
                p.list_of_model_definitions = p.list_of_model_definitions.map(&mut *f);
                p.list_of_submodels = p.list_of_submodels.map(&mut *f);
            }
            PluginData::Fbc(p) => p.list_of_objectives = p.list_of_objectives.map(&mut *f),
            PluginData::Layout(p) => p.list_of_layouts = p.list_of_layouts.map(&mut *f),
        }
    }

    /// Files a container node into the slot it belongs to, by its kind.
    /// Fails when the package has no slot for that kind or the slot is
    /// already occupied.
    pub(crate) fn adopt_root(&mut self, kind: ElementKind, node: NodeId) -> Result<(), &'static str> {
        let slot = match (self, kind) {
            (PluginData::Comp(p), ElementKind::ListOf(ListOfKind::ModelDefinitions)) => {
                &mut p.list_of_model_definitions
            }
            (PluginData::Comp(p), ElementKind::ListOf(ListOfKind::Submodels)) => {
                &mut p.list_of_submodels
            }
            (PluginData::Fbc(p), ElementKind::ListOf(ListOfKind::Objectives)) => {
                &mut p.list_of_objectives
            }
            (PluginData::Layout(p), ElementKind::ListOf(ListOfKind::Layouts)) => {
                &mut p.list_of_layouts
            }
            _ => return Err("no plugin slot for this element kind"),
        };
        if slot.is_some() {
            return Err("plugin slot already occupied");
        }
        *slot = Some(node);
        Ok(())
    }
}

/// Model-composition package payload: sub-model definitions on the
/// document, submodel instances on a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompPlugin {
    pub list_of_model_definitions: Option<NodeId>,
    pub list_of_submodels: Option<NodeId>,
}

/// Flux-balance package payload on a model.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FbcPlugin {
    pub list_of_objectives: Option<NodeId>,
    /// Strict flux-bound semantics flag, kept verbatim through round trips.
    pub strict: Option<bool>,
}

/// Layout package payload on a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlugin {
    pub list_of_layouts: Option<NodeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: u32) -> NodeId {
        NodeId {
            index,
            generation: 0,
        }
    }

    #[test]
    fn fresh_plugin_is_empty() {
        let plugin = Plugin::new(PackageId::Layout, "ns:layout", 1);
        assert!(plugin.is_empty());
        assert!(plugin.roots().is_empty());
    }

    #[test]
    fn adopt_root_rejects_foreign_kinds_and_double_fill() {
        let mut data = PluginData::Layout(LayoutPlugin::default());
        assert!(data
            .adopt_root(ElementKind::ListOf(ListOfKind::Objectives), id(1))
            .is_err());
        assert!(data
            .adopt_root(ElementKind::ListOf(ListOfKind::Layouts), id(1))
            .is_ok());
        assert!(data
            .adopt_root(ElementKind::ListOf(ListOfKind::Layouts), id(2))
            .is_err());
        assert_eq!(data.roots(), vec![id(1)]);
    }

    #[test]
    fn map_roots_rewrites_every_slot() {
        let mut plugin = Plugin::new(PackageId::Comp, "ns:comp", 1);
        plugin
            .data
            .adopt_root(ElementKind::ListOf(ListOfKind::ModelDefinitions), id(3))
            .unwrap();
        plugin
            .data
            .adopt_root(ElementKind::ListOf(ListOfKind::Submodels), id(4))
            .unwrap();
        plugin.map_roots(|n| id(n.index + 10));
        assert_eq!(plugin.roots(), vec![id(13), id(14)]);
    }
}
