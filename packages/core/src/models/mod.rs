//! Data Models
//!
//! This module contains the core data structures of the document tree:
//!
//! - `NodeData` / `NodeId` - the universal node payload and its handle
//! - `ElementKind` / `ListOfKind` - closed element-kind enumerations
//! - `AttributeValue` - tri-state typed attribute values
//! - `Plugin` / `PluginData` - extension-package side-structures
//!
//! All element kinds share the same payload; there are no per-element data
//! classes. Package-specific structure attaches through plugins.

mod attribute;
mod element;
mod node;
mod plugin;

pub use attribute::AttributeValue;
pub use element::{ElementKind, ListOfKind, PackageId};
pub use node::{NodeData, NodeId};
pub use plugin::{CompPlugin, FbcPlugin, LayoutPlugin, Plugin, PluginData};
