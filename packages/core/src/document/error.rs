//! Document Layer Error Types
//!
//! Structural, registry, and package errors raised by mutating operations.
//! Every operation that can fail leaves the tree exactly as it was before
//! the call; these errors are the synchronous, fail-fast side of the error
//! taxonomy (validation findings are never errors, they accumulate in the
//! error log).

use thiserror::Error;

use crate::models::{ElementKind, PackageId};

/// Errors raised by document mutations.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// A handle did not resolve: the node was removed, or the handle
    /// belongs to a different document.
    #[error("stale or foreign node handle")]
    StaleHandle,

    /// Attach target already has a parent.
    #[error("cannot attach {child}: already attached under {parent}")]
    AlreadyAttached { child: String, parent: String },

    /// Detach argument is not currently a member of its parent's children.
    #[error("cannot detach {child}: not a member of any parent")]
    NotAMember { child: String },

    /// A node may not be attached underneath itself.
    #[error("cannot attach {node} underneath itself")]
    CircularReference { node: String },

    /// Container nodes only accept their declared child kind.
    #[error("container {container} does not accept {actual} children (expects {expected})")]
    ContainerKindMismatch {
        container: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Insertion index beyond the end of the child list.
    #[error("index {index} out of bounds for {len} children")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The id is already bound to a different node in the same scope.
    #[error("duplicate id \"{id}\" in scope {scope}")]
    DuplicateId { id: String, scope: String },

    /// The metaid is already bound to a different node in the document.
    #[error("duplicate metaid \"{meta_id}\"")]
    DuplicateMetaId { meta_id: String },

    /// Id does not match the SId syntax.
    #[error("\"{id}\" is not a valid identifier")]
    InvalidId { id: String },

    /// Metaid does not match the XML name syntax.
    #[error("\"{meta_id}\" is not a valid meta-identifier")]
    InvalidMetaId { meta_id: String },

    /// Ontology term out of range.
    #[error("{term} is not a valid ontology term (0..=9999999)")]
    InvalidSboTerm { term: u32 },

    /// Unknown (level, version) combination for this schema family.
    #[error("unsupported document level/version {level}.{version}")]
    InvalidLevelVersion { level: u32, version: u32 },

    /// The package has no namespace for the document's (level, version).
    #[error("package \"{package}\" is not defined for level {level} version {version}")]
    PackageUnavailable {
        package: &'static str,
        level: u32,
        version: u32,
    },

    /// The namespace handed to `add_extension` is not the one valid for
    /// this document's (level, version).
    #[error("namespace \"{namespace}\" does not match \"{expected}\" for package \"{package}\"")]
    PackageNamespaceMismatch {
        package: &'static str,
        namespace: String,
        expected: String,
    },

    /// Refusing to disable a package that still has plugin data attached.
    #[error("package \"{package}\" still has plugin data attached; strip it first")]
    PackageDataPresent { package: &'static str },

    /// The element kind does not support plugins of this package.
    #[error("{kind} elements do not support the \"{package}\" package")]
    UnsupportedPluginHost {
        package: &'static str,
        kind: &'static str,
    },

    /// A plugin subtree root was not an orphan, or did not fit any slot.
    #[error("invalid plugin subtree: {reason}")]
    InvalidPluginSubtree { reason: String },

    /// Structural parse failure in a built-in reader.
    #[error("parse error: {0}")]
    Parse(String),
}

impl DocumentError {
    pub(crate) fn already_attached(child: &str, parent: &str) -> Self {
        DocumentError::AlreadyAttached {
            child: child.to_string(),
            parent: parent.to_string(),
        }
    }

    pub(crate) fn duplicate_id(id: &str, scope: &str) -> Self {
        DocumentError::DuplicateId {
            id: id.to_string(),
            scope: scope.to_string(),
        }
    }

    pub(crate) fn duplicate_meta_id(meta_id: &str) -> Self {
        DocumentError::DuplicateMetaId {
            meta_id: meta_id.to_string(),
        }
    }

    pub(crate) fn container_kind_mismatch(
        container: ElementKind,
        expected: ElementKind,
        actual: ElementKind,
    ) -> Self {
        DocumentError::ContainerKindMismatch {
            container: container.name(),
            expected: expected.name(),
            actual: actual.name(),
        }
    }

    pub(crate) fn unsupported_host(package: PackageId, kind: ElementKind) -> Self {
        DocumentError::UnsupportedPluginHost {
            package: package.short_name(),
            kind: kind.name(),
        }
    }

    pub(crate) fn invalid_plugin_subtree(reason: impl Into<String>) -> Self {
        DocumentError::InvalidPluginSubtree {
            reason: reason.into(),
        }
    }
}
