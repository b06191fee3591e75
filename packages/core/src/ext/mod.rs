//! Extension Packages
//!
//! Namespace bookkeeping and the builder APIs of the built-in packages:
//!
//! - [`comp`] - hierarchical model composition (model definitions, submodels)
//! - [`fbc`] - flux-balance constraints (objectives)
//! - [`layout`] - graphical layout (glyphs)
//!
//! A package is identified by its short name and, per document
//! (level, version), by a specific namespace URI. The mapping is a pure
//! lookup; a plugin whose namespace does not match the document's
//! (level, version) is rejected at attach time, not at serialization time.

pub mod comp;
pub mod fbc;
pub mod layout;

use crate::models::{ElementKind, PackageId};

const COMP_L3_V1: &str = "http://www.sbml.org/sbml/level3/version1/comp/version1";
const FBC_L3_V1: &str = "http://www.sbml.org/sbml/level3/version1/fbc/version1";
const FBC_L3_V2: &str = "http://www.sbml.org/sbml/level3/version1/fbc/version2";
const LAYOUT_L3_V1: &str = "http://www.sbml.org/sbml/level3/version1/layout/version1";

/// The namespace URI a package serializes under for a given document
/// (level, version), or `None` when the package is not defined there.
///
/// All built-in packages are level-3 packages; both version-1 and
/// version-2 documents use the level3/version1 package namespaces.
pub fn namespace_uri(package: PackageId, level: u32, _version: u32) -> Option<&'static str> {
    if level != 3 {
        return None;
    }
    Some(match package {
        PackageId::Comp => COMP_L3_V1,
        PackageId::Fbc => FBC_L3_V2,
        PackageId::Layout => LAYOUT_L3_V1,
    })
}

/// Reverse lookup for readers: which package and package version a
/// namespace declaration belongs to.
pub fn lookup_namespace(namespace: &str) -> Option<(PackageId, u32)> {
    match namespace {
        COMP_L3_V1 => Some((PackageId::Comp, 1)),
        FBC_L3_V1 => Some((PackageId::Fbc, 1)),
        FBC_L3_V2 => Some((PackageId::Fbc, 2)),
        LAYOUT_L3_V1 => Some((PackageId::Layout, 1)),
        _ => None,
    }
}

/// The package version a freshly created plugin starts with.
pub fn default_package_version(package: PackageId) -> u32 {
    match package {
        PackageId::Comp => 1,
        PackageId::Fbc => 2,
        PackageId::Layout => 1,
    }
}

/// Which element kinds may host a plugin of `package`.
pub fn supports(package: PackageId, host: ElementKind) -> bool {
    match package {
        PackageId::Comp => matches!(host, ElementKind::Document | ElementKind::Model),
        PackageId::Fbc => matches!(host, ElementKind::Model),
        PackageId::Layout => matches!(host, ElementKind::Model),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_exist_for_level_3_only() {
        for package in PackageId::all() {
            assert!(namespace_uri(package, 3, 1).is_some());
            assert!(namespace_uri(package, 3, 2).is_some());
            assert!(namespace_uri(package, 2, 4).is_none());
            assert!(namespace_uri(package, 1, 2).is_none());
        }
    }

    #[test]
    fn namespace_lookup_is_the_inverse_of_namespace_uri() {
        for package in PackageId::all() {
            let ns = namespace_uri(package, 3, 1).unwrap();
            let (found, version) = lookup_namespace(ns).unwrap();
            assert_eq!(found, package);
            assert_eq!(version, default_package_version(package));
        }
        // The older fbc namespace still resolves, with its own version.
        assert_eq!(lookup_namespace(FBC_L3_V1), Some((PackageId::Fbc, 1)));
        assert_eq!(lookup_namespace("urn:example:other"), None);
    }

    #[test]
    fn host_support_tables() {
        assert!(supports(PackageId::Comp, ElementKind::Document));
        assert!(supports(PackageId::Comp, ElementKind::Model));
        assert!(!supports(PackageId::Layout, ElementKind::Document));
        assert!(!supports(PackageId::Fbc, ElementKind::Species));
    }
}
