//! Constraint Factory
//!
//! Turns error codes into rule objects. Codes are resolved through the
//! per-package declarations and constructed on first use; the
//! [`ValidationContext`](crate::validator::ValidationContext) caches the
//! results keyed by (level, version, code), so the factory itself stays
//! stateless.

use crate::models::PackageId;
use crate::validator::codes;
use crate::validator::constraints::core::CoreConstraints;
use crate::validator::constraints::packages::{
    CompConstraints, FbcConstraints, LayoutConstraints,
};
use crate::validator::constraints::{Constraint, ConstraintDeclaration};
use crate::validator::CheckCategory;

/// The rule catalogues a validation run draws from: the core band plus one
/// band per package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RulePackage {
    Core,
    Package(PackageId),
}

fn declaration(package: RulePackage) -> &'static dyn ConstraintDeclaration {
    match package {
        RulePackage::Core => &CoreConstraints,
        RulePackage::Package(PackageId::Comp) => &CompConstraints,
        RulePackage::Package(PackageId::Fbc) => &FbcConstraints,
        RulePackage::Package(PackageId::Layout) => &LayoutConstraints,
    }
}

/// The codes `package` contributes for a (level, version) and category.
pub(crate) fn codes_for(
    package: RulePackage,
    level: u32,
    version: u32,
    category: CheckCategory,
) -> Vec<u32> {
    declaration(package).error_codes(level, version, category)
}

/// Builds the rule object for `code`, dispatching into the band's
/// declaration. `None` for unknown codes.
pub(crate) fn build(code: u32) -> Option<Constraint> {
    let package = match codes::package_of(code) {
        None => RulePackage::Core,
        Some(pkg) => RulePackage::Package(pkg),
    };
    declaration(package).build(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_dispatches_by_band() {
        assert_eq!(build(codes::CORE_20608).unwrap().code, codes::CORE_20608);
        assert_eq!(
            build(codes::LAYOUT_20401).unwrap().code,
            codes::LAYOUT_20401
        );
        assert!(build(999_999).is_none());
        assert!(build(codes::CORE_20608 + 1).is_none());
    }

    #[test]
    fn codes_for_stays_inside_the_band() {
        for category in CheckCategory::ALL {
            for code in codes_for(RulePackage::Package(PackageId::Fbc), 3, 1, category) {
                assert_eq!(codes::package_of(code), Some(PackageId::Fbc));
            }
            for code in codes_for(RulePackage::Core, 3, 1, category) {
                assert_eq!(codes::package_of(code), None);
            }
        }
    }
}
