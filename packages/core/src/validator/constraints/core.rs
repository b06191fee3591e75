//! Core Rule Catalogue
//!
//! Declarations and rule bodies for the core band. Each category lists its
//! codes for a given (level, version); `build` turns a code into the rule
//! object the factory caches.

use std::collections::HashSet;

use crate::document::{is_valid_meta_id, is_valid_sid, Document};
use crate::models::{ElementKind, NodeId};
use crate::validator::codes::*;
use crate::validator::constraints::{
    add_range, Constraint, ConstraintCheck, ConstraintDeclaration,
};
use crate::validator::{CheckCategory, Severity, ValidationContext};

pub(crate) struct CoreConstraints;

impl ConstraintDeclaration for CoreConstraints {
    fn error_codes(&self, level: u32, _version: u32, category: CheckCategory) -> Vec<u32> {
        let mut set = Vec::new();
        match category {
            CheckCategory::General => {
                set.push(CORE_20101);
                add_range(&mut set, CORE_20201, CORE_20202);
                set.push(CORE_20608);
                add_range(&mut set, CORE_10501, CORE_10502);
            }
            CheckCategory::Identifier => {
                if level >= 2 {
                    add_range(&mut set, CORE_10301, CORE_10304);
                } else {
                    // Level 1 has no metaid attribute.
                    set.push(CORE_10301);
                    set.push(CORE_10303);
                }
            }
            CheckCategory::MathML => add_range(&mut set, CORE_10201, CORE_10202),
            CheckCategory::Units => add_range(&mut set, CORE_10601, CORE_10602),
            CheckCategory::Sbo => set.push(CORE_10701),
            CheckCategory::Overdetermined => set.push(CORE_10801),
            CheckCategory::ModelingPractice => set.push(CORE_80501),
        }
        set
    }

    fn build(&self, code: u32) -> Option<Constraint> {
        let constraint = match code {
            CORE_10201 | CORE_10202 => Constraint {
                code,
                category: CheckCategory::MathML,
                severity: Severity::Error,
                target: None,
                check: ConstraintCheck::NotImplemented,
            },
            CORE_10301 => Constraint {
                code,
                category: CheckCategory::Identifier,
                severity: Severity::Error,
                target: None,
                check: ConstraintCheck::Predicate(check_id_syntax),
            },
            CORE_10302 => Constraint {
                code,
                category: CheckCategory::Identifier,
                severity: Severity::Error,
                target: None,
                check: ConstraintCheck::Predicate(check_meta_id_syntax),
            },
            CORE_10303 => Constraint {
                code,
                category: CheckCategory::Identifier,
                severity: Severity::Error,
                target: Some(ElementKind::Document),
                check: ConstraintCheck::Predicate(check_unique_ids),
            },
            CORE_10304 => Constraint {
                code,
                category: CheckCategory::Identifier,
                severity: Severity::Error,
                target: Some(ElementKind::Document),
                check: ConstraintCheck::Predicate(check_unique_meta_ids),
            },
            CORE_10501 => Constraint {
                code,
                category: CheckCategory::General,
                severity: Severity::Error,
                target: Some(ElementKind::Compartment),
                check: ConstraintCheck::Unparsable { attribute: "size" },
            },
            CORE_10502 => Constraint {
                code,
                category: CheckCategory::General,
                severity: Severity::Error,
                target: Some(ElementKind::Species),
                check: ConstraintCheck::Unparsable {
                    attribute: "initialAmount",
                },
            },
            CORE_10601 | CORE_10602 => Constraint {
                code,
                category: CheckCategory::Units,
                severity: Severity::Warning,
                target: None,
                check: ConstraintCheck::NotImplemented,
            },
            CORE_10701 => Constraint {
                code,
                category: CheckCategory::Sbo,
                severity: Severity::Warning,
                target: None,
                check: ConstraintCheck::Predicate(check_sbo_term),
            },
            CORE_10801 => Constraint {
                code,
                category: CheckCategory::Overdetermined,
                severity: Severity::Warning,
                target: Some(ElementKind::Model),
                check: ConstraintCheck::NotImplemented,
            },
            CORE_20101 => Constraint {
                code,
                category: CheckCategory::General,
                severity: Severity::Fatal,
                target: Some(ElementKind::Document),
                check: ConstraintCheck::Predicate(check_level_version),
            },
            CORE_20201 => Constraint {
                code,
                category: CheckCategory::General,
                severity: Severity::Error,
                target: Some(ElementKind::Document),
                check: ConstraintCheck::Predicate(check_has_model),
            },
            CORE_20202 => Constraint {
                code,
                category: CheckCategory::General,
                severity: Severity::Error,
                target: Some(ElementKind::Model),
                check: ConstraintCheck::DuplicateChild { child: None },
            },
            CORE_20608 => Constraint {
                code,
                category: CheckCategory::General,
                severity: Severity::Error,
                target: Some(ElementKind::Species),
                check: ConstraintCheck::IdRef {
                    attribute: "compartment",
                    expected: &[ElementKind::Compartment],
                },
            },
            CORE_80501 => Constraint {
                code,
                category: CheckCategory::ModelingPractice,
                severity: Severity::Warning,
                target: Some(ElementKind::Compartment),
                check: ConstraintCheck::Predicate(check_size_is_set),
            },
            _ => return None,
        };
        Some(constraint)
    }
}

fn check_id_syntax(_ctx: &ValidationContext, doc: &Document, node: NodeId) -> bool {
    match doc.get(node).and_then(|d| d.id()) {
        Some(id) => is_valid_sid(id),
        None => true,
    }
}

fn check_meta_id_syntax(_ctx: &ValidationContext, doc: &Document, node: NodeId) -> bool {
    match doc.get(node).and_then(|d| d.meta_id()) {
        Some(meta_id) => is_valid_meta_id(meta_id),
        None => true,
    }
}

/// Registry/tree consistency: every attached node with an id must be the
/// node its scope resolves that id to.
fn check_unique_ids(_ctx: &ValidationContext, doc: &Document, root: NodeId) -> bool {
    doc.traverse(root).into_iter().all(|node| {
        let Some(id) = doc.get(node).and_then(|d| d.id()) else {
            return true;
        };
        let Some(scope) = doc.sid_scope_of(node) else {
            return false;
        };
        doc.resolve_id(scope, id) == Some(node)
    })
}

fn check_unique_meta_ids(_ctx: &ValidationContext, doc: &Document, root: NodeId) -> bool {
    let mut seen: HashSet<&str> = HashSet::new();
    doc.traverse(root).into_iter().all(|node| {
        let Some(meta_id) = doc.get(node).and_then(|d| d.meta_id()) else {
            return true;
        };
        seen.insert(meta_id) && doc.resolve_meta_id(meta_id) == Some(node)
    })
}

fn check_sbo_term(_ctx: &ValidationContext, doc: &Document, node: NodeId) -> bool {
    match doc.get(node).and_then(|d| d.sbo_term()) {
        Some(term) => term <= 9_999_999,
        None => true,
    }
}

fn check_level_version(_ctx: &ValidationContext, _doc: &Document, _node: NodeId) -> bool {
    // Invalid combinations never reach validation: document construction
    // rejects them. The rule stays in the catalogue for report parity.
    true
}

fn check_has_model(_ctx: &ValidationContext, doc: &Document, _node: NodeId) -> bool {
    doc.model().is_some()
}

fn check_size_is_set(_ctx: &ValidationContext, doc: &Document, node: NodeId) -> bool {
    // An unparsable size still counts as "set" here; the general-category
    // rule for the unparsable marker reports it separately.
    doc.get(node)
        .map(|d| d.attribute("size").is_some())
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_declared_core_code_builds() {
        let decl = CoreConstraints;
        for category in CheckCategory::ALL {
            for code in decl.error_codes(3, 1, category) {
                let constraint = decl.build(code).expect("declared code must build");
                assert_eq!(constraint.code, code);
                assert_eq!(constraint.category, category);
            }
        }
    }

    #[test]
    fn level_one_has_no_metaid_rules() {
        let decl = CoreConstraints;
        let codes = decl.error_codes(1, 2, CheckCategory::Identifier);
        assert!(codes.contains(&CORE_10301));
        assert!(!codes.contains(&CORE_10302));
        assert!(!codes.contains(&CORE_10304));
    }
}
