//! Package Rule Catalogues
//!
//! Constraint declarations for the built-in extension packages. Each
//! package's codes live in its own band; the generic rule shapes from the
//! engine cover most reference-resolution rules.

use crate::document::Document;
use crate::models::{ElementKind, NodeId};
use crate::validator::codes::*;
use crate::validator::constraints::{
    add_range, Constraint, ConstraintCheck, ConstraintDeclaration,
};
use crate::validator::{CheckCategory, Severity, ValidationContext};

pub(crate) struct CompConstraints;

impl ConstraintDeclaration for CompConstraints {
    fn error_codes(&self, _level: u32, _version: u32, category: CheckCategory) -> Vec<u32> {
        let mut set = Vec::new();
        if category == CheckCategory::General {
            add_range(&mut set, COMP_20101, COMP_20102);
        }
        set
    }

    fn build(&self, code: u32) -> Option<Constraint> {
        let constraint = match code {
            COMP_20101 => Constraint {
                code,
                category: CheckCategory::General,
                severity: Severity::Error,
                target: Some(ElementKind::Submodel),
                check: ConstraintCheck::Predicate(check_model_ref_resolves),
            },
            COMP_20102 => Constraint {
                code,
                category: CheckCategory::General,
                severity: Severity::Error,
                target: Some(ElementKind::Submodel),
                check: ConstraintCheck::Predicate(check_model_ref_not_self),
            },
            _ => return None,
        };
        Some(constraint)
    }
}

/// Model and model-definition ids live in the document scope, not in the
/// scope the submodel sits in, so this cannot use the generic id-ref shape.
fn check_model_ref_resolves(_ctx: &ValidationContext, doc: &Document, node: NodeId) -> bool {
    let Some(model_ref) = doc
        .get(node)
        .and_then(|d| d.attribute("modelRef"))
        .and_then(|v| v.as_text())
    else {
        return true;
    };
    matches!(
        doc.resolve_id(doc.root(), model_ref)
            .and_then(|target| doc.get(target))
            .map(|d| d.kind()),
        Some(ElementKind::Model | ElementKind::ModelDefinition)
    )
}

fn check_model_ref_not_self(_ctx: &ValidationContext, doc: &Document, node: NodeId) -> bool {
    let Some(model_ref) = doc
        .get(node)
        .and_then(|d| d.attribute("modelRef"))
        .and_then(|v| v.as_text())
    else {
        return true;
    };
    let Some(target) = doc.resolve_id(doc.root(), model_ref) else {
        return true; // resolution itself is the previous rule's concern
    };
    // Walk up from the submodel to the model or definition containing it.
    let mut current = doc.get(node).and_then(|d| d.parent());
    while let Some(ancestor) = current {
        let Some(data) = doc.get(ancestor) else {
            return true;
        };
        if data.kind().is_scope() {
            return ancestor != target;
        }
        current = data.parent();
    }
    true
}

pub(crate) struct FbcConstraints;

impl ConstraintDeclaration for FbcConstraints {
    fn error_codes(&self, _level: u32, _version: u32, category: CheckCategory) -> Vec<u32> {
        let mut set = Vec::new();
        if category == CheckCategory::General {
            set.push(FBC_20408);
            add_range(&mut set, FBC_20604, FBC_20605);
        }
        set
    }

    fn build(&self, code: u32) -> Option<Constraint> {
        let constraint = match code {
            FBC_20408 => Constraint {
                code,
                category: CheckCategory::General,
                severity: Severity::Error,
                target: Some(ElementKind::Objective),
                check: ConstraintCheck::Predicate(check_objective_type),
            },
            FBC_20604 => Constraint {
                code,
                category: CheckCategory::General,
                severity: Severity::Error,
                target: Some(ElementKind::FluxObjective),
                check: ConstraintCheck::IdRef {
                    attribute: "reaction",
                    expected: &[ElementKind::Reaction],
                },
            },
            FBC_20605 => Constraint {
                code,
                category: CheckCategory::General,
                severity: Severity::Error,
                target: Some(ElementKind::FluxObjective),
                check: ConstraintCheck::Unparsable {
                    attribute: "coefficient",
                },
            },
            _ => return None,
        };
        Some(constraint)
    }
}

fn check_objective_type(_ctx: &ValidationContext, doc: &Document, node: NodeId) -> bool {
    matches!(
        doc.get(node)
            .and_then(|d| d.attribute("type"))
            .and_then(|v| v.as_text()),
        Some("maximize" | "minimize")
    )
}

pub(crate) struct LayoutConstraints;

impl ConstraintDeclaration for LayoutConstraints {
    fn error_codes(&self, _level: u32, _version: u32, category: CheckCategory) -> Vec<u32> {
        let mut set = Vec::new();
        if category == CheckCategory::General {
            set.push(LAYOUT_20301);
            add_range(&mut set, LAYOUT_20401, LAYOUT_20402);
            set.push(LAYOUT_20501);
        }
        set
    }

    fn build(&self, code: u32) -> Option<Constraint> {
        let constraint = match code {
            LAYOUT_20301 => Constraint {
                code,
                category: CheckCategory::General,
                severity: Severity::Error,
                target: Some(ElementKind::CompartmentGlyph),
                check: ConstraintCheck::IdRef {
                    attribute: "compartment",
                    expected: &[ElementKind::Compartment],
                },
            },
            LAYOUT_20401 => Constraint {
                code,
                category: CheckCategory::General,
                severity: Severity::Error,
                target: Some(ElementKind::SpeciesGlyph),
                check: ConstraintCheck::IdRef {
                    attribute: "species",
                    expected: &[ElementKind::Species],
                },
            },
            LAYOUT_20402 => Constraint {
                code,
                category: CheckCategory::General,
                severity: Severity::Error,
                target: Some(ElementKind::SpeciesGlyph),
                check: ConstraintCheck::MetaIdAgreement {
                    id_attribute: "species",
                    meta_attribute: "metaidRef",
                },
            },
            LAYOUT_20501 => Constraint {
                code,
                category: CheckCategory::General,
                severity: Severity::Error,
                target: Some(ElementKind::ReactionGlyph),
                check: ConstraintCheck::IdRef {
                    attribute: "reaction",
                    expected: &[ElementKind::Reaction],
                },
            },
            _ => return None,
        };
        Some(constraint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_declared_package_code_builds_in_its_band() {
        let declarations: [(&dyn ConstraintDeclaration, u32); 3] = [
            (&CompConstraints, 1_000_000),
            (&FbcConstraints, 2_000_000),
            (&LayoutConstraints, 6_000_000),
        ];
        for (decl, offset) in declarations {
            for category in CheckCategory::ALL {
                for code in decl.error_codes(3, 1, category) {
                    assert_eq!(code / 1_000_000, offset / 1_000_000);
                    let constraint = decl.build(code).expect("declared code must build");
                    assert_eq!(constraint.code, code);
                }
            }
        }
    }
}
