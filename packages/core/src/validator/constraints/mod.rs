//! Constraints
//!
//! A constraint binds an error code to a target element kind and a check.
//! Checks are pure predicates over `(context, document, node)` and must not
//! mutate the tree.
//!
//! Beyond plain predicates, the engine supports a small set of generic
//! cross-cutting rule shapes directly, so per-package declarations can
//! state "this reference must resolve to that kind" without re-deriving the
//! resolution logic each time:
//!
//! - [`ConstraintCheck::DuplicateChild`] - element present at most once
//! - [`ConstraintCheck::IdRef`] - id reference resolves to an expected kind
//! - [`ConstraintCheck::MetaIdAgreement`] - metaid reference resolves, and
//!   agrees with a parallel id reference when both are present
//! - [`ConstraintCheck::Unparsable`] - attribute absent is fine, but
//!   present-and-unparsable is a finding
//!
//! A rule that exists in the catalogue but has no implemented body is an
//! explicit [`ConstraintCheck::NotImplemented`] marker, never a silently
//! passing predicate.

pub(crate) mod core;
pub(crate) mod packages;

use std::collections::HashMap;

use crate::document::Document;
use crate::models::{ElementKind, NodeId};
use crate::validator::{CheckCategory, Severity, ValidationContext};

/// Signature of an implemented rule body.
pub type CheckFn = fn(&ValidationContext, &Document, NodeId) -> bool;

/// How a constraint decides pass/fail for a matching node.
#[derive(Debug, Clone, Copy)]
pub enum ConstraintCheck {
    /// An arbitrary pure predicate.
    Predicate(CheckFn),
    /// At most one child of `child` kind (or, with `None`, no child kind
    /// repeated at all) under the matching node.
    DuplicateChild { child: Option<ElementKind> },
    /// `attribute`, when set as text, must resolve in the node's scope to
    /// an element of one of the `expected` kinds.
    IdRef {
        attribute: &'static str,
        expected: &'static [ElementKind],
    },
    /// `meta_attribute`, when set, must resolve document-globally; when
    /// `id_attribute` also resolves, both must name the same node.
    MetaIdAgreement {
        id_attribute: &'static str,
        meta_attribute: &'static str,
    },
    /// `attribute` may be absent, but must not carry the reader's
    /// present-but-unparsable marker.
    Unparsable { attribute: &'static str },
    /// Catalogued but not yet implemented; reported as unchecked.
    NotImplemented,
}

/// One validation rule.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub code: u32,
    pub category: CheckCategory,
    pub severity: Severity,
    /// The element kind this rule applies to; `None` matches every node.
    pub target: Option<ElementKind>,
    pub check: ConstraintCheck,
}

impl Constraint {
    pub fn applies_to(&self, kind: ElementKind) -> bool {
        self.target.map(|t| t == kind).unwrap_or(true)
    }

    pub fn is_implemented(&self) -> bool {
        !matches!(self.check, ConstraintCheck::NotImplemented)
    }

    /// Runs the check for one node. `None` means the rule body is not
    /// implemented (the engine records the code as unchecked instead).
    pub fn evaluate(
        &self,
        ctx: &ValidationContext,
        doc: &Document,
        node: NodeId,
    ) -> Option<bool> {
        let Some(data) = doc.get(node) else {
            return Some(true);
        };
        match &self.check {
            ConstraintCheck::Predicate(f) => Some(f(ctx, doc, node)),
            ConstraintCheck::DuplicateChild { child } => {
                let mut counts: HashMap<ElementKind, usize> = HashMap::new();
                for c in data.children() {
                    if let Some(kind) = doc.get(*c).map(|d| d.kind()) {
                        *counts.entry(kind).or_default() += 1;
                    }
                }
                Some(match child {
                    Some(kind) => counts.get(kind).copied().unwrap_or(0) <= 1,
                    None => counts.values().all(|n| *n <= 1),
                })
            }
            ConstraintCheck::IdRef {
                attribute,
                expected,
            } => {
                let Some(reference) = data.attribute(attribute).and_then(|v| v.as_text()) else {
                    return Some(true);
                };
                let resolved = doc
                    .resolve_id_from(node, reference)
                    .and_then(|target| doc.get(target))
                    .map(|d| d.kind());
                Some(matches!(resolved, Some(kind) if expected.contains(&kind)))
            }
            ConstraintCheck::MetaIdAgreement {
                id_attribute,
                meta_attribute,
            } => {
                let Some(meta_ref) = data.attribute(meta_attribute).and_then(|v| v.as_text())
                else {
                    return Some(true);
                };
                let Some(meta_target) = doc.resolve_meta_id(meta_ref) else {
                    return Some(false);
                };
                let id_target = data
                    .attribute(id_attribute)
                    .and_then(|v| v.as_text())
                    .and_then(|id| doc.resolve_id_from(node, id));
                Some(match id_target {
                    Some(id_target) => id_target == meta_target,
                    None => true,
                })
            }
            ConstraintCheck::Unparsable { attribute } => Some(
                !data
                    .attribute(attribute)
                    .map(|v| v.is_invalid())
                    .unwrap_or(false),
            ),
            ConstraintCheck::NotImplemented => None,
        }
    }
}

/// Appends the contiguous inclusive code range `[lo, hi]` to `set`.
pub(crate) fn add_range(set: &mut Vec<u32>, lo: u32, hi: u32) {
    set.extend(lo..=hi);
}

/// Declaration of one package's rule catalogue: which codes apply per
/// (level, version) and category, and how to build each rule.
pub(crate) trait ConstraintDeclaration {
    fn error_codes(&self, level: u32, version: u32, category: CheckCategory) -> Vec<u32>;
    fn build(&self, code: u32) -> Option<Constraint>;
}
