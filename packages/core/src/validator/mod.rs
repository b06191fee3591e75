//! Validation Engine
//!
//! A categorized, error-code-driven constraint framework over the document
//! tree. Rules are identified by numeric codes inside package-specific
//! bands, grouped into seven fixed check categories, constructed lazily on
//! first use, and cached per (level, version).
//!
//! Findings never raise: they accumulate in an [`ErrorLog`]. Only misuse of
//! the engine itself (an unconfigured context, a detached validation
//! target) is an error.

pub mod constraints;
mod context;
mod factory;

pub mod codes;

use serde::Serialize;
use thiserror::Error;

pub use context::ValidationContext;

/// The seven fixed validation groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckCategory {
    /// General consistency of the document structure.
    General,
    /// Identifier syntax and uniqueness.
    Identifier,
    /// Consistency of attached mathematical expressions.
    MathML,
    /// Recommended modeling practice.
    ModelingPractice,
    /// Over-determination of the equation system.
    Overdetermined,
    /// Ontology-term (SBO) consistency.
    Sbo,
    /// Unit consistency.
    Units,
}

impl CheckCategory {
    /// All categories, in reporting order.
    pub const ALL: [CheckCategory; 7] = [
        CheckCategory::General,
        CheckCategory::Identifier,
        CheckCategory::MathML,
        CheckCategory::ModelingPractice,
        CheckCategory::Overdetermined,
        CheckCategory::Sbo,
        CheckCategory::Units,
    ];
}

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

/// Where a finding was raised.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLocation {
    pub element: &'static str,
    pub id: Option<String>,
    pub meta_id: Option<String>,
}

/// One validation finding.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub code: u32,
    pub category: CheckCategory,
    pub severity: Severity,
    pub location: IssueLocation,
    pub message: String,
}

/// The ordered findings of one validation run, plus the codes that were
/// resolved but whose rule bodies are not implemented. The latter lets a
/// consumer distinguish "checked and passed" from "not checked".
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorLog {
    issues: Vec<ValidationIssue>,
    unchecked: Vec<u32>,
}

impl ErrorLog {
    pub(crate) fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub(crate) fn mark_unchecked(&mut self, code: u32) {
        if !self.unchecked.contains(&code) {
            self.unchecked.push(code);
        }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_code(&self, code: u32) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    pub fn count_with_severity(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn count_in_category(&self, category: CheckCategory) -> usize {
        self.issues.iter().filter(|i| i.category == category).count()
    }

    /// Codes that were in scope for the run but have no implemented rule
    /// body (explicit "not checked" markers, never silent passes).
    pub fn unchecked_codes(&self) -> &[u32] {
        &self.unchecked
    }
}

/// Misuse of the validation engine. Domain findings are never errors.
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// The context's categories were never configured.
    #[error("validation context has no configured check categories")]
    UnconfiguredContext,

    /// The target of a subtree validation is not attached to its document.
    #[error("cannot validate detached subtree {node}")]
    DetachedTarget { node: String },

    /// A stale or foreign handle was passed as validation target.
    #[error("stale or foreign validation target")]
    StaleTarget,
}
