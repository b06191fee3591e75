//! BioDoc Core Document Layer
//!
//! This crate provides the programmatic document model for a structured
//! biological-model interchange format: a hierarchical document tree with
//! globally consistent identifiers, namespace-scoped extension packages,
//! and a categorized validation engine.
//!
//! # Architecture
//!
//! - **Arena tree**: nodes live in a per-document arena behind
//!   generation-checked handles; `&mut Document` is the only mutation path
//! - **Identifier registry**: SIds are unique per scope (model / model
//!   definition), metaids document-wide; every structural operation keeps
//!   the registry and the tree consistent or fails without mutating
//! - **Closed package set**: extension data attaches through a per-node
//!   plugin table; the supported packages are a compile-time sum type
//! - **Lazy validation rules**: constraints are built on first use and
//!   cached per (level, version); findings accumulate, they never throw
//!
//! # Modules
//!
//! - [`models`] - node payloads, element kinds, attributes, plugins
//! - [`document`] - the document, its arena, registry, and events
//! - [`ext`] - extension packages (comp, fbc, layout)
//! - [`validator`] - check categories, error codes, the constraint engine
//! - [`io`] - reader/writer contracts and the structural JSON form

pub mod document;
pub mod ext;
pub mod io;
pub mod models;
pub mod validator;

// Re-export commonly used types
pub use document::{Document, DocumentError, DocumentEvent, PackageState, RemovedNode};
pub use models::{
    AttributeValue, ElementKind, ListOfKind, NodeData, NodeId, PackageId, Plugin, PluginData,
};
pub use validator::{
    CheckCategory, ErrorLog, Severity, ValidationContext, ValidationIssue, ValidatorError,
};
