//! External Interfaces
//!
//! The document's serialization collaborators. The markup tokenizer and
//! writer for the external XML form live outside this crate; they plug in
//! through [`DocumentReader`] and [`DocumentWriter`]. The built-in
//! [`json`] pair implements the same contracts over a structural JSON form
//! and is what the round-trip tests exercise.

pub mod json;

use crate::document::{Document, DocumentError};

/// A producer of documents from an external textual form.
///
/// Contract for implementors:
///
/// - Construct the document with its (level, version) *before* building any
///   element, because identifier scoping and package namespaces depend on
///   it.
/// - Build elements through the public document operations (create, attach,
///   add_extension), so every identifier registers exactly as it would for
///   application code.
/// - Surface scalar attributes that were present but unparsable as
///   [`AttributeValue::Invalid`](crate::models::AttributeValue::Invalid)
///   instead of silently dropping or defaulting them; the validation
///   engine distinguishes "not specified" from "present but invalid".
pub trait DocumentReader {
    fn read(&self, source: &str) -> Result<Document, DocumentError>;
}

/// A consumer serializing documents to an external textual form.
///
/// Contract for implementors:
///
/// - Walk the tree in document order: node, plugins in namespace order,
///   then children in index order.
/// - Skip logically empty containers unless explicitly told otherwise.
/// - Emit a package's namespace declaration iff the package is *enabled*
///   on the document, independent of whether any node carries its plugin.
pub trait DocumentWriter {
    fn write(&self, doc: &Document) -> Result<String, DocumentError>;
}
