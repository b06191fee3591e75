//! Document Layer
//!
//! Everything that keeps the tree, the identifier registry, and the event
//! bus consistent with each other:
//!
//! - `Document` - the tree root and the only mutation surface
//! - `NodeArena` (private) - handle-addressed node storage
//! - `IdentifierRegistry` (private) - scoped SId + global metaid bindings
//! - `DocumentEvent` / `RemovedNode` - the change-notification channel
//! - `DocumentError` - structural, registry, and package errors

mod arena;
#[allow(clippy::module_inception)]
mod document;
mod error;
mod events;
mod registry;

pub use document::{is_valid_meta_id, is_valid_sid, Document, PackageState};
pub use error::DocumentError;
pub use events::{DocumentEvent, RemovedNode};
