//! Model Composition Package
//!
//! The comp package lets a document carry independently id-scoped model
//! definitions next to its main model, and lets a model instantiate them
//! as submodels. Model definitions are the one place where a document
//! contains more than one SId scope at the top level: each definition's
//! contents get their own namespace, while the definitions' own ids share
//! the document scope with the main model's id.

use crate::document::{Document, DocumentError};
use crate::models::{ElementKind, ListOfKind, NodeId, PackageId, PluginData};

/// The document's `listOfModelDefinitions` container, if present.
pub fn model_definitions_list(doc: &Document) -> Option<NodeId> {
    match doc.plugin(doc.root(), PackageId::Comp)?.data() {
        PluginData::Comp(p) => p.list_of_model_definitions,
        _ => None,
    }
}

/// The model definitions of the document, in declaration order.
pub fn model_definitions(doc: &Document) -> Vec<NodeId> {
    model_definitions_list(doc)
        .and_then(|list| doc.get(list))
        .map(|d| d.children().to_vec())
        .unwrap_or_default()
}

/// Creates a model definition with the given id, creating the comp plugin
/// and its container on first use. The definition's id registers in the
/// document scope; its future contents get their own scope.
pub fn create_model_definition(doc: &mut Document, id: &str) -> Result<NodeId, DocumentError> {
    let root = doc.root();
    doc.ensure_plugin(root, PackageId::Comp)?;
    let list = match model_definitions_list(doc) {
        Some(list) => list,
        None => {
            let list = doc.create_element(ElementKind::ListOf(ListOfKind::ModelDefinitions));
            doc.adopt_plugin_root(root, PackageId::Comp, list)?;
            list
        }
    };
    doc.create_child_with_id(list, ElementKind::ModelDefinition, id)
}

/// The model's `listOfSubmodels` container, if present.
pub fn submodels_list(doc: &Document, model: NodeId) -> Option<NodeId> {
    match doc.plugin(model, PackageId::Comp)?.data() {
        PluginData::Comp(p) => p.list_of_submodels,
        _ => None,
    }
}

/// Creates a submodel instantiating `model_ref` inside `model`.
pub fn create_submodel(
    doc: &mut Document,
    model: NodeId,
    id: &str,
    model_ref: &str,
) -> Result<NodeId, DocumentError> {
    doc.ensure_plugin(model, PackageId::Comp)?;
    let list = match submodels_list(doc, model) {
        Some(list) => list,
        None => {
            let list = doc.create_element(ElementKind::ListOf(ListOfKind::Submodels));
            doc.adopt_plugin_root(model, PackageId::Comp, list)?;
            list
        }
    };
    let submodel = doc.create_child_with_id(list, ElementKind::Submodel, id)?;
    doc.set_attribute(submodel, "modelRef", model_ref.into())?;
    Ok(submodel)
}
