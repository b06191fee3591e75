//! Flux-Balance Constraints Package
//!
//! Objectives over reaction fluxes. A model's fbc plugin owns a
//! `listOfObjectives`; each objective holds flux objectives that reference
//! reactions by id and weight them with a coefficient.

use crate::document::{Document, DocumentError};
use crate::models::{AttributeValue, ElementKind, ListOfKind, NodeId, PackageId, PluginData};

/// The model's `listOfObjectives` container, if present.
pub fn objectives_list(doc: &Document, model: NodeId) -> Option<NodeId> {
    match doc.plugin(model, PackageId::Fbc)?.data() {
        PluginData::Fbc(p) => p.list_of_objectives,
        _ => None,
    }
}

/// Creates an objective (`"maximize"` or `"minimize"`) on `model`,
/// creating the fbc plugin and its container on first use.
pub fn create_objective(
    doc: &mut Document,
    model: NodeId,
    id: &str,
    objective_type: &str,
) -> Result<NodeId, DocumentError> {
    doc.ensure_plugin(model, PackageId::Fbc)?;
    let list = match objectives_list(doc, model) {
        Some(list) => list,
        None => {
            let list = doc.create_element(ElementKind::ListOf(ListOfKind::Objectives));
            doc.adopt_plugin_root(model, PackageId::Fbc, list)?;
            list
        }
    };
    let version = doc.get(list).and_then(|d| d.package_version());
    let objective = doc.create_child_with_id(list, ElementKind::Objective, id)?;
    doc.set_package_version(objective, version)?;
    doc.set_attribute(objective, "type", objective_type.into())?;
    Ok(objective)
}

/// Adds a flux objective weighting `reaction` under `objective`.
pub fn create_flux_objective(
    doc: &mut Document,
    objective: NodeId,
    reaction: &str,
    coefficient: f64,
) -> Result<NodeId, DocumentError> {
    let container_kind = ElementKind::ListOf(ListOfKind::FluxObjectives);
    let list = match doc.child_of_kind(objective, container_kind) {
        Some(list) => list,
        None => {
            let version = doc.get(objective).and_then(|d| d.package_version());
            let list = doc.create_child(objective, container_kind)?;
            doc.set_package_version(list, version)?;
            list
        }
    };
    let flux = doc.create_child(list, ElementKind::FluxObjective)?;
    doc.set_attribute(flux, "reaction", reaction.into())?;
    doc.set_attribute(flux, "coefficient", AttributeValue::Double(coefficient))?;
    Ok(flux)
}
