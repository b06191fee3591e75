//! Layout Package
//!
//! Graphical layout information for model elements. A model's layout
//! plugin owns a `listOfLayouts`; each layout holds glyph containers whose
//! glyphs point back at core elements by id (`compartment`, `species`,
//! `reaction` attributes), optionally doubled by a `metaidRef`.

use crate::document::{Document, DocumentError};
use crate::models::{ElementKind, ListOfKind, NodeId, PackageId, PluginData};

/// The model's `listOfLayouts` container, if present.
pub fn layouts_list(doc: &Document, model: NodeId) -> Option<NodeId> {
    match doc.plugin(model, PackageId::Layout)?.data() {
        PluginData::Layout(p) => p.list_of_layouts,
        _ => None,
    }
}

/// Creates a layout with the given id on `model`, creating the layout
/// plugin and its container on first use.
pub fn create_layout(doc: &mut Document, model: NodeId, id: &str) -> Result<NodeId, DocumentError> {
    doc.ensure_plugin(model, PackageId::Layout)?;
    let list = match layouts_list(doc, model) {
        Some(list) => list,
        None => {
            let list = doc.create_element(ElementKind::ListOf(ListOfKind::Layouts));
            doc.adopt_plugin_root(model, PackageId::Layout, list)?;
            list
        }
    };
    let version = doc.get(list).and_then(|d| d.package_version());
    let layout = doc.create_child_with_id(list, ElementKind::Layout, id)?;
    doc.set_package_version(layout, version)?;
    Ok(layout)
}

fn glyph_container(
    doc: &mut Document,
    layout: NodeId,
    kind: ListOfKind,
) -> Result<NodeId, DocumentError> {
    let container_kind = ElementKind::ListOf(kind);
    if let Some(existing) = doc.child_of_kind(layout, container_kind) {
        return Ok(existing);
    }
    let version = doc.get(layout).and_then(|d| d.package_version());
    let list = doc.create_child(layout, container_kind)?;
    // Containers inside a plugin inherit the package version of their
    // creating plugin, and keep it through round trips.
    doc.set_package_version(list, version)?;
    Ok(list)
}

fn create_glyph(
    doc: &mut Document,
    layout: NodeId,
    container: ListOfKind,
    kind: ElementKind,
    id: &str,
    reference_attribute: &str,
    reference: &str,
) -> Result<NodeId, DocumentError> {
    let list = glyph_container(doc, layout, container)?;
    let glyph = doc.create_child_with_id(list, kind, id)?;
    doc.set_attribute(glyph, reference_attribute, reference.into())?;
    Ok(glyph)
}

/// Creates a compartment glyph referencing a compartment id.
pub fn create_compartment_glyph(
    doc: &mut Document,
    layout: NodeId,
    id: &str,
    compartment: &str,
) -> Result<NodeId, DocumentError> {
    create_glyph(
        doc,
        layout,
        ListOfKind::CompartmentGlyphs,
        ElementKind::CompartmentGlyph,
        id,
        "compartment",
        compartment,
    )
}

/// Creates a species glyph referencing a species id.
pub fn create_species_glyph(
    doc: &mut Document,
    layout: NodeId,
    id: &str,
    species: &str,
) -> Result<NodeId, DocumentError> {
    create_glyph(
        doc,
        layout,
        ListOfKind::SpeciesGlyphs,
        ElementKind::SpeciesGlyph,
        id,
        "species",
        species,
    )
}

/// Creates a reaction glyph referencing a reaction id.
pub fn create_reaction_glyph(
    doc: &mut Document,
    layout: NodeId,
    id: &str,
    reaction: &str,
) -> Result<NodeId, DocumentError> {
    create_glyph(
        doc,
        layout,
        ListOfKind::ReactionGlyphs,
        ElementKind::ReactionGlyph,
        id,
        "reaction",
        reaction,
    )
}
