//! Element Kinds
//!
//! Closed enumerations describing what a node in the document tree *is*.
//! The tree itself is generic: every element is represented by the same
//! node payload, and `ElementKind` is the discriminant that validation,
//! serialization, and the extension packages dispatch on.

use serde::{Deserialize, Serialize};

/// The extension package an element kind belongs to.
///
/// `Core` elements are part of the base document schema; the remaining
/// variants identify the built-in extension packages. The set is closed on
/// purpose: every package the library supports is known at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PackageId {
    /// Hierarchical model composition (sub-model definitions).
    Comp,
    /// Flux-balance constraints (objectives over reactions).
    Fbc,
    /// Graphical layout (glyphs for model elements).
    Layout,
}

impl PackageId {
    /// The short name used as the package label in serialized documents.
    pub fn short_name(&self) -> &'static str {
        match self {
            PackageId::Comp => "comp",
            PackageId::Fbc => "fbc",
            PackageId::Layout => "layout",
        }
    }

    /// Whether a document using this package requires readers to understand it.
    pub fn default_required(&self) -> bool {
        matches!(self, PackageId::Comp | PackageId::Fbc)
    }

    /// All supported packages, in serialization order.
    pub fn all() -> [PackageId; 3] {
        [PackageId::Comp, PackageId::Fbc, PackageId::Layout]
    }
}

/// Kind discriminant for container (`ListOf`-equivalent) nodes.
///
/// A container holds an ordered, homogeneous sequence of children; the kind
/// pins down which child element it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListOfKind {
    Compartments,
    Species,
    Reactions,
    Reactants,
    Products,
    Parameters,
    UnitDefinitions,
    Units,
    // comp package
    ModelDefinitions,
    Submodels,
    // layout package
    Layouts,
    CompartmentGlyphs,
    SpeciesGlyphs,
    ReactionGlyphs,
    // fbc package
    Objectives,
    FluxObjectives,
}

impl ListOfKind {
    /// The element kind this container accepts as children.
    pub fn child_kind(&self) -> ElementKind {
        match self {
            ListOfKind::Compartments => ElementKind::Compartment,
            ListOfKind::Species => ElementKind::Species,
            ListOfKind::Reactions => ElementKind::Reaction,
            ListOfKind::Reactants | ListOfKind::Products => ElementKind::SpeciesReference,
            ListOfKind::Parameters => ElementKind::Parameter,
            ListOfKind::UnitDefinitions => ElementKind::UnitDefinition,
            ListOfKind::Units => ElementKind::Unit,
            ListOfKind::ModelDefinitions => ElementKind::ModelDefinition,
            ListOfKind::Submodels => ElementKind::Submodel,
            ListOfKind::Layouts => ElementKind::Layout,
            ListOfKind::CompartmentGlyphs => ElementKind::CompartmentGlyph,
            ListOfKind::SpeciesGlyphs => ElementKind::SpeciesGlyph,
            ListOfKind::ReactionGlyphs => ElementKind::ReactionGlyph,
            ListOfKind::Objectives => ElementKind::Objective,
            ListOfKind::FluxObjectives => ElementKind::FluxObjective,
        }
    }

    /// Container element name as it appears in serialized documents.
    pub fn name(&self) -> &'static str {
        match self {
            ListOfKind::Compartments => "listOfCompartments",
            ListOfKind::Species => "listOfSpecies",
            ListOfKind::Reactions => "listOfReactions",
            ListOfKind::Reactants => "listOfReactants",
            ListOfKind::Products => "listOfProducts",
            ListOfKind::Parameters => "listOfParameters",
            ListOfKind::UnitDefinitions => "listOfUnitDefinitions",
            ListOfKind::Units => "listOfUnits",
            ListOfKind::ModelDefinitions => "listOfModelDefinitions",
            ListOfKind::Submodels => "listOfSubmodels",
            ListOfKind::Layouts => "listOfLayouts",
            ListOfKind::CompartmentGlyphs => "listOfCompartmentGlyphs",
            ListOfKind::SpeciesGlyphs => "listOfSpeciesGlyphs",
            ListOfKind::ReactionGlyphs => "listOfReactionGlyphs",
            ListOfKind::Objectives => "listOfObjectives",
            ListOfKind::FluxObjectives => "listOfFluxObjectives",
        }
    }
}

/// What a node in the document tree represents.
///
/// Concrete per-element data classes are deliberately absent: every element
/// is a generic node carrying a typed attribute map, and `ElementKind` is
/// the only type-level distinction between, say, a species and a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    /// The tree root.
    Document,
    /// The main model; an identifier scope.
    Model,
    /// An ordered homogeneous container.
    ListOf(ListOfKind),
    Compartment,
    Species,
    Reaction,
    SpeciesReference,
    Parameter,
    UnitDefinition,
    Unit,
    // comp package
    /// An independently id-scoped sub-model (comp package).
    ModelDefinition,
    Submodel,
    // layout package
    Layout,
    CompartmentGlyph,
    SpeciesGlyph,
    ReactionGlyph,
    // fbc package
    Objective,
    FluxObjective,
}

impl ElementKind {
    /// Element name as it appears in serialized documents and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Document => "document",
            ElementKind::Model => "model",
            ElementKind::ListOf(kind) => kind.name(),
            ElementKind::Compartment => "compartment",
            ElementKind::Species => "species",
            ElementKind::Reaction => "reaction",
            ElementKind::SpeciesReference => "speciesReference",
            ElementKind::Parameter => "parameter",
            ElementKind::UnitDefinition => "unitDefinition",
            ElementKind::Unit => "unit",
            ElementKind::ModelDefinition => "modelDefinition",
            ElementKind::Submodel => "submodel",
            ElementKind::Layout => "layout",
            ElementKind::CompartmentGlyph => "compartmentGlyph",
            ElementKind::SpeciesGlyph => "speciesGlyph",
            ElementKind::ReactionGlyph => "reactionGlyph",
            ElementKind::Objective => "objective",
            ElementKind::FluxObjective => "fluxObjective",
        }
    }

    /// The package an element kind belongs to, or `None` for core elements.
    pub fn package(&self) -> Option<PackageId> {
        match self {
            ElementKind::ModelDefinition | ElementKind::Submodel => Some(PackageId::Comp),
            ElementKind::Layout
            | ElementKind::CompartmentGlyph
            | ElementKind::SpeciesGlyph
            | ElementKind::ReactionGlyph => Some(PackageId::Layout),
            ElementKind::Objective | ElementKind::FluxObjective => Some(PackageId::Fbc),
            ElementKind::ListOf(kind) => kind.child_kind().package(),
            _ => None,
        }
    }

    /// Whether this element opens its own SId scope for descendants.
    pub fn is_scope(&self) -> bool {
        matches!(self, ElementKind::Model | ElementKind::ModelDefinition)
    }
}
