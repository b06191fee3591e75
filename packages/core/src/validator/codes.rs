//! Error Codes
//!
//! Stable numeric identifiers for validation rules. Codes live in
//! package-specific bands: the core band below one million, and one
//! disjoint band per extension package at `offset + code`.

use crate::models::PackageId;

/// Band offset of a package's error codes.
pub fn package_offset(package: PackageId) -> u32 {
    match package {
        PackageId::Comp => 1_000_000,
        PackageId::Fbc => 2_000_000,
        PackageId::Layout => 6_000_000,
    }
}

/// The package a code belongs to, or `None` for the core band.
pub fn package_of(code: u32) -> Option<PackageId> {
    match code / 1_000_000 {
        0 => None,
        1 => Some(PackageId::Comp),
        2 => Some(PackageId::Fbc),
        6 => Some(PackageId::Layout),
        _ => None,
    }
}

// -- core band ---------------------------------------------------------------

/// Mathematical expressions must use permitted operators only.
pub const CORE_10201: u32 = 10201;
/// Mathematical expressions must reference resolvable symbols.
pub const CORE_10202: u32 = 10202;
/// An id must conform to the SId syntax.
pub const CORE_10301: u32 = 10301;
/// A metaid must conform to the XML name syntax.
pub const CORE_10302: u32 = 10302;
/// Within one scope every id must be unique.
pub const CORE_10303: u32 = 10303;
/// Metaids must be unique across the whole document.
pub const CORE_10304: u32 = 10304;
/// A compartment size must be a readable number when present.
pub const CORE_10501: u32 = 10501;
/// A species initialAmount must be a readable number when present.
pub const CORE_10502: u32 = 10502;
/// Unit references must resolve to unit definitions.
pub const CORE_10601: u32 = 10601;
/// Derived units of expressions must be consistent.
pub const CORE_10602: u32 = 10602;
/// An sboTerm must be a valid ontology term number.
pub const CORE_10701: u32 = 10701;
/// The equation system must not be overdetermined.
pub const CORE_10801: u32 = 10801;
/// The (level, version) combination must be valid.
pub const CORE_20101: u32 = 20101;
/// A document should contain a model.
pub const CORE_20201: u32 = 20201;
/// A model may contain each container kind at most once.
pub const CORE_20202: u32 = 20202;
/// A species' compartment attribute must reference a compartment.
pub const CORE_20608: u32 = 20608;
/// It is recommended to set a compartment's size.
pub const CORE_80501: u32 = 80501;

// -- comp band ---------------------------------------------------------------

/// A submodel's modelRef must reference a model or model definition.
pub const COMP_20101: u32 = 1_020_101;
/// A submodel must not instantiate its own containing model.
pub const COMP_20102: u32 = 1_020_102;

// -- fbc band ----------------------------------------------------------------

/// An objective's type must be "maximize" or "minimize".
pub const FBC_20408: u32 = 2_020_408;
/// A flux objective's reaction must reference a reaction.
pub const FBC_20604: u32 = 2_020_604;
/// A flux objective's coefficient must be a readable number when present.
pub const FBC_20605: u32 = 2_020_605;

// -- layout band -------------------------------------------------------------

/// A compartment glyph's compartment must reference a compartment.
pub const LAYOUT_20301: u32 = 6_020_301;
/// A species glyph's species must reference a species.
pub const LAYOUT_20401: u32 = 6_020_401;
/// A species glyph's metaidRef must resolve, and agree with its species
/// reference when both are set.
pub const LAYOUT_20402: u32 = 6_020_402;
/// A reaction glyph's reaction must reference a reaction.
pub const LAYOUT_20501: u32 = 6_020_501;

/// Human-readable message for a code.
pub fn message(code: u32) -> &'static str {
    match code {
        CORE_10201 => "Mathematical expression uses an operator outside the permitted subset.",
        CORE_10202 => "Mathematical expression references a symbol that does not resolve.",
        CORE_10301 => "The id does not conform to the identifier syntax.",
        CORE_10302 => "The metaid does not conform to the XML name syntax.",
        CORE_10303 => "Duplicate id within one identifier scope.",
        CORE_10304 => "Duplicate metaid within the document.",
        CORE_10501 => "The compartment 'size' attribute could not be read as a number.",
        CORE_10502 => "The species 'initialAmount' attribute could not be read as a number.",
        CORE_10601 => "A unit reference does not resolve to a unit definition.",
        CORE_10602 => "The derived units of an expression are inconsistent.",
        CORE_10701 => "The sboTerm is not a valid ontology term number.",
        CORE_10801 => "The model's equation system is overdetermined.",
        CORE_20101 => "Invalid document level/version combination.",
        CORE_20201 => "The document does not contain a model.",
        CORE_20202 => "The model contains a container kind more than once.",
        CORE_20608 => "The species 'compartment' attribute does not reference a compartment.",
        CORE_80501 => "It is recommended to set the compartment 'size' attribute.",
        COMP_20101 => "The submodel 'modelRef' does not reference a model or model definition.",
        COMP_20102 => "A submodel must not instantiate its own containing model.",
        FBC_20408 => "The objective 'type' must be \"maximize\" or \"minimize\".",
        FBC_20604 => "The flux objective 'reaction' does not reference a reaction.",
        FBC_20605 => "The flux objective 'coefficient' could not be read as a number.",
        LAYOUT_20301 => "The compartment glyph 'compartment' does not reference a compartment.",
        LAYOUT_20401 => "The species glyph 'species' does not reference a species.",
        LAYOUT_20402 => "The species glyph 'metaidRef' does not resolve consistently.",
        LAYOUT_20501 => "The reaction glyph 'reaction' does not reference a reaction.",
        _ => "Unknown validation rule.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_disjoint_per_package() {
        assert_eq!(package_of(CORE_20608), None);
        assert_eq!(package_of(COMP_20101), Some(PackageId::Comp));
        assert_eq!(package_of(FBC_20604), Some(PackageId::Fbc));
        assert_eq!(package_of(LAYOUT_20401), Some(PackageId::Layout));
    }

    #[test]
    fn package_codes_sit_at_their_offset() {
        assert_eq!(COMP_20101, package_offset(PackageId::Comp) + 20101);
        assert_eq!(FBC_20604, package_offset(PackageId::Fbc) + 20604);
        assert_eq!(LAYOUT_20401, package_offset(PackageId::Layout) + 20401);
    }
}
