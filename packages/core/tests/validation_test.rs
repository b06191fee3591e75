//! Validation Engine Tests
//!
//! Category gating, reference-resolution findings across packages, the
//! absent-versus-unparsable distinction, unimplemented-rule reporting, and
//! rule-cache correctness across documents sharing a (level, version).

#[cfg(test)]
mod validation_tests {
    use anyhow::Result;
    use biodoc_core::ext::layout;
    use biodoc_core::validator::codes;
    use biodoc_core::{
        AttributeValue, CheckCategory, Document, ElementKind, ListOfKind, NodeId, Severity,
        ValidationContext,
    };

    fn create_test_document() -> Result<(Document, NodeId)> {
        let mut doc = Document::new(3, 1)?;
        let model = doc.create_child_with_id(doc.root(), ElementKind::Model, "m")?;
        Ok((doc, model))
    }

    /// Scenario: a species glyph referencing a species id that does not
    /// exist, validated with only general and identifier checks enabled.
    #[test]
    fn test_dangling_glyph_reference_is_reported_in_general_category() -> Result<()> {
        let (mut doc, model) = create_test_document()?;
        let layout_node = layout::create_layout(&mut doc, model, "l1")?;
        layout::create_species_glyph(&mut doc, layout_node, "g1", "no_such_species")?;

        let mut ctx = ValidationContext::new();
        ctx.enable_category(CheckCategory::General, true);
        ctx.enable_category(CheckCategory::Identifier, true);

        let log = ctx.validate(&doc)?;
        assert!(log.has_code(codes::LAYOUT_20401));

        // Nothing from the disabled categories leaks in.
        for issue in log.issues() {
            assert!(matches!(
                issue.category,
                CheckCategory::General | CheckCategory::Identifier
            ));
        }
        assert!(!log.unchecked_codes().contains(&codes::CORE_10601));
        Ok(())
    }

    #[test]
    fn test_category_gating_silences_exactly_that_category() -> Result<()> {
        let (mut doc, model) = create_test_document()?;
        let compartments =
            doc.create_child(model, ElementKind::ListOf(ListOfKind::Compartments))?;
        // A compartment without a size triggers the modeling-practice rule.
        doc.create_child_with_id(compartments, ElementKind::Compartment, "c1")?;

        let mut ctx = ValidationContext::new();
        ctx.enable_all_categories();
        let log = ctx.validate(&doc)?;
        assert!(log.has_code(codes::CORE_80501));
        assert_eq!(log.count_in_category(CheckCategory::ModelingPractice), 1);

        ctx.enable_category(CheckCategory::ModelingPractice, false);
        let log = ctx.validate(&doc)?;
        assert!(!log.has_code(codes::CORE_80501));
        assert_eq!(log.count_in_category(CheckCategory::ModelingPractice), 0);
        Ok(())
    }

    #[test]
    fn test_absent_and_unparsable_attributes_are_distinct() -> Result<()> {
        let (mut doc, model) = create_test_document()?;
        let compartments =
            doc.create_child(model, ElementKind::ListOf(ListOfKind::Compartments))?;
        let c1 = doc.create_child_with_id(compartments, ElementKind::Compartment, "c1")?;

        let mut ctx = ValidationContext::new();
        ctx.enable_all_categories();

        // Absent: the recommendation fires, the unparsable rule does not.
        let log = ctx.validate(&doc)?;
        assert!(log.has_code(codes::CORE_80501));
        assert!(!log.has_code(codes::CORE_10501));

        // Present but unparsable (reader side-channel marker): the
        // recommendation is satisfied, the unparsable rule fires instead.
        doc.set_attribute(
            c1,
            "size",
            AttributeValue::Invalid {
                raw: "1.2e".to_string(),
            },
        )?;
        let log = ctx.validate(&doc)?;
        assert!(!log.has_code(codes::CORE_80501));
        assert!(log.has_code(codes::CORE_10501));

        // Properly valued: neither fires.
        doc.set_attribute(c1, "size", AttributeValue::Double(1.0))?;
        let log = ctx.validate(&doc)?;
        assert!(!log.has_code(codes::CORE_80501));
        assert!(!log.has_code(codes::CORE_10501));
        Ok(())
    }

    #[test]
    fn test_species_compartment_reference_must_resolve_to_a_compartment() -> Result<()> {
        let (mut doc, model) = create_test_document()?;
        let species_list = doc.create_child(model, ElementKind::ListOf(ListOfKind::Species))?;
        let s1 = doc.create_child_with_id(species_list, ElementKind::Species, "s1")?;
        doc.set_attribute(s1, "compartment", "missing".into())?;

        let mut ctx = ValidationContext::new();
        ctx.enable_category(CheckCategory::General, true);
        let log = ctx.validate(&doc)?;
        assert!(log.has_code(codes::CORE_20608));

        // Resolving to the wrong kind is still a failure.
        let params = doc.create_child(model, ElementKind::ListOf(ListOfKind::Parameters))?;
        doc.create_child_with_id(params, ElementKind::Parameter, "missing")?;
        let log = ctx.validate(&doc)?;
        assert!(log.has_code(codes::CORE_20608));

        // A real compartment satisfies it.
        let compartments =
            doc.create_child(model, ElementKind::ListOf(ListOfKind::Compartments))?;
        doc.create_child_with_id(compartments, ElementKind::Compartment, "missing")?;
        let log = ctx.validate(&doc)?;
        assert!(!log.has_code(codes::CORE_20608));
        Ok(())
    }

    #[test]
    fn test_metaid_reference_agreement() -> Result<()> {
        let (mut doc, model) = create_test_document()?;
        let species_list = doc.create_child(model, ElementKind::ListOf(ListOfKind::Species))?;
        let s1 = doc.create_child_with_id(species_list, ElementKind::Species, "s1")?;
        doc.set_meta_id(s1, Some("meta_s1"))?;
        let s2 = doc.create_child_with_id(species_list, ElementKind::Species, "s2")?;
        doc.set_meta_id(s2, Some("meta_s2"))?;

        let layout_node = layout::create_layout(&mut doc, model, "l1")?;
        let glyph = layout::create_species_glyph(&mut doc, layout_node, "g1", "s1")?;

        let mut ctx = ValidationContext::new();
        ctx.enable_category(CheckCategory::General, true);

        // Agreeing references pass.
        doc.set_attribute(glyph, "metaidRef", "meta_s1".into())?;
        let log = ctx.validate(&doc)?;
        assert!(!log.has_code(codes::LAYOUT_20402));

        // Both resolve, but to different nodes.
        doc.set_attribute(glyph, "metaidRef", "meta_s2".into())?;
        let log = ctx.validate(&doc)?;
        assert!(log.has_code(codes::LAYOUT_20402));

        // A dangling metaid reference fails on its own.
        doc.set_attribute(glyph, "metaidRef", "meta_nowhere".into())?;
        let log = ctx.validate(&doc)?;
        assert!(log.has_code(codes::LAYOUT_20402));
        Ok(())
    }

    #[test]
    fn test_findings_carry_location_severity_and_message() -> Result<()> {
        let (mut doc, model) = create_test_document()?;
        let compartments =
            doc.create_child(model, ElementKind::ListOf(ListOfKind::Compartments))?;
        doc.create_child_with_id(compartments, ElementKind::Compartment, "c1")?;

        let mut ctx = ValidationContext::new();
        ctx.enable_category(CheckCategory::ModelingPractice, true);
        let log = ctx.validate(&doc)?;

        let issue = log
            .issues()
            .iter()
            .find(|i| i.code == codes::CORE_80501)
            .expect("recommendation fires");
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.location.element, "compartment");
        assert_eq!(issue.location.id.as_deref(), Some("c1"));
        assert!(!issue.message.is_empty());
        Ok(())
    }

    #[test]
    fn test_shared_context_cache_matches_fresh_contexts() -> Result<()> {
        // Two structurally different documents with the same (level, version).
        let (mut first, model_a) = create_test_document()?;
        let compartments =
            first.create_child(model_a, ElementKind::ListOf(ListOfKind::Compartments))?;
        first.create_child_with_id(compartments, ElementKind::Compartment, "c1")?;

        let (mut second, model_b) = create_test_document()?;
        let species = second.create_child(model_b, ElementKind::ListOf(ListOfKind::Species))?;
        let s1 = second.create_child_with_id(species, ElementKind::Species, "s1")?;
        second.set_attribute(s1, "compartment", "nowhere".into())?;

        let mut shared = ValidationContext::new();
        shared.enable_all_categories();
        let shared_first = shared.validate(&first)?;
        let shared_second = shared.validate(&second)?;

        for (doc, shared_log) in [(&first, shared_first), (&second, shared_second)] {
            let mut fresh = ValidationContext::new();
            fresh.enable_all_categories();
            let fresh_log = fresh.validate(doc)?;

            let codes_shared: Vec<u32> = shared_log.issues().iter().map(|i| i.code).collect();
            let codes_fresh: Vec<u32> = fresh_log.issues().iter().map(|i| i.code).collect();
            assert_eq!(codes_shared, codes_fresh);
            assert_eq!(shared_log.unchecked_codes(), fresh_log.unchecked_codes());
        }
        Ok(())
    }

    #[test]
    fn test_unimplemented_rules_are_enumerated_not_passed() -> Result<()> {
        let (doc, _model) = create_test_document()?;
        let mut ctx = ValidationContext::new();
        ctx.enable_all_categories();

        let log = ctx.validate(&doc)?;
        for code in [codes::CORE_10201, codes::CORE_10601, codes::CORE_10801] {
            assert!(log.unchecked_codes().contains(&code));
            assert!(!log.has_code(code));
        }

        // With the owning categories disabled, the markers disappear too.
        let mut narrow = ValidationContext::new();
        narrow.enable_category(CheckCategory::General, true);
        let log = narrow.validate(&doc)?;
        assert!(!log.unchecked_codes().contains(&codes::CORE_10201));
        Ok(())
    }

    #[test]
    fn test_missing_model_is_a_finding_not_an_error() -> Result<()> {
        let doc = Document::new(3, 1)?;
        let mut ctx = ValidationContext::new();
        ctx.enable_category(CheckCategory::General, true);
        let log = ctx.validate(&doc)?;
        assert!(log.has_code(codes::CORE_20201));
        Ok(())
    }
}
