//! Document Lifecycle Tests
//!
//! End-to-end coverage of the identifier registry under the structural
//! operations: creation through parent factories, duplicate detection,
//! detach/re-attach, cloning, and cross-model metaid uniqueness.

#[cfg(test)]
mod document_lifecycle_tests {
    use anyhow::Result;
    use biodoc_core::{Document, DocumentError, ElementKind, ListOfKind, NodeId};

    /// Helper: a level-3 document with a model and the usual containers.
    fn create_test_document() -> Result<(Document, NodeId)> {
        let mut doc = Document::new(3, 1)?;
        let model = doc.create_child_with_id(doc.root(), ElementKind::Model, "m")?;
        Ok((doc, model))
    }

    fn species_list(doc: &mut Document, model: NodeId) -> Result<NodeId> {
        Ok(doc.create_child(model, ElementKind::ListOf(ListOfKind::Species))?)
    }

    #[test]
    fn test_second_compartment_with_same_id_is_rejected() -> Result<()> {
        let (mut doc, model) = create_test_document()?;
        let list = doc.create_child(model, ElementKind::ListOf(ListOfKind::Compartments))?;

        let first = doc.create_child_with_id(list, ElementKind::Compartment, "c1")?;
        let err = doc
            .create_child_with_id(list, ElementKind::Compartment, "c1")
            .unwrap_err();

        assert!(matches!(err, DocumentError::DuplicateId { .. }));
        // The model retains exactly one compartment, and the binding is intact.
        assert_eq!(doc.node(list)?.children().len(), 1);
        assert_eq!(doc.resolve_id(model, "c1"), Some(first));
        Ok(())
    }

    #[test]
    fn test_registry_and_tree_stay_consistent_through_mutations() -> Result<()> {
        let (mut doc, model) = create_test_document()?;
        let list = species_list(&mut doc, model)?;
        let s1 = doc.create_child_with_id(list, ElementKind::Species, "s1")?;
        let s2 = doc.create_child_with_id(list, ElementKind::Species, "s2")?;

        // Every attached node with an id resolves to itself.
        for (id, node) in [("s1", s1), ("s2", s2)] {
            assert_eq!(doc.resolve_id(model, id), Some(node));
        }

        // Detached nodes resolve nowhere.
        doc.detach(s2)?;
        assert_eq!(doc.resolve_id(model, "s2"), None);
        assert_eq!(doc.resolve_id(model, "s1"), Some(s1));

        // Re-attachment restores the binding at the same scope.
        doc.attach(list, s2, Some(0))?;
        assert_eq!(doc.resolve_id(model, "s2"), Some(s2));
        assert_eq!(doc.node(list)?.children(), &[s2, s1]);
        Ok(())
    }

    #[test]
    fn test_clone_isolation() -> Result<()> {
        let (mut doc, model) = create_test_document()?;
        let list = species_list(&mut doc, model)?;
        let original = doc.create_child_with_id(list, ElementKind::Species, "s1")?;

        let copy = doc.clone_subtree(original)?;
        assert!(doc.node(copy)?.parent().is_none());

        // Mutating the clone never affects the original's bindings.
        doc.set_id(copy, Some("s2"))?;
        assert_eq!(doc.resolve_id(model, "s1"), Some(original));
        assert_eq!(doc.resolve_id(model, "s2"), None);

        // Attaching a clone that collides fails and corrupts neither tree.
        doc.set_id(copy, Some("s1"))?;
        let err = doc.attach(list, copy, None).unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateId { .. }));
        assert_eq!(doc.resolve_id(model, "s1"), Some(original));
        assert!(!doc.is_attached(copy));
        assert_eq!(doc.node(list)?.children().len(), 1);
        Ok(())
    }

    #[test]
    fn test_metaid_scope_is_document_global_across_models() -> Result<()> {
        let (mut doc, model) = create_test_document()?;
        let reactions = doc.create_child(model, ElementKind::ListOf(ListOfKind::Reactions))?;
        let reaction = doc.create_child_with_id(reactions, ElementKind::Reaction, "r")?;
        let reactants = doc.create_child(reaction, ElementKind::ListOf(ListOfKind::Reactants))?;
        let reactant = doc.create_child(reactants, ElementKind::SpeciesReference)?;
        doc.set_meta_id(reactant, Some("r1"))?;

        // Clone the reaction; give the clone a fresh id but keep its
        // reactant's metaid.
        let copy = doc.clone_subtree(reaction)?;
        doc.set_id(copy, Some("r_copy"))?;

        // A second model scope does not help: metaids are document-global.
        let definition = biodoc_core::ext::comp::create_model_definition(&mut doc, "other")?;
        let other_reactions =
            doc.create_child(definition, ElementKind::ListOf(ListOfKind::Reactions))?;
        let err = doc.attach(other_reactions, copy, None).unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateMetaId { .. }));

        // Removing the original first makes the attachment legal.
        doc.remove_subtree(reaction)?;
        doc.attach(other_reactions, copy, None)?;
        let resolved = doc.resolve_meta_id("r1").expect("clone's reactant");
        assert!(doc.is_attached(resolved));
        assert_eq!(doc.node(resolved)?.kind(), ElementKind::SpeciesReference);
        Ok(())
    }

    #[test]
    fn test_remove_subtree_frees_handles_and_bindings() -> Result<()> {
        let (mut doc, model) = create_test_document()?;
        let list = species_list(&mut doc, model)?;
        let species = doc.create_child_with_id(list, ElementKind::Species, "s1")?;
        doc.set_meta_id(species, Some("meta_s1"))?;
        let count_before = doc.node_count();

        doc.remove_subtree(list)?;
        assert_eq!(doc.resolve_id(model, "s1"), None);
        assert_eq!(doc.resolve_meta_id("meta_s1"), None);
        assert!(doc.get(species).is_none());
        assert!(doc.get(list).is_none());
        assert_eq!(doc.node_count(), count_before - 2);
        Ok(())
    }
}
