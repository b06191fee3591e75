//! Structural JSON Form
//!
//! A faithful, deterministic JSON rendering of a document: same traversal
//! order as the external form, empty containers skipped, enabled-package
//! namespaces emitted independent of plugin presence, package versions and
//! unparsable-attribute markers preserved. Writing, reading back, and
//! writing again yields byte-identical output.

use serde_json::{json, Map, Value};

use crate::document::{Document, DocumentError};
use crate::ext;
use crate::io::{DocumentReader, DocumentWriter};
use crate::models::{
    AttributeValue, ElementKind, ListOfKind, NodeId, PackageId, Plugin, PluginData,
};

/// Writer for the structural JSON form.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonWriter {
    /// Emit containers even when they are logically empty.
    pub emit_empty_containers: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        JsonWriter::default()
    }

    /// Renders the document as a JSON value (object keys are sorted, so
    /// the rendering is deterministic).
    pub fn to_value(&self, doc: &Document) -> Value {
        let packages: Vec<Value> = doc
            .enabled_packages()
            .map(|(package, state)| {
                json!({
                    "package": package.short_name(),
                    "namespace": state.namespace,
                    "required": state.required,
                })
            })
            .collect();
        json!({
            "level": doc.level(),
            "version": doc.version(),
            "packages": packages,
            "document": self.node_to_value(doc, doc.root()),
        })
    }

    fn node_to_value(&self, doc: &Document, node: NodeId) -> Value {
        let data = match doc.get(node) {
            Some(data) => data,
            None => return Value::Null,
        };
        let mut out = Map::new();
        out.insert("element".to_string(), json!(data.kind().name()));
        if let Some(id) = data.id() {
            out.insert("id".to_string(), json!(id));
        }
        if let Some(meta_id) = data.meta_id() {
            out.insert("metaid".to_string(), json!(meta_id));
        }
        if let Some(term) = data.sbo_term() {
            out.insert("sboTerm".to_string(), json!(term));
        }
        if let Some(notes) = data.notes() {
            out.insert("notes".to_string(), json!(notes));
        }
        if let Some(annotation) = data.annotation() {
            out.insert("annotation".to_string(), annotation.clone());
        }
        if let Some(version) = data.package_version() {
            out.insert("packageVersion".to_string(), json!(version));
        }
        if !data.attributes().is_empty() {
            let attrs: Map<String, Value> = data
                .attributes()
                .iter()
                .map(|(name, value)| {
                    // Non-finite doubles have no JSON number form; demote
                    // them to the invalid marker with their lexical text.
                    let rendered = serde_json::to_value(value).unwrap_or_else(|_| {
                        json!({"type": "invalid", "value": {"raw": value.lexical()}})
                    });
                    (name.clone(), rendered)
                })
                .collect();
            out.insert("attributes".to_string(), Value::Object(attrs));
        }
        let plugins: Vec<Value> = data
            .plugins()
            .values()
            .map(|plugin| self.plugin_to_value(doc, plugin))
            .collect();
        if !plugins.is_empty() {
            out.insert("plugins".to_string(), Value::Array(plugins));
        }
        let children: Vec<Value> = data
            .children()
            .iter()
            .filter(|child| self.emit_empty_containers || !self.is_empty_container(doc, **child))
            .map(|child| self.node_to_value(doc, *child))
            .collect();
        if !children.is_empty() {
            out.insert("children".to_string(), Value::Array(children));
        }
        Value::Object(out)
    }

    fn plugin_to_value(&self, doc: &Document, plugin: &Plugin) -> Value {
        let mut out = Map::new();
        out.insert(
            "package".to_string(),
            json!(plugin.package().short_name()),
        );
        out.insert("namespace".to_string(), json!(plugin.namespace()));
        out.insert(
            "packageVersion".to_string(),
            json!(plugin.package_version()),
        );
        if let PluginData::Fbc(fbc) = plugin.data() {
            if let Some(strict) = fbc.strict {
                out.insert("strict".to_string(), json!(strict));
            }
        }
        let roots: Vec<Value> = plugin
            .roots()
            .into_iter()
            .filter(|root| self.emit_empty_containers || !self.is_empty_container(doc, *root))
            .map(|root| self.node_to_value(doc, root))
            .collect();
        if !roots.is_empty() {
            out.insert("roots".to_string(), Value::Array(roots));
        }
        Value::Object(out)
    }

    /// A container is logically empty when it has no children and carries
    /// nothing of its own worth serializing.
    fn is_empty_container(&self, doc: &Document, node: NodeId) -> bool {
        let Some(data) = doc.get(node) else {
            return true;
        };
        matches!(data.kind(), ElementKind::ListOf(_))
            && data.children().is_empty()
            && data.plugins().is_empty()
            && data.id().is_none()
            && data.meta_id().is_none()
            && data.attributes().is_empty()
    }
}

impl DocumentWriter for JsonWriter {
    fn write(&self, doc: &Document) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(&self.to_value(doc))
            .map_err(|e| DocumentError::Parse(e.to_string()))
    }
}

/// Reader for the structural JSON form.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReader;

impl JsonReader {
    pub fn new() -> Self {
        JsonReader
    }

    /// Rebuilds a document from its JSON value form, going through the
    /// same public operations application code uses.
    pub fn from_value(&self, value: &Value) -> Result<Document, DocumentError> {
        let level = require_u32(value, "level")?;
        let version = require_u32(value, "version")?;
        let mut doc = Document::new(level, version)?;

        if let Some(packages) = value.get("packages").and_then(Value::as_array) {
            for entry in packages {
                let short_name = require_str(entry, "package")?;
                let package = package_from_name(short_name)
                    .ok_or_else(|| parse_error(format!("unknown package \"{short_name}\"")))?;
                let namespace = require_str(entry, "namespace")?;
                let expected = ext::namespace_uri(package, level, version).ok_or(
                    DocumentError::PackageUnavailable {
                        package: package.short_name(),
                        level,
                        version,
                    },
                )?;
                if namespace != expected {
                    return Err(DocumentError::PackageNamespaceMismatch {
                        package: package.short_name(),
                        namespace: namespace.to_string(),
                        expected: expected.to_string(),
                    });
                }
                doc.enable_package(package)?;
                if let Some(required) = entry.get("required").and_then(Value::as_bool) {
                    doc.set_package_required(package, required)?;
                }
            }
        }

        let root_value = value
            .get("document")
            .ok_or_else(|| parse_error("missing \"document\""))?;
        let root = doc.root();
        self.apply_node_fields(&mut doc, root, root_value)?;
        self.read_plugins(&mut doc, root, root_value)?;
        self.read_children(&mut doc, root, root_value)?;
        Ok(doc)
    }

    /// Builds the subtree described by `value` as an orphan.
    fn build_node(&self, doc: &mut Document, value: &Value) -> Result<NodeId, DocumentError> {
        let name = require_str(value, "element")?;
        let kind = element_kind_from_name(name)
            .ok_or_else(|| parse_error(format!("unknown element \"{name}\"")))?;
        let node = doc.create_element(kind);
        self.apply_node_fields(doc, node, value)?;
        self.read_plugins(doc, node, value)?;
        self.read_children(doc, node, value)?;
        Ok(node)
    }

    fn apply_node_fields(
        &self,
        doc: &mut Document,
        node: NodeId,
        value: &Value,
    ) -> Result<(), DocumentError> {
        if let Some(id) = value.get("id").and_then(Value::as_str) {
            doc.set_id(node, Some(id))?;
        }
        if let Some(meta_id) = value.get("metaid").and_then(Value::as_str) {
            doc.set_meta_id(node, Some(meta_id))?;
        }
        if let Some(term) = value.get("sboTerm").and_then(Value::as_u64) {
            doc.set_sbo_term(node, Some(term as u32))?;
        }
        if let Some(notes) = value.get("notes").and_then(Value::as_str) {
            doc.set_notes(node, Some(notes))?;
        }
        if let Some(annotation) = value.get("annotation") {
            doc.set_annotation(node, Some(annotation.clone()))?;
        }
        if let Some(version) = value.get("packageVersion").and_then(Value::as_u64) {
            doc.set_package_version(node, Some(version as u32))?;
        }
        if let Some(attrs) = value.get("attributes").and_then(Value::as_object) {
            for (name, attr_value) in attrs {
                let parsed: AttributeValue = serde_json::from_value(attr_value.clone())
                    .map_err(|e| parse_error(format!("attribute \"{name}\": {e}")))?;
                doc.set_attribute(node, name, parsed)?;
            }
        }
        Ok(())
    }

    fn read_children(
        &self,
        doc: &mut Document,
        parent: NodeId,
        value: &Value,
    ) -> Result<(), DocumentError> {
        let Some(children) = value.get("children").and_then(Value::as_array) else {
            return Ok(());
        };
        for child_value in children {
            let child = self.build_node(doc, child_value)?;
            doc.attach(parent, child, None)?;
        }
        Ok(())
    }

    fn read_plugins(
        &self,
        doc: &mut Document,
        host: NodeId,
        value: &Value,
    ) -> Result<(), DocumentError> {
        let Some(plugins) = value.get("plugins").and_then(Value::as_array) else {
            return Ok(());
        };
        for plugin_value in plugins {
            let short_name = require_str(plugin_value, "package")?;
            let package = package_from_name(short_name)
                .ok_or_else(|| parse_error(format!("unknown package \"{short_name}\"")))?;
            let namespace = require_str(plugin_value, "namespace")?;
            let package_version = plugin_value
                .get("packageVersion")
                .and_then(Value::as_u64)
                .map(|v| v as u32)
                .unwrap_or_else(|| ext::default_package_version(package));

            let mut plugin = Plugin::new(package, namespace, package_version);
            if let PluginData::Fbc(fbc) = &mut plugin.data {
                fbc.strict = plugin_value.get("strict").and_then(Value::as_bool);
            }
            if let Some(roots) = plugin_value.get("roots").and_then(Value::as_array) {
                for root_value in roots {
                    let root = self.build_node(doc, root_value)?;
                    let kind = doc.node(root)?.kind();
                    plugin
                        .data
                        .adopt_root(kind, root)
                        .map_err(|reason| parse_error(reason.to_string()))?;
                }
            }
            doc.add_extension(host, namespace, plugin)?;
        }
        Ok(())
    }
}

impl DocumentReader for JsonReader {
    fn read(&self, source: &str) -> Result<Document, DocumentError> {
        let value: Value =
            serde_json::from_str(source).map_err(|e| DocumentError::Parse(e.to_string()))?;
        self.from_value(&value)
    }
}

fn parse_error(message: impl Into<String>) -> DocumentError {
    DocumentError::Parse(message.into())
}

fn require_u32(value: &Value, field: &str) -> Result<u32, DocumentError> {
    value
        .get(field)
        .and_then(Value::as_u64)
        .map(|v| v as u32)
        .ok_or_else(|| parse_error(format!("missing numeric \"{field}\"")))
}

fn require_str<'a>(value: &'a Value, field: &str) -> Result<&'a str, DocumentError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| parse_error(format!("missing string \"{field}\"")))
}

fn package_from_name(name: &str) -> Option<PackageId> {
    PackageId::all()
        .into_iter()
        .find(|p| p.short_name() == name)
}

fn element_kind_from_name(name: &str) -> Option<ElementKind> {
    let kind = match name {
        "document" => ElementKind::Document,
        "model" => ElementKind::Model,
        "compartment" => ElementKind::Compartment,
        "species" => ElementKind::Species,
        "reaction" => ElementKind::Reaction,
        "speciesReference" => ElementKind::SpeciesReference,
        "parameter" => ElementKind::Parameter,
        "unitDefinition" => ElementKind::UnitDefinition,
        "unit" => ElementKind::Unit,
        "modelDefinition" => ElementKind::ModelDefinition,
        "submodel" => ElementKind::Submodel,
        "layout" => ElementKind::Layout,
        "compartmentGlyph" => ElementKind::CompartmentGlyph,
        "speciesGlyph" => ElementKind::SpeciesGlyph,
        "reactionGlyph" => ElementKind::ReactionGlyph,
        "objective" => ElementKind::Objective,
        "fluxObjective" => ElementKind::FluxObjective,
        "listOfCompartments" => ElementKind::ListOf(ListOfKind::Compartments),
        "listOfSpecies" => ElementKind::ListOf(ListOfKind::Species),
        "listOfReactions" => ElementKind::ListOf(ListOfKind::Reactions),
        "listOfReactants" => ElementKind::ListOf(ListOfKind::Reactants),
        "listOfProducts" => ElementKind::ListOf(ListOfKind::Products),
        "listOfParameters" => ElementKind::ListOf(ListOfKind::Parameters),
        "listOfUnitDefinitions" => ElementKind::ListOf(ListOfKind::UnitDefinitions),
        "listOfUnits" => ElementKind::ListOf(ListOfKind::Units),
        "listOfModelDefinitions" => ElementKind::ListOf(ListOfKind::ModelDefinitions),
        "listOfSubmodels" => ElementKind::ListOf(ListOfKind::Submodels),
        "listOfLayouts" => ElementKind::ListOf(ListOfKind::Layouts),
        "listOfCompartmentGlyphs" => ElementKind::ListOf(ListOfKind::CompartmentGlyphs),
        "listOfSpeciesGlyphs" => ElementKind::ListOf(ListOfKind::SpeciesGlyphs),
        "listOfReactionGlyphs" => ElementKind::ListOf(ListOfKind::ReactionGlyphs),
        "listOfObjectives" => ElementKind::ListOf(ListOfKind::Objectives),
        "listOfFluxObjectives" => ElementKind::ListOf(ListOfKind::FluxObjectives),
        _ => return None,
    };
    Some(kind)
}
