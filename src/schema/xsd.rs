//! Feature class extraction from GML application schemas (XSD)
//!
//! Every top-level `element` whose type derives, through any chain of
//! `complexContent` extensions or restrictions, from `gml:AbstractFeatureType`
//! becomes a feature class. Fields are collected from the most ancestral type
//! downward. Only as much of XML Schema is understood as is needed to recover
//! that shape; anything else is skipped and reported through [`XsdExtractor::issues`].

use roxmltree::{Document, Node, ParsingOptions};
use tracing::{debug, warn};

use super::config::SchemaConfig;
use super::dom::{find_descendants, find_first, find_first_with_attribute, strip_ns};
use super::error::GmlSchemaError;
use super::types::{
    ABSTRACT_FEATURE_TYPE, FeatureClass, FieldDefinition, FieldType, GEOMETRY_ALIASES,
    GEOMETRY_TYPES, GmlSchema,
};

/// Extracts feature classes from a schema document tree
#[derive(Debug, Default)]
pub struct XsdExtractor {
    config: SchemaConfig,
    /// Elements and fields skipped during the last extraction
    issues: Vec<GmlSchemaError>,
}

impl XsdExtractor {
    /// Create an extractor with default configuration
    pub fn new() -> Self {
        Self::with_config(SchemaConfig::default())
    }

    /// Create an extractor with custom configuration
    pub fn with_config(config: SchemaConfig) -> Self {
        Self {
            config,
            issues: Vec::new(),
        }
    }

    /// Non-fatal resolution problems from the last extraction
    pub fn issues(&self) -> &[GmlSchemaError] {
        &self.issues
    }

    /// Parse schema text and extract its feature classes
    ///
    /// The text must be namespace-well-formed: every prefix used on an element
    /// or attribute name has to be declared, otherwise the document is rejected
    /// as [`GmlSchemaError::SchemaMalformed`]. Prefixes that only appear inside
    /// attribute values (`base="gml:AbstractFeatureType"`) need no declaration.
    pub fn parse(&mut self, xsd_content: &str) -> Result<GmlSchema, GmlSchemaError> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = Document::parse_with_options(xsd_content, options)?;
        let root = doc.root_element();
        if root.tag_name().name() != "schema" {
            return Err(GmlSchemaError::SchemaMalformed(format!(
                "expected root element 'schema', found '{}'",
                root.tag_name().name()
            )));
        }
        Ok(self.extract_feature_classes(root))
    }

    /// Extract feature classes from the root `schema` element
    pub fn extract_feature_classes(&mut self, root: Node<'_, '_>) -> GmlSchema {
        self.issues.clear();
        let mut schema = GmlSchema::new();

        for element in find_descendants(root, "element") {
            let name = element.attribute("name").unwrap_or_default();
            let type_name = strip_ns(element.attribute("type").unwrap_or_default());
            if name.is_empty() || type_name.is_empty() {
                continue;
            }

            let base = match self.gml_base_type(root, type_name) {
                Ok(base) => base,
                Err(e) => {
                    debug!("Skipping element {}: {}", name, e);
                    self.issues.push(e);
                    continue;
                }
            };
            if base != ABSTRACT_FEATURE_TYPE {
                debug!("Element {} derives from gml:{}, not a feature", name, base);
                continue;
            }

            let mut feature_class = FeatureClass::new(name, "");
            if let Err(e) = self.extract_fields(root, type_name, &mut feature_class, 0) {
                warn!("Incomplete feature type {}: {}", name, e);
                self.issues.push(e);
            }
            debug!(
                feature = name,
                fields = feature_class.fields.len(),
                geometries = feature_class.geometry_attributes.len(),
                "Feature type extracted"
            );
            schema.insert(feature_class);
        }

        schema
    }

    /// Follow the derivation chain of `type_name` to its first GML base type
    /// and return that type's local name.
    fn gml_base_type(&self, root: Node<'_, '_>, type_name: &str) -> Result<String, GmlSchemaError> {
        let mut visited: Vec<String> = Vec::new();
        let mut current = type_name.to_string();

        loop {
            if visited.contains(&current) {
                return Err(GmlSchemaError::unresolved(type_name, format!("derivation cycle through {}", current)));
            }
            if visited.len() >= self.config.max_type_depth {
                return Err(GmlSchemaError::unresolved(
                    type_name,
                    format!("derivation chain longer than {}", self.config.max_type_depth),
                ));
            }

            let base = self
                .derivation(root, &current)?
                .attribute("base")
                .unwrap_or_default();
            if self.config.has_gml_prefix(base) {
                return Ok(strip_ns(base).to_string());
            }
            visited.push(current);
            current = strip_ns(base).to_string();
        }
    }

    /// The `complexContent` extension or restriction of a named complex type
    fn derivation<'a, 'input>(
        &self,
        root: Node<'a, 'input>,
        type_name: &str,
    ) -> Result<Node<'a, 'input>, GmlSchemaError> {
        let complex_type = find_first_with_attribute(root, "complexType", "name", type_name)
            .ok_or_else(|| GmlSchemaError::unresolved(type_name, "complexType not found"))?;
        find_first(complex_type, "complexContent.extension")
            .or_else(|| find_first(complex_type, "complexContent.restriction"))
            .ok_or_else(|| {
                GmlSchemaError::unresolved(type_name, "no complexContent extension or restriction")
            })
    }

    fn is_abstract_feature(&self, base: &str) -> bool {
        self.config.has_gml_prefix(base) && strip_ns(base) == ABSTRACT_FEATURE_TYPE
    }

    /// Add the fields of `type_name` and its ancestors, ancestors first
    fn extract_fields(
        &mut self,
        root: Node<'_, '_>,
        type_name: &str,
        feature_class: &mut FeatureClass,
        depth: usize,
    ) -> Result<(), GmlSchemaError> {
        if depth >= self.config.max_type_depth {
            return Err(GmlSchemaError::unresolved(
                type_name,
                format!("derivation chain longer than {}", self.config.max_type_depth),
            ));
        }

        let derivation = self.derivation(root, type_name)?;
        let base = derivation.attribute("base").unwrap_or_default();
        if !self.is_abstract_feature(base) {
            self.extract_fields(root, strip_ns(base), feature_class, depth + 1)?;
        }

        for element in find_descendants(derivation, "sequence.element") {
            self.add_sequence_element(type_name, element, feature_class);
        }
        Ok(())
    }

    fn add_sequence_element(&mut self, type_name: &str, element: Node<'_, '_>, feature_class: &mut FeatureClass) {
        let field_name = element.attribute("name").unwrap_or_default();

        if let Some(reference) = element.attribute("ref").filter(|r| !r.is_empty()) {
            let alias = strip_ns(reference);
            if self.config.has_gml_prefix(reference) && GEOMETRY_ALIASES.contains(&alias) {
                feature_class.add_geometry_attribute(alias);
            } else if self.config.has_gml_prefix(reference) {
                debug!("Unknown referenced GML element: {}", reference);
                self.issues
                    .push(GmlSchemaError::unresolved(type_name, format!("unknown GML element {}", reference)));
            } else {
                debug!("Field in {} references {}, not supported", type_name, reference);
                self.issues
                    .push(GmlSchemaError::unresolved(type_name, format!("unsupported reference {}", reference)));
            }
            return;
        }

        if field_name.is_empty() {
            self.issues
                .push(GmlSchemaError::unresolved(type_name, "field without name"));
            return;
        }

        let mut field_type_name = strip_ns(element.attribute("type").unwrap_or_default());
        if field_type_name.is_empty() {
            field_type_name = find_first(element, "simpleType.restriction")
                .and_then(|restriction| restriction.attribute("base"))
                .map(strip_ns)
                .unwrap_or_default();
        }

        if field_type_name.is_empty() {
            debug!("Cannot get {}.{} field type", type_name, field_name);
            self.issues.push(GmlSchemaError::unresolved(
                type_name,
                format!("no type for field {}", field_name),
            ));
        } else if is_geometry_property_type(field_type_name) {
            feature_class.add_geometry_attribute(field_name);
            return;
        }

        if feature_class.field_index(field_name).is_some() {
            debug!("Field {}.{} already declared by a base type", type_name, field_name);
            return;
        }
        feature_class.push_field(
            FieldDefinition::new(field_name, FieldType::of_xsd_type(field_type_name))
                .with_type_name(field_type_name),
        );
    }
}

/// `PointPropertyType`, `MultiPolygonPropertyType`, ...
fn is_geometry_property_type(type_name: &str) -> bool {
    type_name
        .strip_suffix("PropertyType")
        .is_some_and(|kind| GEOMETRY_TYPES.contains(&kind))
}

/// Parse an XSD document and extract its feature classes with default configuration
pub fn parse_xsd(xsd_content: &str) -> Result<GmlSchema, GmlSchemaError> {
    XsdExtractor::new().parse(xsd_content)
}
