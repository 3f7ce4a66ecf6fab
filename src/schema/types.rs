//! Feature class and field model shared by both inference pipelines

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

/// Geometry kinds recognized as GML geometry elements and `*PropertyType` types
pub const GEOMETRY_TYPES: [&str; 6] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
];

/// GML geometry property elements that may be referenced from a feature type
pub const GEOMETRY_ALIASES: [&str; 14] = [
    "location",
    "centerOf",
    "position",
    "extentOf",
    "coverage",
    "edgeOf",
    "centerLineOf",
    "multiLocation",
    "multiCenterOf",
    "multiPosition",
    "multiCenterLineOf",
    "multiEdgeOf",
    "multiCoverage",
    "multiExtentOf",
];

/// Local name of the abstract GML feature base type
pub const ABSTRACT_FEATURE_TYPE: &str = "AbstractFeatureType";

/// Inferred scalar type of a field.
///
/// Variants are ordered from most to least specific, so widening two
/// observations is simply their maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    /// 32-bit signed integer
    Integer,
    /// Floating point number
    Double,
    /// Anything else
    String,
}

impl FieldType {
    /// Type a textual value: integer if it parses as one, then double, else string.
    ///
    /// Surrounding whitespace is ignored; empty text is a string.
    pub fn of_value(value: &str) -> FieldType {
        let value = value.trim();
        if value.parse::<i32>().is_ok() {
            FieldType::Integer
        } else if value.parse::<f64>().is_ok() {
            FieldType::Double
        } else {
            FieldType::String
        }
    }

    /// Type declared by an XSD simple type local name
    pub fn of_xsd_type(type_name: &str) -> FieldType {
        match type_name {
            "decimal" => FieldType::Double,
            "integer" => FieldType::Integer,
            _ => FieldType::String,
        }
    }

    /// The less specific of the two types
    pub fn widen(self, other: FieldType) -> FieldType {
        self.max(other)
    }

    /// Lowercase type name
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Double => "double",
            FieldType::String => "string",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A scalar attribute of a feature class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Attribute name
    pub name: String,
    /// Inferred type
    pub field_type: FieldType,
    /// Declared type token (schema mode only, informational)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub type_name: String,
}

impl FieldDefinition {
    /// Create a field without a declared type name
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            type_name: String::new(),
        }
    }

    /// Attach the declared type name
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }
}

/// An inferred feature type: scalar fields plus geometry attribute names
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureClass {
    /// Local element name
    pub name: String,
    /// Dotted element path where the class was first seen
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// Fields in first-seen order
    pub fields: Vec<FieldDefinition>,
    /// Geometry attribute names in first-seen order, without duplicates
    pub geometry_attributes: Vec<String>,
}

impl FeatureClass {
    /// Create an empty feature class first seen at `path`
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            fields: Vec::new(),
            geometry_attributes: Vec::new(),
        }
    }

    /// Position of the named field
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `name` is recorded as a geometry attribute
    pub fn is_geometry_attribute(&self, name: &str) -> bool {
        self.geometry_attributes.iter().any(|g| g == name)
    }

    /// Record a geometry attribute. Returns false if the name was already
    /// known, either as a geometry attribute or as a scalar field.
    pub fn add_geometry_attribute(&mut self, name: &str) -> bool {
        if self.is_geometry_attribute(name) || self.field_index(name).is_some() {
            return false;
        }
        self.geometry_attributes.push(name.to_string());
        true
    }

    /// Append a declared field (schema mode)
    pub fn push_field(&mut self, field: FieldDefinition) {
        self.fields.push(field);
    }

    /// Merge one observed value of a scalar attribute, widening its type
    pub fn observe_value(&mut self, name: &str, value: &str) {
        if self.is_geometry_attribute(name) {
            return;
        }
        let candidate = FieldType::of_value(value);
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.field_type = field.field_type.widen(candidate),
            None => self.fields.push(FieldDefinition::new(name, candidate)),
        }
    }
}

/// Result of one inference run: feature classes keyed by name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GmlSchema {
    feature_classes: BTreeMap<String, FeatureClass>,
}

impl GmlSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a feature class, replacing any class of the same name
    pub fn insert(&mut self, feature_class: FeatureClass) {
        self.feature_classes
            .insert(feature_class.name.clone(), feature_class);
    }

    /// Whether a feature class of this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.feature_classes.contains_key(name)
    }

    /// Look up a feature class by name
    pub fn feature_class(&self, name: &str) -> Option<&FeatureClass> {
        self.feature_classes.get(name)
    }

    /// Look up a feature class by name for updating
    pub fn feature_class_mut(&mut self, name: &str) -> Option<&mut FeatureClass> {
        self.feature_classes.get_mut(name)
    }

    /// Names of all feature classes, sorted
    pub fn type_names(&self) -> Vec<&str> {
        self.feature_classes.keys().map(String::as_str).collect()
    }

    /// Fields of the named class (empty if unknown)
    pub fn fields(&self, name: &str) -> &[FieldDefinition] {
        self.feature_classes
            .get(name)
            .map(|fc| fc.fields.as_slice())
            .unwrap_or_default()
    }

    /// Geometry attribute names of the named class (empty if unknown)
    pub fn geometry_attributes(&self, name: &str) -> &[String] {
        self.feature_classes
            .get(name)
            .map(|fc| fc.geometry_attributes.as_slice())
            .unwrap_or_default()
    }

    /// Number of feature classes
    pub fn len(&self) -> usize {
        self.feature_classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_classes.is_empty()
    }

    /// Feature classes in name order
    pub fn iter(&self) -> btree_map::Values<'_, String, FeatureClass> {
        self.feature_classes.values()
    }

    /// Consume the schema and return its feature classes keyed by name
    pub fn into_feature_classes(self) -> BTreeMap<String, FeatureClass> {
        self.feature_classes
    }
}

impl IntoIterator for GmlSchema {
    type Item = (String, FeatureClass);
    type IntoIter = btree_map::IntoIter<String, FeatureClass>;

    fn into_iter(self) -> Self::IntoIter {
        self.feature_classes.into_iter()
    }
}
