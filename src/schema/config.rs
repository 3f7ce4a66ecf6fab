//! Configuration for schema inference

use serde::{Deserialize, Serialize};

/// Namespace URI of GML 2/3.1 documents
pub const GML_NAMESPACE: &str = "http://www.opengis.net/gml";

/// Configuration shared by the streaming guesser and the XSD extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaConfig {
    /// Namespace URI identifying GML elements in streamed documents
    pub gml_namespace: String,

    /// Prefix identifying GML types and elements in schema documents
    pub gml_prefix: String,

    /// Maximum length of an extension/restriction chain in schema mode
    pub max_type_depth: usize,

    /// Number of feature instances to analyze before stopping (0 = all)
    pub sample_size: usize,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            gml_namespace: GML_NAMESPACE.to_string(),
            gml_prefix: "gml".to_string(),
            max_type_depth: 32,
            sample_size: 0, // All features
        }
    }
}

impl SchemaConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> SchemaConfigBuilder {
        SchemaConfigBuilder::default()
    }

    /// Whether a prefixed name such as `gml:AbstractFeatureType` carries the GML prefix
    pub(crate) fn has_gml_prefix(&self, qualified: &str) -> bool {
        qualified
            .split_once(':')
            .is_some_and(|(prefix, _)| prefix == self.gml_prefix)
    }
}

/// Builder for SchemaConfig
#[derive(Debug, Default)]
pub struct SchemaConfigBuilder {
    config: SchemaConfig,
}

impl SchemaConfigBuilder {
    /// Set the GML namespace URI used in streaming mode
    pub fn gml_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.gml_namespace = namespace.into();
        self
    }

    /// Set the GML prefix used in schema mode
    pub fn gml_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.gml_prefix = prefix.into();
        self
    }

    /// Set the maximum extension/restriction chain length
    pub fn max_type_depth(mut self, depth: usize) -> Self {
        self.config.max_type_depth = depth.max(1);
        self
    }

    /// Set the number of features to analyze (0 = all)
    pub fn sample_size(mut self, size: usize) -> Self {
        self.config.sample_size = size;
        self
    }

    /// Build the configuration
    pub fn build(self) -> SchemaConfig {
        self.config
    }
}
