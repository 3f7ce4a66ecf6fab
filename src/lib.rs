//! GML Schema - feature type inference for GML documents
//!
//! Provides:
//! - Schema guessing from GML feature streams that carry no usable schema
//! - Feature type extraction from GML application schemas (XSD)
//! - A shared feature class / field model for building tabular sources

#[cfg(feature = "cli")]
pub mod cli;
pub mod schema;

// Re-export commonly used types
pub use schema::{
    FeatureClass, FieldDefinition, FieldType, GmlSchema, GmlSchemaError, SchemaConfig,
    SchemaGuesser, XsdExtractor, guess_schema, guess_schema_with_config, parse_xsd,
};
