//! Schema inference for GML feature data
//!
//! Two independent pipelines produce the same [`GmlSchema`] model:
//!
//! - **Streaming guesser** - walks a GML document once and infers feature
//!   classes, scalar field types and geometry attributes from naming
//!   conventions and observed values ([`guess_schema`], [`SchemaGuesser`]).
//! - **XSD extractor** - reads a GML application schema and resolves feature
//!   types through their extension/restriction chains ([`parse_xsd`],
//!   [`XsdExtractor`]).
//!
//! ## Example
//!
//! ```rust,ignore
//! use gml_schema::schema::guess_schema;
//!
//! let schema = guess_schema(std::fs::read("towns.gml")?.as_slice())?;
//! for name in schema.type_names() {
//!     println!("{}: {:?}", name, schema.fields(name));
//! }
//! ```

mod config;
pub mod dom;
mod error;
mod guesser;
mod reader;
mod types;
mod xsd;

pub use config::{GML_NAMESPACE, SchemaConfig, SchemaConfigBuilder};
pub use error::GmlSchemaError;
pub use guesser::{GuessStats, NS_SEPARATOR, ParseMode, SchemaGuesser, split_name};
pub use reader::{guess_schema, guess_schema_with_config};
pub use types::{
    ABSTRACT_FEATURE_TYPE, FeatureClass, FieldDefinition, FieldType, GEOMETRY_ALIASES,
    GEOMETRY_TYPES, GmlSchema,
};
pub use xsd::{XsdExtractor, parse_xsd};
