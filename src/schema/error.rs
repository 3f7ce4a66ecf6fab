//! Error types for GML schema inference

use thiserror::Error;

/// Errors that can occur during schema inference
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GmlSchemaError {
    /// The document bytes could not be tokenized as XML.
    ///
    /// Fatal to a streaming run; the partial feature class map is discarded.
    #[error("Cannot guess schema: XML parsing error at position {position}: {message}")]
    InputMalformed { message: String, position: u64 },

    /// The schema text is not a usable XML Schema document tree
    #[error("Schema document is malformed: {0}")]
    SchemaMalformed(String),

    /// A single element's type ancestry or field type could not be resolved.
    ///
    /// Never returned as `Err`; the extractor records these as issues and
    /// carries on with the remaining elements.
    #[error("Cannot resolve type {type_name}: {reason}")]
    TypeResolutionIncomplete { type_name: String, reason: String },
}

impl GmlSchemaError {
    pub(crate) fn malformed_input(message: impl Into<String>, position: u64) -> Self {
        GmlSchemaError::InputMalformed {
            message: message.into(),
            position,
        }
    }

    pub(crate) fn unresolved(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        GmlSchemaError::TypeResolutionIncomplete {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error aborts the whole run
    pub fn is_fatal(&self) -> bool {
        !matches!(self, GmlSchemaError::TypeResolutionIncomplete { .. })
    }
}

impl From<roxmltree::Error> for GmlSchemaError {
    fn from(e: roxmltree::Error) -> Self {
        GmlSchemaError::SchemaMalformed(e.to_string())
    }
}
