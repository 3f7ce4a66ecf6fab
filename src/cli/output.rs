//! Output formatting for CLI

use crate::schema::{GmlSchema, GmlSchemaError};

use super::error::CliError;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Pretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "pretty" => Ok(OutputFormat::Pretty),
            _ => Err(CliError::InvalidArgument(format!("Unknown format: {}", s))),
        }
    }
}

/// Render an inferred schema in the requested format
pub fn format_schema(schema: &GmlSchema, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(schema)
            .map_err(|e| CliError::Serialization(e.to_string())),
        OutputFormat::Yaml => {
            serde_yaml::to_string(schema).map_err(|e| CliError::Serialization(e.to_string()))
        }
        OutputFormat::Pretty => Ok(format_pretty_output(schema, &[])),
    }
}

/// Human readable listing of feature classes and skipped types
pub fn format_pretty_output(schema: &GmlSchema, issues: &[GmlSchemaError]) -> String {
    let mut output = String::new();

    if !issues.is_empty() {
        output.push_str("\n⚠️  Skipped:\n");
        for issue in issues {
            output.push_str(&format!("  - {}\n", issue));
        }
    }

    output.push_str(&format!("\n✅ Found {} feature class(es):\n", schema.len()));
    for feature_class in schema.iter() {
        output.push_str(&format!("\n{}\n", feature_class.name));
        if !feature_class.path.is_empty() {
            output.push_str(&format!("  Path: {}\n", feature_class.path));
        }
        if !feature_class.geometry_attributes.is_empty() {
            output.push_str(&format!(
                "  Geometry: {}\n",
                feature_class.geometry_attributes.join(", ")
            ));
        }
        output.push_str(&format!("  Fields: {}\n", feature_class.fields.len()));
        for field in &feature_class.fields {
            if field.type_name.is_empty() {
                output.push_str(&format!("    - {} ({})\n", field.name, field.field_type));
            } else {
                output.push_str(&format!(
                    "    - {} ({}, declared {})\n",
                    field.name, field.field_type, field.type_name
                ));
            }
        }
    }

    output
}
