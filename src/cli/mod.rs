//! CLI module for the gml-schema binary

pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
