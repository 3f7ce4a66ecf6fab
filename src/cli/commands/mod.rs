//! CLI command implementations

pub mod schema;

pub use schema::{GuessArgs, XsdArgs, handle_guess, handle_xsd};
