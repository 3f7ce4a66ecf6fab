//! gml-schema command line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gml_schema::cli::commands::{GuessArgs, XsdArgs, handle_guess, handle_xsd};
use gml_schema::cli::output::OutputFormat;

#[derive(Parser)]
#[command(name = "gml-schema", version, about = "Infer feature types from GML documents and schemas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Guess the schema of a GML document from its content
    Guess {
        /// GML document (use - for stdin)
        input: String,
        /// Number of features to analyze (0 = all)
        #[arg(long, default_value_t = 0)]
        sample_size: usize,
        /// GML namespace URI
        #[arg(long)]
        gml_namespace: Option<String>,
        /// Output format (json, yaml, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: OutputFormat,
        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract feature types from a GML application schema
    Xsd {
        /// XSD document (use - for stdin)
        input: String,
        /// Prefix used for GML types in the schema
        #[arg(long)]
        gml_prefix: Option<String>,
        /// Output format (json, yaml, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: OutputFormat,
        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Guess {
            input,
            sample_size,
            gml_namespace,
            format,
            output,
        } => {
            handle_guess(&GuessArgs {
                input,
                sample_size,
                gml_namespace,
                format,
                output,
            })?;
        }
        Commands::Xsd {
            input,
            gml_prefix,
            format,
            output,
        } => {
            handle_xsd(&XsdArgs {
                input,
                gml_prefix,
                format,
                output,
            })?;
        }
    }

    Ok(())
}
