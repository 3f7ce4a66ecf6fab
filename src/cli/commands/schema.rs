//! Schema inference commands

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::error::CliError;
use crate::cli::output::{OutputFormat, format_pretty_output, format_schema};
use crate::schema::{GmlSchema, SchemaConfig, SchemaGuesser, XsdExtractor};

/// Arguments for the `guess` command
pub struct GuessArgs {
    /// GML document path, `-` for stdin
    pub input: String,
    /// Number of features to analyze (0 = all)
    pub sample_size: usize,
    /// Override of the GML namespace URI
    pub gml_namespace: Option<String>,
    pub format: OutputFormat,
    /// Output file path (stdout if not provided)
    pub output: Option<PathBuf>,
}

/// Arguments for the `xsd` command
pub struct XsdArgs {
    /// Schema document path, `-` for stdin
    pub input: String,
    /// Override of the GML prefix
    pub gml_prefix: Option<String>,
    pub format: OutputFormat,
    /// Output file path (stdout if not provided)
    pub output: Option<PathBuf>,
}

/// Load input content from file or stdin
fn load_input(input: &str) -> Result<Vec<u8>, CliError> {
    if input == "-" {
        let mut content = Vec::new();
        std::io::stdin()
            .read_to_end(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        let path = PathBuf::from(input);
        std::fs::read(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), CliError> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .map_err(|e| CliError::FileWriteError(path.to_path_buf(), e.to_string()))?;
            eprintln!("Schema written to: {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// Handle the `guess` command
pub fn handle_guess(args: &GuessArgs) -> Result<GmlSchema, CliError> {
    let data = load_input(&args.input)?;

    let mut builder = SchemaConfig::builder().sample_size(args.sample_size);
    if let Some(ref namespace) = args.gml_namespace {
        builder = builder.gml_namespace(namespace.clone());
    }

    let mut guesser = SchemaGuesser::with_config(builder.build());
    guesser.parse(&data)?;

    let stats = guesser.stats().clone();
    eprintln!("Guessed schema from {} element(s)", stats.elements_seen);
    eprintln!("  Features analyzed: {}", stats.features_completed);
    eprintln!("  Maximum depth: {}", stats.max_depth);

    let schema = guesser.finish();
    write_output(args.output.as_deref(), &format_schema(&schema, args.format)?)?;
    Ok(schema)
}

/// Handle the `xsd` command
pub fn handle_xsd(args: &XsdArgs) -> Result<GmlSchema, CliError> {
    let data = load_input(&args.input)?;
    let content = String::from_utf8(data)
        .map_err(|e| CliError::InvalidArgument(format!("Schema is not UTF-8: {}", e)))?;

    let mut builder = SchemaConfig::builder();
    if let Some(ref prefix) = args.gml_prefix {
        builder = builder.gml_prefix(prefix.clone());
    }

    let mut extractor = XsdExtractor::with_config(builder.build());
    let schema = extractor.parse(&content)?;

    let rendered = match args.format {
        OutputFormat::Pretty => format_pretty_output(&schema, extractor.issues()),
        format => {
            for issue in extractor.issues() {
                eprintln!("Skipped: {}", issue);
            }
            format_schema(&schema, format)?
        }
    };
    write_output(args.output.as_deref(), &rendered)?;
    Ok(schema)
}
