//! Drives a [`SchemaGuesser`] from raw document bytes
//!
//! Uses quick-xml's namespace-resolving reader. Element names are handed to
//! the guesser as `namespace-URI?local-name`; empty elements are expanded to a
//! start and end tag. Documents are decoded with the encoding named in their
//! XML declaration (or byte order mark), falling back to UTF-8.

use quick_xml::encoding::Decoder;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use tracing::debug;

use super::config::SchemaConfig;
use super::error::GmlSchemaError;
use super::guesser::{NS_SEPARATOR, SchemaGuesser};
use super::types::GmlSchema;

/// Guess the schema of a GML document with default configuration
pub fn guess_schema(data: &[u8]) -> Result<GmlSchema, GmlSchemaError> {
    guess_schema_with_config(data, SchemaConfig::default())
}

/// Guess the schema of a GML document
pub fn guess_schema_with_config(
    data: &[u8],
    config: SchemaConfig,
) -> Result<GmlSchema, GmlSchemaError> {
    let mut guesser = SchemaGuesser::with_config(config);
    guesser.parse(data)?;
    Ok(guesser.finish())
}

fn qualified_name(
    decoder: Decoder,
    namespace: ResolveResult<'_>,
    local_name: &[u8],
) -> Result<String, String> {
    let local_name = decoder.decode(local_name).map_err(|e| e.to_string())?;
    match namespace {
        ResolveResult::Bound(ns) => {
            let uri = decoder.decode(ns.as_ref()).map_err(|e| e.to_string())?;
            Ok(format!("{}{}{}", uri, NS_SEPARATOR, local_name))
        }
        ResolveResult::Unbound => Ok(local_name.into_owned()),
        ResolveResult::Unknown(prefix) => Err(format!(
            "unbound namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        )),
    }
}

impl SchemaGuesser {
    /// Feed a complete document through the guesser.
    ///
    /// Stops early, without error, once the configured sample size is reached.
    pub fn parse(&mut self, data: &[u8]) -> Result<(), GmlSchemaError> {
        let mut reader = NsReader::from_reader(data);
        reader.config_mut().trim_text(false);
        reader.config_mut().expand_empty_elements = true;

        let mut open_elements: usize = 0;
        let mut seen_root = false;

        loop {
            let position = reader.buffer_position();
            // Updated once the XML declaration has been read
            let decoder = reader.decoder();
            match reader.read_resolved_event() {
                Ok((namespace, Event::Start(e))) => {
                    let name = qualified_name(decoder, namespace, e.local_name().as_ref())
                        .map_err(|message| GmlSchemaError::malformed_input(message, position))?;
                    let mut owned: Vec<(String, String)> = Vec::new();
                    for attr in e.attributes() {
                        let attr = attr
                            .map_err(|err| GmlSchemaError::malformed_input(err.to_string(), position))?;
                        let key = decoder
                            .decode(attr.key.as_ref())
                            .map_err(|err| GmlSchemaError::malformed_input(err.to_string(), position))?;
                        let value = attr
                            .decode_and_unescape_value(decoder)
                            .map_err(|err| GmlSchemaError::malformed_input(err.to_string(), position))?;
                        owned.push((key.into_owned(), value.into_owned()));
                    }
                    let attributes: Vec<(&str, &str)> = owned
                        .iter()
                        .map(|(key, value)| (key.as_str(), value.as_str()))
                        .collect();

                    seen_root = true;
                    open_elements += 1;
                    self.start_element(&name, &attributes);
                }
                Ok((namespace, Event::End(e))) => {
                    let name = qualified_name(decoder, namespace, e.local_name().as_ref())
                        .map_err(|message| GmlSchemaError::malformed_input(message, position))?;
                    open_elements = open_elements.saturating_sub(1);
                    self.end_element(&name);

                    if self.sample_limit_reached() {
                        debug!(
                            features = self.stats().features_completed,
                            "Sample size reached, stopping"
                        );
                        return Ok(());
                    }
                }
                Ok((_, Event::Text(e))) => {
                    let text = e
                        .unescape()
                        .map_err(|err| GmlSchemaError::malformed_input(err.to_string(), position))?;
                    self.characters(&text);
                }
                Ok((_, Event::CData(e))) => {
                    let text = decoder
                        .decode(e.as_ref())
                        .map_err(|err| GmlSchemaError::malformed_input(err.to_string(), position))?;
                    self.characters(&text);
                }
                Ok((_, Event::Eof)) => break,
                Ok(_) => {}
                Err(e) => {
                    debug!("XML parsing failed: {}", e);
                    return Err(GmlSchemaError::malformed_input(
                        e.to_string(),
                        reader.error_position(),
                    ));
                }
            }
        }

        let end = reader.buffer_position();
        if !seen_root {
            return Err(GmlSchemaError::malformed_input("no element found", end));
        }
        if open_elements > 0 {
            return Err(GmlSchemaError::malformed_input(
                format!("{} unclosed element(s) at end of document", open_elements),
                end,
            ));
        }

        debug!(
            elements = self.stats().elements_seen,
            features = self.stats().features_seen,
            classes = self.schema().len(),
            "Schema guess complete"
        );
        Ok(())
    }
}
