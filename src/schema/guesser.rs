//! Streaming schema guesser for GML documents without a usable schema
//!
//! The guesser is a push-driven state machine: an event source calls
//! [`SchemaGuesser::start_element`], [`SchemaGuesser::characters`] and
//! [`SchemaGuesser::end_element`] in document order, and the guesser classifies
//! each element as a feature collection wrapper, a feature, a scalar attribute
//! or a geometry attribute from naming conventions alone.
//!
//! Element names are passed as `namespace-URI?local-name` (or a bare local
//! name when the element has no namespace), see [`NS_SEPARATOR`].

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::config::SchemaConfig;
use super::types::{FeatureClass, GEOMETRY_TYPES, GmlSchema};

/// Separator between namespace URI and local name in qualified element names
pub const NS_SEPARATOR: char = '?';

/// Semantic context of the element currently being parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    None,
    FeatureMembers,
    FeatureMember,
    Feature,
    Attribute,
}

/// An entry of the mode stack, carrying the context its mode needs
#[derive(Debug)]
enum Frame {
    FeatureMembers,
    FeatureMember,
    Feature {
        class_name: String,
    },
    Attribute {
        class_name: String,
        name: String,
        text: String,
    },
}

impl Frame {
    fn mode(&self) -> ParseMode {
        match self {
            Frame::FeatureMembers => ParseMode::FeatureMembers,
            Frame::FeatureMember => ParseMode::FeatureMember,
            Frame::Feature { .. } => ParseMode::Feature,
            Frame::Attribute { .. } => ParseMode::Attribute,
        }
    }
}

#[derive(Debug)]
struct PathEntry {
    name: String,
    /// Whether this element pushed a frame that its end tag must pop
    pushed_mode: bool,
}

/// Statistics from one guessing run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessStats {
    /// Start tags received, including skipped ones
    pub elements_seen: usize,
    /// Feature instances started
    pub features_seen: usize,
    /// Feature instances whose end tag was reached
    pub features_completed: usize,
    /// Deepest element nesting
    pub max_depth: usize,
}

/// Split `uri?local` into its namespace and local name
pub fn split_name(qualified: &str) -> (Option<&str>, &str) {
    match qualified.rsplit_once(NS_SEPARATOR) {
        Some((namespace, local)) => (Some(namespace), local),
        None => (None, qualified),
    }
}

fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name.is_char_boundary(name.len() - suffix.len())
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

fn attribute_value<'a>(attributes: &[(&str, &'a str)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
}

/// Single-pass schema guesser
#[derive(Debug)]
pub struct SchemaGuesser {
    config: SchemaConfig,
    depth: usize,
    /// Elements at or below this depth are ignored
    skip_depth: Option<usize>,
    modes: Vec<Frame>,
    path: Vec<PathEntry>,
    schema: GmlSchema,
    stats: GuessStats,
}

impl SchemaGuesser {
    /// Create a guesser with default configuration
    pub fn new() -> Self {
        Self::with_config(SchemaConfig::default())
    }

    /// Create a guesser with custom configuration
    pub fn with_config(config: SchemaConfig) -> Self {
        Self {
            config,
            depth: 0,
            skip_depth: None,
            modes: Vec::new(),
            path: Vec::new(),
            schema: GmlSchema::new(),
            stats: GuessStats::default(),
        }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Current element depth (root element = 1 while open)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Mode at the top of the mode stack
    pub fn mode(&self) -> ParseMode {
        self.modes.last().map_or(ParseMode::None, Frame::mode)
    }

    /// Feature classes inferred so far
    pub fn schema(&self) -> &GmlSchema {
        &self.schema
    }

    /// Counters for the events processed so far
    pub fn stats(&self) -> &GuessStats {
        &self.stats
    }

    /// Whether the configured number of features has been analyzed
    pub fn sample_limit_reached(&self) -> bool {
        self.config.sample_size > 0 && self.stats.features_completed >= self.config.sample_size
    }

    /// Consume the guesser and return the inferred schema
    pub fn finish(self) -> GmlSchema {
        self.schema
    }

    fn is_skipping(&self) -> bool {
        self.skip_depth.is_some_and(|skip| self.depth >= skip)
    }

    fn current_path(&self) -> String {
        self.path
            .iter()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Handle a start tag. `attributes` are (qualified name, value) pairs.
    pub fn start_element(&mut self, name: &str, attributes: &[(&str, &str)]) {
        self.depth += 1;
        self.stats.elements_seen += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.depth);

        if self.is_skipping() {
            trace!(depth = self.depth, name, "skip");
            return;
        }

        let (namespace, local_name) = split_name(name);
        let in_gml = namespace == Some(self.config.gml_namespace.as_str());
        self.path.push(PathEntry {
            name: local_name.to_string(),
            pushed_mode: false,
        });

        if let Some(frame) = self.classify_start(in_gml, local_name, attributes) {
            self.modes.push(frame);
            if let Some(entry) = self.path.last_mut() {
                entry.pushed_mode = true;
            }
        }
    }

    fn classify_start(
        &mut self,
        in_gml: bool,
        local_name: &str,
        attributes: &[(&str, &str)],
    ) -> Option<Frame> {
        let mode = self.mode();

        if in_gml && local_name == "boundedBy" {
            self.skip_depth = Some(self.depth + 1);
            return None;
        }
        if local_name.eq_ignore_ascii_case("featureMembers") {
            return Some(Frame::FeatureMembers);
        }
        // Feature association elements are conventionally named *Member,
        // e.g. gml:featureMember, osgb:topographicMember
        if ends_with_ignore_case(local_name, "member") {
            return Some(Frame::FeatureMember);
        }
        // MapServer GetFeatureInfo layer wrapper, its *_feature children follow
        if local_name.ends_with("_layer") {
            return None;
        }
        if local_name.ends_with("_feature")
            || matches!(mode, ParseMode::FeatureMember | ParseMode::FeatureMembers)
            || local_name.eq_ignore_ascii_case("feature")
        {
            return Some(self.begin_feature(local_name));
        }

        match self.modes.last() {
            Some(Frame::Attribute {
                class_name, name, ..
            }) if in_gml && GEOMETRY_TYPES.contains(&local_name) => {
                if let Some(feature_class) = self.schema.feature_class_mut(class_name) {
                    if feature_class.add_geometry_attribute(name) {
                        debug!(feature = %class_name, attribute = %name, geometry = local_name, "Geometry attribute");
                    }
                }
                self.skip_depth = Some(self.depth + 1);
                None
            }
            Some(Frame::Feature { class_name }) => {
                // <Attribute name="desc" value="My description"/>
                if local_name.eq_ignore_ascii_case("attribute") {
                    if let Some(attribute_name) =
                        attribute_value(attributes, "name").filter(|n| !n.is_empty())
                    {
                        let value = attribute_value(attributes, "value").unwrap_or_default();
                        if let Some(feature_class) = self.schema.feature_class_mut(class_name) {
                            feature_class.observe_value(attribute_name, value);
                        }
                        return None;
                    }
                }
                Some(Frame::Attribute {
                    class_name: class_name.clone(),
                    name: local_name.to_string(),
                    text: String::new(),
                })
            }
            _ => None,
        }
    }

    fn begin_feature(&mut self, local_name: &str) -> Frame {
        if !self.schema.contains(local_name) {
            let path = self.current_path();
            debug!(feature = local_name, path = %path, "Feature class discovered");
            self.schema.insert(FeatureClass::new(local_name, path));
        }
        self.stats.features_seen += 1;
        Frame::Feature {
            class_name: local_name.to_string(),
        }
    }

    /// Handle character data; fragments of one text node may arrive separately
    pub fn characters(&mut self, text: &str) {
        if self.is_skipping() {
            return;
        }
        if let Some(Frame::Attribute { text: buffer, .. }) = self.modes.last_mut() {
            buffer.push_str(text);
        }
    }

    /// Handle an end tag
    pub fn end_element(&mut self, name: &str) {
        if self.is_skipping() {
            self.depth = self.depth.saturating_sub(1);
            return;
        }
        self.skip_depth = None;

        match self.path.pop() {
            Some(entry) if entry.pushed_mode => match self.modes.pop() {
                Some(Frame::Attribute {
                    class_name,
                    name,
                    text,
                }) => {
                    if let Some(feature_class) = self.schema.feature_class_mut(&class_name) {
                        feature_class.observe_value(&name, &text);
                    }
                }
                Some(Frame::Feature { .. }) => self.stats.features_completed += 1,
                _ => {}
            },
            Some(_) => {}
            None => trace!(name, "end tag without start tag"),
        }
        self.depth = self.depth.saturating_sub(1);
    }
}

impl Default for SchemaGuesser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::config::GML_NAMESPACE;
    use crate::schema::types::FieldType;

    fn gml(local: &str) -> String {
        format!("{}{}{}", GML_NAMESPACE, NS_SEPARATOR, local)
    }

    fn text_element(guesser: &mut SchemaGuesser, name: &str, text: &str) {
        guesser.start_element(name, &[]);
        guesser.characters(text);
        guesser.end_element(name);
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("http://x?Point"), (Some("http://x"), "Point"));
        assert_eq!(split_name("http://x?a=b?Point"), (Some("http://x?a=b"), "Point"));
        assert_eq!(split_name("Point"), (None, "Point"));
    }

    #[test]
    fn test_ends_with_ignore_case() {
        assert!(ends_with_ignore_case("topographicMember", "member"));
        assert!(ends_with_ignore_case("featureMEMBER", "member"));
        assert!(!ends_with_ignore_case("featureMembers", "member"));
        assert!(!ends_with_ignore_case("mem", "member"));
        assert!(!ends_with_ignore_case("ümember", "xmember"));
    }

    #[test]
    fn test_mode_transitions() {
        let mut g = SchemaGuesser::new();
        g.start_element("collection", &[]);
        assert_eq!(g.mode(), ParseMode::None);
        g.start_element(&gml("featureMember"), &[]);
        assert_eq!(g.mode(), ParseMode::FeatureMember);
        g.start_element("road", &[]);
        assert_eq!(g.mode(), ParseMode::Feature);
        g.start_element("name", &[]);
        assert_eq!(g.mode(), ParseMode::Attribute);
        g.end_element("name");
        assert_eq!(g.mode(), ParseMode::Feature);
        g.end_element("road");
        assert_eq!(g.mode(), ParseMode::FeatureMember);
        g.end_element(&gml("featureMember"));
        assert_eq!(g.mode(), ParseMode::None);
        g.end_element("collection");
        assert_eq!(g.depth(), 0);
        assert_eq!(g.stats().features_completed, 1);
        assert_eq!(g.schema().feature_class("road").unwrap().path, "collection.featureMember.road");
    }

    #[test]
    fn test_text_fragments_are_concatenated() {
        let mut g = SchemaGuesser::new();
        g.start_element("featureMembers", &[]);
        g.start_element("town", &[]);
        g.start_element("pop", &[]);
        g.characters("12");
        g.characters("34");
        g.characters(".5");
        g.end_element("pop");
        g.end_element("town");
        g.end_element("featureMembers");

        let fields = g.schema().fields("town");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_type, FieldType::Double);
    }

    #[test]
    fn test_bounded_by_is_skipped() {
        let mut g = SchemaGuesser::new();
        g.start_element("featureMembers", &[]);
        g.start_element("town", &[]);
        g.start_element(&gml("boundedBy"), &[]);
        g.start_element(&gml("Envelope"), &[]);
        text_element(&mut g, &gml("lowerCorner"), "1 2");
        g.start_element("deep_feature", &[]);
        g.end_element("deep_feature");
        g.end_element(&gml("Envelope"));
        g.end_element(&gml("boundedBy"));
        assert_eq!(g.mode(), ParseMode::Feature);
        assert_eq!(g.depth(), 2);

        text_element(&mut g, "name", "Springfield");
        g.end_element("town");
        g.end_element("featureMembers");

        let schema = g.finish();
        assert_eq!(schema.type_names(), vec!["town"]);
        let fields = schema.fields("town");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "name");
    }

    #[test]
    fn test_geometry_attribute() {
        let mut g = SchemaGuesser::new();
        for _ in 0..2 {
            g.start_element("featureMembers", &[]);
            g.start_element("town", &[]);
            g.start_element("geom", &[]);
            g.start_element(&gml("Point"), &[]);
            text_element(&mut g, &gml("coordinates"), "1,2");
            g.end_element(&gml("Point"));
            g.end_element("geom");
            g.end_element("town");
            g.end_element("featureMembers");
        }
        let schema = g.finish();
        assert_eq!(schema.geometry_attributes("town"), ["geom"]);
        assert!(schema.fields("town").is_empty());
    }

    #[test]
    fn test_non_gml_point_is_not_geometry() {
        let mut g = SchemaGuesser::new();
        g.start_element("featureMembers", &[]);
        g.start_element("town", &[]);
        g.start_element("geom", &[]);
        text_element(&mut g, "http://example.com?Point", "1");
        g.end_element("geom");
        g.end_element("town");
        g.end_element("featureMembers");

        let schema = g.finish();
        assert!(schema.geometry_attributes("town").is_empty());
        assert_eq!(schema.fields("town")[0].field_type, FieldType::Integer);
    }

    #[test]
    fn test_key_value_attributes() {
        let mut g = SchemaGuesser::new();
        g.start_element("GetFeatureInfoResponse", &[]);
        g.start_element("Layer", &[("name", "parcels")]);
        g.start_element("Feature", &[("id", "1")]);
        g.start_element("Attribute", &[("name", "area"), ("value", "12")]);
        g.end_element("Attribute");
        g.start_element("Attribute", &[("name", "area"), ("value", "12.5")]);
        g.end_element("Attribute");
        g.start_element("Attribute", &[("name", "owner")]);
        g.end_element("Attribute");
        g.end_element("Feature");
        g.end_element("Layer");
        g.end_element("GetFeatureInfoResponse");

        let schema = g.finish();
        let fields = schema.fields("Feature");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "area");
        assert_eq!(fields[0].field_type, FieldType::Double);
        assert_eq!(fields[1].name, "owner");
        assert_eq!(fields[1].field_type, FieldType::String);
    }

    #[test]
    fn test_mapserver_layer_features() {
        let mut g = SchemaGuesser::new();
        g.start_element("msGMLOutput", &[]);
        g.start_element("roads_layer", &[]);
        assert_eq!(g.mode(), ParseMode::None);
        g.start_element("roads_feature", &[]);
        text_element(&mut g, "lanes", "2");
        g.end_element("roads_feature");
        g.end_element("roads_layer");
        g.end_element("msGMLOutput");

        let schema = g.finish();
        assert_eq!(schema.fields("roads_feature")[0].field_type, FieldType::Integer);
    }

    #[test]
    fn test_nested_feature_restores_enclosing_attribute() {
        let mut g = SchemaGuesser::new();
        g.start_element("featureMembers", &[]);
        g.start_element("parcel", &[]);
        g.start_element("owner", &[]);
        g.characters("4");
        g.start_element("person_feature", &[]);
        text_element(&mut g, "age", "40");
        g.end_element("person_feature");
        g.characters("2");
        g.end_element("owner");
        g.end_element("parcel");
        g.end_element("featureMembers");

        let schema = g.finish();
        assert_eq!(schema.fields("parcel")[0].name, "owner");
        assert_eq!(schema.fields("parcel")[0].field_type, FieldType::Integer);
        assert_eq!(schema.fields("person_feature")[0].name, "age");
    }

    #[test]
    fn test_sample_limit() {
        let config = SchemaConfig::builder().sample_size(1).build();
        let mut g = SchemaGuesser::with_config(config);
        g.start_element("featureMembers", &[]);
        g.start_element("town", &[]);
        assert!(!g.sample_limit_reached());
        g.end_element("town");
        assert!(g.sample_limit_reached());
    }
}
