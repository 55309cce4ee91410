//! Codec configuration.

use crate::buffer::DEFAULT_BUFFER_SIZE;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration consumed once at codec construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// When true, response result data (and every nested value) is encoded
    /// as its canonical text form instead of its native binary form.
    /// Lossy by design: decoded data is always textual.
    pub serialize_result_to_string: bool,

    /// Ordered list of extension-provider names to load into the type
    /// registry. Names are looked up in the [`FactoryCatalog`] passed to
    /// [`MessageCodec::configure`].
    ///
    /// [`FactoryCatalog`]: crate::registry::FactoryCatalog
    /// [`MessageCodec::configure`]: crate::codec::MessageCodec::configure
    pub extensions: Vec<String>,

    /// Name of an alternate class resolver supplier. The default resolver
    /// is a direct registry lookup.
    pub class_resolver: Option<String>,

    /// Initial capacity of the per-call output buffer, in bytes. Also the
    /// growth chunk and the bound on a single atomic write.
    pub buffer_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            serialize_result_to_string: false,
            extensions: Vec::new(),
            class_resolver: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl CodecConfig {
    /// The default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable text result mode.
    pub fn with_serialize_result_to_string(mut self, enabled: bool) -> Self {
        self.serialize_result_to_string = enabled;
        self
    }

    /// Add an extension provider name to load.
    pub fn with_extension(mut self, name: impl Into<String>) -> Self {
        self.extensions.push(name.into());
        self
    }

    /// Use an alternate class resolver supplier.
    pub fn with_class_resolver(mut self, name: impl Into<String>) -> Self {
        self.class_resolver = Some(name.into());
        self
    }

    /// Set the output buffer size.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Build a configuration from an untyped key/value map.
    ///
    /// Understands the keys `serialize_result_to_string`, `extensions`,
    /// `class_resolver` and `buffer_size`; unknown keys or wrongly typed
    /// values are configuration errors.
    pub fn from_map(map: &HashMap<String, serde_json::Value>) -> Result<Self, Error> {
        let object = serde_json::Value::Object(
            map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        );
        serde_json::from_value(object).map_err(|e| Error::Configuration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert!(!config.serialize_result_to_string);
        assert!(config.extensions.is_empty());
        assert!(config.class_resolver.is_none());
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn test_config_builder() {
        let config = CodecConfig::new()
            .with_serialize_result_to_string(true)
            .with_extension("color")
            .with_extension("geo")
            .with_class_resolver("strict")
            .with_buffer_size(64);

        assert!(config.serialize_result_to_string);
        assert_eq!(config.extensions, vec!["color", "geo"]);
        assert_eq!(config.class_resolver.as_deref(), Some("strict"));
        assert_eq!(config.buffer_size, 64);
    }

    #[test]
    fn test_from_map() {
        let mut map = HashMap::new();
        map.insert("serialize_result_to_string".to_string(), json!(true));
        map.insert("extensions".to_string(), json!(["color"]));
        map.insert("buffer_size".to_string(), json!(128));

        let config = CodecConfig::from_map(&map).unwrap();
        assert!(config.serialize_result_to_string);
        assert_eq!(config.extensions, vec!["color"]);
        assert_eq!(config.buffer_size, 128);
        assert!(config.class_resolver.is_none());
    }

    #[test]
    fn test_from_map_rejects_unknown_keys() {
        let mut map = HashMap::new();
        map.insert("bufferSize".to_string(), json!(128));

        let err = CodecConfig::from_map(&map).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_from_map_rejects_wrong_types() {
        let mut map = HashMap::new();
        map.insert("buffer_size".to_string(), json!("huge"));

        assert!(matches!(
            CodecConfig::from_map(&map).unwrap_err(),
            Error::Configuration(_)
        ));
    }
}
