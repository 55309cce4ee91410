//! Message codec: the only component that sequences framing and value
//! encoding.
//!
//! Encode and decode are synchronous, single-pass transformations over an
//! in-memory byte region. Every value on the wire is self-describing: an
//! i16 type tag (resolved through the configured [`ClassResolver`])
//! followed by that kind's own payload encoding. A configured codec is
//! immutable and may be shared across threads.

use crate::buffer::{WireBuffer, WireReader, DEFAULT_BUFFER_SIZE};
use crate::config::CodecConfig;
use crate::error::Error;
use crate::graph::{Edge, Tree, Vertex, VertexProperty};
use crate::message::{
    RequestMessage, ResponseCode, ResponseMessage, ResponseResult, ResponseStatus,
};
use crate::registry::{FactoryCatalog, TypeCodec, TypeKey, TypeRegistry};
use crate::resolver::{ClassResolver, DefaultClassResolver};
use crate::value::{MapEntry, Value, ValueMap};
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};
use uuid::Uuid;

/// MIME type written in the request framing header so a receiver can
/// dispatch to the right codec version before committing to a full decode.
pub const MIME_TYPE: &str = "application/vnd.plexus-v1.0+wire";

/// Read the request framing header: one length byte followed by that many
/// bytes of MIME type.
///
/// Transports call this to dispatch; [`MessageCodec::deserialize_request`]
/// expects the header to have been consumed already.
pub fn read_mime_header(input: &mut WireReader) -> Result<String, Error> {
    let len = input.read_u8()? as usize;
    if input.remaining() < len {
        return Err(Error::MalformedStream(format!(
            "header declares {len} mime bytes but only {} are available",
            input.remaining()
        )));
    }
    let raw = input.read_exact(len)?;
    String::from_utf8(raw)
        .map_err(|e| Error::MalformedStream(format!("invalid UTF-8 in mime header: {e}")))
}

/// The wire codec for request and response envelopes.
pub struct MessageCodec {
    resolver: Arc<dyn ClassResolver>,
    serialize_result_to_string: bool,
    buffer_size: usize,
}

impl MessageCodec {
    /// A codec with the default configuration: binary result mode, the
    /// built-in registry, the default resolver, and the default buffer
    /// size.
    pub fn new() -> Self {
        let registry = Arc::new(TypeRegistry::with_builtins());
        Self {
            resolver: Arc::new(DefaultClassResolver::new(registry)),
            serialize_result_to_string: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Build a codec from configuration.
    ///
    /// Seeds a registry with the built-in kinds, loads each named
    /// extension provider in order through the catalog, then builds the
    /// class resolver (configured supplier or default). This is the only
    /// mutation point; the returned codec is read-only.
    pub fn configure(config: CodecConfig, catalog: &FactoryCatalog) -> Result<Self, Error> {
        let mut registry = TypeRegistry::with_builtins();
        for name in &config.extensions {
            let provider = catalog.extension(name)?.instantiate(name)?;
            provider.register(&mut registry);
            debug!(extension = %name, "loaded wire extension");
        }
        let registry = Arc::new(registry);

        let resolver: Arc<dyn ClassResolver> = match &config.class_resolver {
            Some(name) => {
                let resolver = catalog
                    .resolver(name)?
                    .instantiate(name, Arc::clone(&registry))?;
                debug!(resolver = %name, "using configured class resolver");
                resolver
            }
            None => Arc::new(DefaultClassResolver::new(registry)),
        };

        Ok(Self {
            resolver,
            serialize_result_to_string: config.serialize_result_to_string,
            buffer_size: config.buffer_size,
        })
    }

    /// The MIME type this codec writes in request headers.
    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }

    /// Serialize a request: framing header, id, processor, op, args.
    pub fn serialize_request(&self, message: &RequestMessage) -> Result<Bytes, Error> {
        let mut out = WireBuffer::with_capacity(self.buffer_size);
        let mime = MIME_TYPE.as_bytes();
        out.write_u8(mime.len() as u8)?;
        out.write_atomic(mime)?;
        out.write_atomic(message.id.as_bytes())?;
        out.write_str(&message.processor)?;
        out.write_str(&message.op)?;
        out.write_u32(message.args.len() as u32)?;
        for (key, value) in &message.args {
            out.write_str(key)?;
            self.write_value(value, &mut out)?;
        }
        trace!(op = %message.op, bytes = out.readable_bytes(), "serialized request");
        Ok(out.freeze())
    }

    /// Deserialize a request from its post-header payload.
    ///
    /// The caller is responsible for having consumed the MIME header
    /// (see [`read_mime_header`]).
    pub fn deserialize_request(&self, bytes: Bytes) -> Result<RequestMessage, Error> {
        let mut input = WireReader::new(bytes);
        let id = read_uuid(&mut input)?;
        let processor = input.read_str()?;
        let op = input.read_str()?;
        if op.is_empty() {
            return Err(Error::MalformedStream("request op is empty".into()));
        }
        let args = self.read_string_pairs(&mut input)?;
        if input.remaining() != 0 {
            return Err(Error::MalformedStream(format!(
                "{} trailing bytes after request",
                input.remaining()
            )));
        }
        trace!(op = %op, "deserialized request");
        Ok(RequestMessage {
            id,
            op,
            processor,
            args,
        })
    }

    /// Serialize a response: id, status code, status message, status
    /// attributes, result metadata, result data (Null tag when absent).
    ///
    /// In text result mode the data is first rewritten to its canonical
    /// text form: lists and maps keep their shape with converted
    /// elements, everything else becomes a string.
    pub fn serialize_response(&self, message: &ResponseMessage) -> Result<Bytes, Error> {
        let mut out = WireBuffer::with_capacity(self.buffer_size);
        out.write_atomic(message.request_id.as_bytes())?;
        out.write_u16(message.status.code.value())?;
        out.write_str(&message.status.message)?;
        out.write_u32(message.status.attributes.len() as u32)?;
        for (key, value) in &message.status.attributes {
            out.write_str(key)?;
            self.write_value(value, &mut out)?;
        }
        out.write_u32(message.result.meta.len() as u32)?;
        for (key, value) in &message.result.meta {
            out.write_str(key)?;
            self.write_value(value, &mut out)?;
        }
        match &message.result.data {
            Some(data) if self.serialize_result_to_string => {
                self.write_value(&to_text_form(data), &mut out)?;
            }
            Some(data) => self.write_value(data, &mut out)?,
            None => self.write_value(&Value::Null, &mut out)?,
        }
        trace!(
            code = message.status.code.value(),
            bytes = out.readable_bytes(),
            "serialized response"
        );
        Ok(out.freeze())
    }

    /// Deserialize a response. Succeeds fully or fails with no partial
    /// envelope.
    pub fn deserialize_response(&self, bytes: Bytes) -> Result<ResponseMessage, Error> {
        let mut input = WireReader::new(bytes);
        let request_id = read_uuid(&mut input)?;
        let code_value = input.read_u16()?;
        let code = ResponseCode::from_value(code_value)
            .ok_or_else(|| Error::MalformedStream(format!("unknown status code {code_value}")))?;
        let message = input.read_str()?;
        let attributes = self.read_string_pairs(&mut input)?;
        let meta = self.read_string_pairs(&mut input)?;
        let data = match self.read_value(&mut input)? {
            Value::Null => None,
            value => Some(value),
        };
        if input.remaining() != 0 {
            return Err(Error::MalformedStream(format!(
                "{} trailing bytes after response",
                input.remaining()
            )));
        }
        trace!(code = code_value, "deserialized response");
        Ok(ResponseMessage {
            request_id,
            status: ResponseStatus {
                code,
                message,
                attributes,
            },
            result: ResponseResult { meta, data },
        })
    }

    /// Write one tagged value, nested values included.
    fn write_value(&self, value: &Value, out: &mut WireBuffer) -> Result<(), Error> {
        let key = TypeKey::of(value);
        let registration = self.resolver.resolve(&key)?;
        out.write_i16(registration.tag)?;
        match &registration.codec {
            TypeCodec::Builtin => self.write_builtin(value, out),
            TypeCodec::Custom(codec) => match value {
                Value::Custom(custom) => {
                    out.write_str(&custom.kind)?;
                    codec.encode(custom, out)
                }
                _ => Err(Error::Unresolvable(key.to_string())),
            },
        }
    }

    fn write_builtin(&self, value: &Value, out: &mut WireBuffer) -> Result<(), Error> {
        match value {
            Value::Null => Ok(()),
            Value::Bool(b) => out.write_u8(*b as u8),
            Value::Int8(v) => out.write_atomic(&v.to_be_bytes()),
            Value::Int16(v) => out.write_i16(*v),
            Value::Int32(v) => out.write_i32(*v),
            Value::Int64(v) => out.write_i64(*v),
            Value::UInt8(v) => out.write_u8(*v),
            Value::UInt16(v) => out.write_u16(*v),
            Value::UInt32(v) => out.write_u32(*v),
            Value::UInt64(v) => out.write_u64(*v),
            Value::Float32(v) => out.write_f32(*v),
            Value::Float64(v) => out.write_f64(*v),
            Value::String(s) => out.write_str(s),
            Value::Uuid(u) => out.write_atomic(u.as_bytes()),
            Value::Timestamp(t) => out.write_i64(*t),
            Value::List(items) => {
                out.write_u32(items.len() as u32)?;
                for item in items {
                    self.write_value(item, out)?;
                }
                Ok(())
            }
            Value::Map(map) => {
                out.write_u32(map.len() as u32)?;
                for (k, v) in map.iter() {
                    self.write_value(k, out)?;
                    self.write_value(v, out)?;
                }
                Ok(())
            }
            Value::Entry(entry) => {
                self.write_value(&entry.key, out)?;
                self.write_value(&entry.value, out)
            }
            Value::Vertex(vertex) => self.write_vertex(vertex, out),
            Value::Edge(edge) => self.write_edge(edge, out),
            Value::Tree(tree) => self.write_tree(tree, out),
            Value::Custom(custom) => {
                // A custom value can only reach here through a registry
                // that bound an extension kind as builtin.
                Err(Error::Unresolvable(format!("custom:{}", custom.kind)))
            }
        }
    }

    fn write_vertex(&self, vertex: &Vertex, out: &mut WireBuffer) -> Result<(), Error> {
        self.write_value(&vertex.id, out)?;
        out.write_str(&vertex.label)?;
        out.write_u32(vertex.properties.len() as u32)?;
        for (key, properties) in &vertex.properties {
            out.write_str(key)?;
            out.write_u32(properties.len() as u32)?;
            for property in properties {
                self.write_value(&property.value, out)?;
                out.write_u32(property.properties.len() as u32)?;
                for (meta_key, meta_value) in &property.properties {
                    out.write_str(meta_key)?;
                    self.write_value(meta_value, out)?;
                }
            }
        }
        Ok(())
    }

    fn write_edge(&self, edge: &Edge, out: &mut WireBuffer) -> Result<(), Error> {
        self.write_value(&edge.id, out)?;
        out.write_str(&edge.label)?;
        self.write_value(&edge.out_id, out)?;
        out.write_str(&edge.out_label)?;
        self.write_value(&edge.in_id, out)?;
        out.write_str(&edge.in_label)?;
        out.write_u32(edge.properties.len() as u32)?;
        for (key, value) in &edge.properties {
            out.write_str(key)?;
            self.write_value(value, out)?;
        }
        Ok(())
    }

    fn write_tree(&self, tree: &Tree, out: &mut WireBuffer) -> Result<(), Error> {
        out.write_u32(tree.len() as u32)?;
        for (key, child) in tree.iter() {
            self.write_value(key, out)?;
            self.write_tree(child, out)?;
        }
        Ok(())
    }

    /// Read one tagged value.
    fn read_value(&self, input: &mut WireReader) -> Result<Value, Error> {
        let tag = input.read_i16()?;
        let registration = self.resolver.resolve_tag(tag)?;
        match &registration.codec {
            TypeCodec::Builtin => self.read_builtin(&registration.key, input),
            TypeCodec::Custom(codec) => {
                let kind = input.read_str()?;
                if kind != codec.kind() {
                    return Err(Error::MalformedStream(format!(
                        "tag {tag} announces kind `{kind}` but is registered to `{}`",
                        codec.kind()
                    )));
                }
                Ok(Value::Custom(codec.decode(input)?))
            }
        }
    }

    fn read_builtin(&self, key: &TypeKey, input: &mut WireReader) -> Result<Value, Error> {
        match key {
            TypeKey::Null => Ok(Value::Null),
            TypeKey::Bool => Ok(Value::Bool(input.read_u8()? != 0)),
            TypeKey::Int8 => Ok(Value::Int8(input.read_i8()?)),
            TypeKey::Int16 => Ok(Value::Int16(input.read_i16()?)),
            TypeKey::Int32 => Ok(Value::Int32(input.read_i32()?)),
            TypeKey::Int64 => Ok(Value::Int64(input.read_i64()?)),
            TypeKey::UInt8 => Ok(Value::UInt8(input.read_u8()?)),
            TypeKey::UInt16 => Ok(Value::UInt16(input.read_u16()?)),
            TypeKey::UInt32 => Ok(Value::UInt32(input.read_u32()?)),
            TypeKey::UInt64 => Ok(Value::UInt64(input.read_u64()?)),
            TypeKey::Float32 => Ok(Value::Float32(input.read_f32()?)),
            TypeKey::Float64 => Ok(Value::Float64(input.read_f64()?)),
            TypeKey::String => Ok(Value::String(input.read_str()?)),
            TypeKey::Uuid => Ok(Value::Uuid(read_uuid(input)?)),
            TypeKey::Timestamp => Ok(Value::Timestamp(input.read_i64()?)),
            TypeKey::List => {
                let count = input.read_u32()? as usize;
                let mut items = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    items.push(self.read_value(input)?);
                }
                Ok(Value::List(items))
            }
            TypeKey::Map => {
                let count = input.read_u32()? as usize;
                let mut map = ValueMap::new();
                for _ in 0..count {
                    let k = self.read_value(input)?;
                    let v = self.read_value(input)?;
                    map.insert(k, v);
                }
                Ok(Value::Map(map))
            }
            TypeKey::Entry => {
                let key = self.read_value(input)?;
                let value = self.read_value(input)?;
                Ok(Value::Entry(Box::new(MapEntry { key, value })))
            }
            TypeKey::Vertex => Ok(Value::Vertex(Box::new(self.read_vertex(input)?))),
            TypeKey::Edge => Ok(Value::Edge(Box::new(self.read_edge(input)?))),
            TypeKey::Tree => Ok(Value::Tree(self.read_tree(input)?)),
            TypeKey::Custom(kind) => Err(Error::MalformedStream(format!(
                "extension kind `{kind}` bound without a codec"
            ))),
        }
    }

    fn read_vertex(&self, input: &mut WireReader) -> Result<Vertex, Error> {
        let id = self.read_value(input)?;
        let label = input.read_str()?;
        let key_count = input.read_u32()? as usize;
        let mut properties = Vec::with_capacity(key_count.min(1024));
        for _ in 0..key_count {
            let key = input.read_str()?;
            let cardinality = input.read_u32()? as usize;
            let mut props = Vec::with_capacity(cardinality.min(1024));
            for _ in 0..cardinality {
                let value = self.read_value(input)?;
                let meta_count = input.read_u32()? as usize;
                let mut meta = Vec::with_capacity(meta_count.min(1024));
                for _ in 0..meta_count {
                    let meta_key = input.read_str()?;
                    let meta_value = self.read_value(input)?;
                    meta.push((meta_key, meta_value));
                }
                props.push(VertexProperty {
                    value,
                    properties: meta,
                });
            }
            properties.push((key, props));
        }
        Ok(Vertex {
            id,
            label,
            properties,
        })
    }

    fn read_edge(&self, input: &mut WireReader) -> Result<Edge, Error> {
        let id = self.read_value(input)?;
        let label = input.read_str()?;
        let out_id = self.read_value(input)?;
        let out_label = input.read_str()?;
        let in_id = self.read_value(input)?;
        let in_label = input.read_str()?;
        let properties = self.read_string_pairs(input)?;
        Ok(Edge {
            id,
            label,
            out_id,
            out_label,
            in_id,
            in_label,
            properties,
        })
    }

    fn read_tree(&self, input: &mut WireReader) -> Result<Tree, Error> {
        let count = input.read_u32()? as usize;
        let mut tree = Tree::new();
        for _ in 0..count {
            let key = self.read_value(input)?;
            let child = self.read_tree(input)?;
            *tree.insert(key) = child;
        }
        Ok(tree)
    }

    fn read_string_pairs(&self, input: &mut WireReader) -> Result<Vec<(String, Value)>, Error> {
        let count = input.read_u32()? as usize;
        let mut pairs = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let key = input.read_str()?;
            let value = self.read_value(input)?;
            pairs.push((key, value));
        }
        Ok(pairs)
    }
}

impl Default for MessageCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MessageCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageCodec")
            .field(
                "serialize_result_to_string",
                &self.serialize_result_to_string,
            )
            .field("buffer_size", &self.buffer_size)
            .finish_non_exhaustive()
    }
}

fn read_uuid(input: &mut WireReader) -> Result<Uuid, Error> {
    let raw = input.read_exact(16)?;
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&raw);
    Ok(Uuid::from_bytes(bytes))
}

/// Rewrite a value into its canonical text form for text result mode.
///
/// Collections and maps keep their shape with converted contents; every
/// other value, nulls included, becomes its display string.
fn to_text_form(value: &Value) -> Value {
    match value {
        Value::List(items) => Value::List(items.iter().map(to_text_form).collect()),
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (to_text_form(k), to_text_form(v)))
                .collect(),
        ),
        other => Value::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Vertex, VertexProperty};
    use crate::value::CustomValue;

    fn roundtrip(data: Value) -> Value {
        let codec = MessageCodec::new();
        let response = ResponseMessage::build(Uuid::new_v4()).result(data).create();
        let bytes = codec.serialize_response(&response).unwrap();
        let decoded = codec.deserialize_response(bytes).unwrap();
        decoded.result.data.unwrap()
    }

    #[test]
    fn test_scalar_roundtrips() {
        let values = vec![
            Value::Bool(true),
            Value::Int8(-8),
            Value::Int16(-300),
            Value::Int32(-70_000),
            Value::Int64(i64::MAX),
            Value::UInt8(200),
            Value::UInt16(60_000),
            Value::UInt32(4_000_000_000),
            Value::UInt64(u64::MAX),
            Value::Float32(1.5),
            Value::Float64(std::f64::consts::PI),
            Value::String("hello world".into()),
            Value::Uuid(Uuid::new_v4()),
            Value::Timestamp(1_704_067_200_000_000),
        ];

        for value in values {
            assert_eq!(roundtrip(value.clone()), value);
        }
    }

    #[test]
    fn test_nested_list_and_map_roundtrip() {
        let mut inner = ValueMap::new();
        inner.insert("a", "b");

        let mut map = ValueMap::new();
        map.insert("x", 1i32);
        map.insert("y", "some");
        map.insert("z", Value::Map(inner.clone()));

        let decoded = roundtrip(Value::Map(map.clone()));
        assert_eq!(decoded, Value::Map(map));

        let list = Value::List(vec![
            Value::String("x".into()),
            Value::Int32(5),
            Value::Map(inner),
        ]);
        assert_eq!(roundtrip(list.clone()), list);
    }

    #[test]
    fn test_map_entry_with_element_key_roundtrip() {
        let vertex = Vertex::new(1i64).with_property("name", "marko");
        let entries = Value::List(vec![
            Value::from(MapEntry::new("x", 1i32)),
            Value::from(MapEntry::new(Value::Vertex(Box::new(vertex)), 100i32)),
            Value::from(MapEntry::new(
                Value::Timestamp(1_700_000_000_000_000),
                "test",
            )),
        ]);
        assert_eq!(roundtrip(entries.clone()), entries);
    }

    #[test]
    fn test_vertex_with_embedded_collections_roundtrip() {
        let mut map = ValueMap::new();
        map.insert("x", 500i32);
        map.insert("y", "some");

        let friends = Value::List(vec![
            Value::String("x".into()),
            Value::Int32(5),
            Value::Map(map),
        ]);
        let vertex = Vertex::new(0i64).with_property("friends", friends);

        let decoded = roundtrip(Value::List(vec![Value::Vertex(Box::new(vertex.clone()))]));
        let Value::List(items) = decoded else {
            panic!("expected list");
        };
        assert_eq!(items, vec![Value::Vertex(Box::new(vertex))]);
    }

    #[test]
    fn test_vertex_meta_properties_roundtrip() {
        let vertex = Vertex::new("v1").with_label("person").with_properties(
            "location",
            vec![
                VertexProperty::new("brussels").with_meta("from", 2004i32),
                VertexProperty::new("santa fe").with_meta("from", 2005i32),
            ],
        );
        assert_eq!(roundtrip(Value::Vertex(Box::new(vertex.clone()))), Value::Vertex(Box::new(vertex)));
    }

    #[test]
    fn test_edge_roundtrip() {
        let edge = Edge::new(7i64, "knows", 1i64, 2i64)
            .with_out_label("person")
            .with_in_label("person")
            .with_property("abc", 123i32);
        assert_eq!(roundtrip(Value::Edge(Box::new(edge.clone()))), Value::Edge(Box::new(edge)));
    }

    #[test]
    fn test_tree_roundtrip() {
        let mut tree = Tree::new();
        let josh = tree.insert("marko").insert("josh");
        josh.insert("lop");
        josh.insert("ripple");

        let decoded = roundtrip(Value::Tree(tree.clone()));
        assert_eq!(decoded, Value::Tree(tree));
    }

    #[test]
    fn test_text_form_conversion() {
        let list = Value::List(vec![Value::Int32(1), Value::Null, Value::Int32(100)]);
        let text = to_text_form(&list);
        assert_eq!(
            text,
            Value::List(vec![
                Value::String("1".into()),
                Value::String("null".into()),
                Value::String("100".into()),
            ])
        );

        let mut map = ValueMap::new();
        map.insert(1i32, Value::Null);
        let Value::Map(converted) = to_text_form(&Value::Map(map)) else {
            panic!("expected map");
        };
        assert_eq!(
            converted.get(&Value::String("1".into())),
            Some(&Value::String("null".into()))
        );
    }

    #[test]
    fn test_unregistered_custom_kind_fails_encode() {
        let codec = MessageCodec::new();
        let response = ResponseMessage::build(Uuid::new_v4())
            .result(Value::Custom(CustomValue::new("color", vec![1])))
            .create();

        let err = codec.serialize_response(&response).unwrap_err();
        assert!(matches!(err, Error::Unresolvable(_)));
        assert!(err.to_string().contains("color"));
    }

    #[test]
    fn test_unknown_tag_fails_decode() {
        let codec = MessageCodec::new();
        let mut out = WireBuffer::with_capacity(64);
        out.write_atomic(Uuid::new_v4().as_bytes()).unwrap();
        out.write_u16(200).unwrap();
        out.write_str("").unwrap();
        out.write_u32(0).unwrap();
        out.write_u32(0).unwrap();
        out.write_i16(9999).unwrap(); // no such registration

        let err = codec.deserialize_response(out.freeze()).unwrap_err();
        assert!(matches!(err, Error::MalformedStream(_)));
    }

    #[test]
    fn test_unknown_status_code_fails_decode() {
        let codec = MessageCodec::new();
        let mut out = WireBuffer::with_capacity(64);
        out.write_atomic(Uuid::new_v4().as_bytes()).unwrap();
        out.write_u16(777).unwrap();

        let err = codec.deserialize_response(out.freeze()).unwrap_err();
        assert!(matches!(err, Error::MalformedStream(_)));
        assert!(err.to_string().contains("777"));
    }

    #[test]
    fn test_trailing_bytes_fail_decode() {
        let codec = MessageCodec::new();
        let response = ResponseMessage::build(Uuid::new_v4()).create();
        let bytes = codec.serialize_response(&response).unwrap();

        let mut extended = bytes.to_vec();
        extended.push(0);
        let err = codec
            .deserialize_response(Bytes::from(extended))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedStream(_)));
    }

    #[test]
    fn test_mime_header() {
        let codec = MessageCodec::new();
        let request = RequestMessage::build("eval").create();
        let bytes = codec.serialize_request(&request).unwrap();

        let mut reader = WireReader::new(bytes);
        let mime = read_mime_header(&mut reader).unwrap();
        assert_eq!(mime, MIME_TYPE);
    }

    #[test]
    fn test_mime_header_length_mismatch() {
        let mut reader = WireReader::new(Bytes::from_static(&[10, b'a', b'b']));
        let err = read_mime_header(&mut reader).unwrap_err();
        assert!(matches!(err, Error::MalformedStream(_)));
    }

    #[test]
    fn test_empty_op_fails_decode() {
        let codec = MessageCodec::new();
        let mut out = WireBuffer::with_capacity(64);
        out.write_atomic(Uuid::new_v4().as_bytes()).unwrap();
        out.write_str("").unwrap(); // processor
        out.write_str("").unwrap(); // op
        out.write_u32(0).unwrap();

        let err = codec.deserialize_request(out.freeze()).unwrap_err();
        assert!(matches!(err, Error::MalformedStream(_)));
    }
}
