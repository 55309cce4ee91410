//! Type registry: the complete set of kind-to-codec bindings.
//!
//! The registry is built once at codec configuration time, seeded with the
//! built-in kinds and extended by named providers, then frozen behind an
//! `Arc`. Individual encode/decode calls only read it.

use crate::buffer::{WireBuffer, WireReader};
use crate::error::Error;
use crate::resolver::ResolverFactory;
use crate::value::{CustomValue, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Stable wire tags for the built-in kinds.
///
/// Tags are part of the protocol: they must not change within a protocol
/// version. Extension kinds are assigned tags from
/// [`tags::FIRST_EXTENSION`] upward in registration order.
pub mod tags {
    pub const NULL: i16 = 1;
    pub const BOOL: i16 = 2;
    pub const INT8: i16 = 3;
    pub const INT16: i16 = 4;
    pub const INT32: i16 = 5;
    pub const INT64: i16 = 6;
    pub const UINT8: i16 = 7;
    pub const UINT16: i16 = 8;
    pub const UINT32: i16 = 9;
    pub const UINT64: i16 = 10;
    pub const FLOAT32: i16 = 11;
    pub const FLOAT64: i16 = 12;
    pub const STRING: i16 = 13;
    pub const UUID: i16 = 14;
    pub const TIMESTAMP: i16 = 15;
    pub const LIST: i16 = 16;
    pub const MAP: i16 = 17;
    pub const ENTRY: i16 = 18;
    pub const VERTEX: i16 = 19;
    pub const EDGE: i16 = 20;
    pub const TREE: i16 = 21;

    /// First tag handed out to extension kinds.
    pub const FIRST_EXTENSION: i16 = 128;
}

/// Identity of an encodable kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Null,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    Uuid,
    Timestamp,
    List,
    Map,
    Entry,
    Vertex,
    Edge,
    Tree,
    /// An extension kind, identified by its registered name.
    Custom(String),
}

impl TypeKey {
    /// The kind of a runtime value.
    pub fn of(value: &Value) -> TypeKey {
        match value {
            Value::Null => TypeKey::Null,
            Value::Bool(_) => TypeKey::Bool,
            Value::Int8(_) => TypeKey::Int8,
            Value::Int16(_) => TypeKey::Int16,
            Value::Int32(_) => TypeKey::Int32,
            Value::Int64(_) => TypeKey::Int64,
            Value::UInt8(_) => TypeKey::UInt8,
            Value::UInt16(_) => TypeKey::UInt16,
            Value::UInt32(_) => TypeKey::UInt32,
            Value::UInt64(_) => TypeKey::UInt64,
            Value::Float32(_) => TypeKey::Float32,
            Value::Float64(_) => TypeKey::Float64,
            Value::String(_) => TypeKey::String,
            Value::Uuid(_) => TypeKey::Uuid,
            Value::Timestamp(_) => TypeKey::Timestamp,
            Value::List(_) => TypeKey::List,
            Value::Map(_) => TypeKey::Map,
            Value::Entry(_) => TypeKey::Entry,
            Value::Vertex(_) => TypeKey::Vertex,
            Value::Edge(_) => TypeKey::Edge,
            Value::Tree(_) => TypeKey::Tree,
            Value::Custom(c) => TypeKey::Custom(c.kind.clone()),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKey::Null => "null",
            TypeKey::Bool => "bool",
            TypeKey::Int8 => "int8",
            TypeKey::Int16 => "int16",
            TypeKey::Int32 => "int32",
            TypeKey::Int64 => "int64",
            TypeKey::UInt8 => "uint8",
            TypeKey::UInt16 => "uint16",
            TypeKey::UInt32 => "uint32",
            TypeKey::UInt64 => "uint64",
            TypeKey::Float32 => "float32",
            TypeKey::Float64 => "float64",
            TypeKey::String => "string",
            TypeKey::Uuid => "uuid",
            TypeKey::Timestamp => "timestamp",
            TypeKey::List => "list",
            TypeKey::Map => "map",
            TypeKey::Entry => "entry",
            TypeKey::Vertex => "vertex",
            TypeKey::Edge => "edge",
            TypeKey::Tree => "tree",
            TypeKey::Custom(kind) => return write!(f, "custom:{kind}"),
        };
        write!(f, "{name}")
    }
}

/// The encoder/decoder bound to a kind.
#[derive(Clone)]
pub enum TypeCodec {
    /// A core kind, encoded by the codec's closed dispatch.
    Builtin,
    /// An extension kind, encoded by its registered codec.
    Custom(Arc<dyn CustomCodec>),
}

impl fmt::Debug for TypeCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCodec::Builtin => write!(f, "Builtin"),
            TypeCodec::Custom(codec) => write!(f, "Custom({})", codec.kind()),
        }
    }
}

/// The binding between a kind, its wire tag, and its codec.
#[derive(Debug, Clone)]
pub struct Registration {
    /// The kind this registration covers.
    pub key: TypeKey,
    /// The tag written before the kind's payload.
    pub tag: i16,
    /// The codec for the kind's payload.
    pub codec: TypeCodec,
}

/// Encoder/decoder pair for an extension kind.
///
/// Implementations must be free of mutable shared state: a configured
/// codec may serve concurrent encode/decode calls on different threads.
pub trait CustomCodec: Send + Sync {
    /// The kind name this codec handles.
    fn kind(&self) -> &str;

    /// Encode the payload of `value` (the tag and kind name are already
    /// written by the framework).
    fn encode(&self, value: &CustomValue, out: &mut WireBuffer) -> Result<(), Error>;

    /// Decode a payload previously written by `encode`.
    fn decode(&self, input: &mut WireReader) -> Result<CustomValue, Error>;
}

/// A unit contributing extension kind bindings to a registry.
pub trait ExtensionProvider: Send + Sync {
    /// Register this provider's codecs.
    fn register(&self, registry: &mut TypeRegistry);
}

impl fmt::Debug for dyn ExtensionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExtensionProvider")
    }
}

/// The ordered set of kind-to-codec bindings consulted during encode and
/// decode.
#[derive(Debug)]
pub struct TypeRegistry {
    by_key: HashMap<TypeKey, Registration>,
    by_tag: HashMap<i16, TypeKey>,
    next_extension_tag: i16,
}

impl TypeRegistry {
    /// A registry seeded with every built-in kind.
    pub fn with_builtins() -> Self {
        const BUILTINS: [(TypeKey, i16); 21] = [
            (TypeKey::Null, tags::NULL),
            (TypeKey::Bool, tags::BOOL),
            (TypeKey::Int8, tags::INT8),
            (TypeKey::Int16, tags::INT16),
            (TypeKey::Int32, tags::INT32),
            (TypeKey::Int64, tags::INT64),
            (TypeKey::UInt8, tags::UINT8),
            (TypeKey::UInt16, tags::UINT16),
            (TypeKey::UInt32, tags::UINT32),
            (TypeKey::UInt64, tags::UINT64),
            (TypeKey::Float32, tags::FLOAT32),
            (TypeKey::Float64, tags::FLOAT64),
            (TypeKey::String, tags::STRING),
            (TypeKey::Uuid, tags::UUID),
            (TypeKey::Timestamp, tags::TIMESTAMP),
            (TypeKey::List, tags::LIST),
            (TypeKey::Map, tags::MAP),
            (TypeKey::Entry, tags::ENTRY),
            (TypeKey::Vertex, tags::VERTEX),
            (TypeKey::Edge, tags::EDGE),
            (TypeKey::Tree, tags::TREE),
        ];

        let mut registry = Self {
            by_key: HashMap::new(),
            by_tag: HashMap::new(),
            next_extension_tag: tags::FIRST_EXTENSION,
        };
        for (key, tag) in BUILTINS {
            registry.bind(Registration {
                key,
                tag,
                codec: TypeCodec::Builtin,
            });
        }
        registry
    }

    /// Register an extension codec.
    ///
    /// Idempotent: re-registering a kind keeps its existing tag and swaps
    /// in the new codec, so loading the same provider twice neither
    /// duplicates nor conflicts.
    pub fn register(&mut self, codec: Arc<dyn CustomCodec>) {
        let key = TypeKey::Custom(codec.kind().to_string());
        let tag = match self.by_key.get(&key) {
            Some(existing) => existing.tag,
            None => {
                let tag = self.next_extension_tag;
                self.next_extension_tag += 1;
                tag
            }
        };
        self.bind(Registration {
            key,
            tag,
            codec: TypeCodec::Custom(codec),
        });
    }

    fn bind(&mut self, registration: Registration) {
        self.by_tag.insert(registration.tag, registration.key.clone());
        self.by_key.insert(registration.key.clone(), registration);
    }

    /// Registration for a kind, if bound.
    pub fn registration(&self, key: &TypeKey) -> Option<&Registration> {
        self.by_key.get(key)
    }

    /// Registration for a wire tag, if bound.
    pub fn registration_by_tag(&self, tag: i16) -> Option<&Registration> {
        self.by_tag.get(&tag).and_then(|key| self.by_key.get(key))
    }

    /// Number of bindings, built-ins included.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether the registry holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Constructor for an extension provider.
pub type ProviderFn = fn() -> Arc<dyn ExtensionProvider>;

/// How a named extension provider is built.
///
/// A provider may be supplied through a plain constructor, an `instance`
/// singleton accessor, or a `get_instance` singleton accessor. The slots
/// are tried in exactly that order; a factory with no slot filled is a
/// configuration error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionFactory {
    /// Plain construction.
    pub constructor: Option<ProviderFn>,
    /// Singleton accessor named `instance`.
    pub instance: Option<ProviderFn>,
    /// Singleton accessor named `get_instance`.
    pub get_instance: Option<ProviderFn>,
}

impl ExtensionFactory {
    /// Factory backed by a plain constructor.
    pub fn from_constructor(f: ProviderFn) -> Self {
        Self {
            constructor: Some(f),
            ..Self::default()
        }
    }

    /// Factory backed by an `instance` singleton accessor.
    pub fn from_instance(f: ProviderFn) -> Self {
        Self {
            instance: Some(f),
            ..Self::default()
        }
    }

    /// Factory backed by a `get_instance` singleton accessor.
    pub fn from_get_instance(f: ProviderFn) -> Self {
        Self {
            get_instance: Some(f),
            ..Self::default()
        }
    }

    /// Build the provider, trying constructor, `instance`, then
    /// `get_instance`.
    pub fn instantiate(&self, name: &str) -> Result<Arc<dyn ExtensionProvider>, Error> {
        self.constructor
            .or(self.instance)
            .or(self.get_instance)
            .map(|f| f())
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "extension provider `{name}` supplies no constructor, \
                     `instance`, or `get_instance` accessor"
                ))
            })
    }
}

/// Explicit mapping from configuration names to factories.
///
/// Consulted once at codec construction; unknown names fail configuration
/// rather than falling back to runtime introspection.
#[derive(Debug, Default)]
pub struct FactoryCatalog {
    extensions: HashMap<String, ExtensionFactory>,
    resolvers: HashMap<String, ResolverFactory>,
}

impl FactoryCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extension-provider factory under a name.
    pub fn register_extension(&mut self, name: impl Into<String>, factory: ExtensionFactory) {
        self.extensions.insert(name.into(), factory);
    }

    /// Register a resolver factory under a name.
    pub fn register_resolver(&mut self, name: impl Into<String>, factory: ResolverFactory) {
        self.resolvers.insert(name.into(), factory);
    }

    /// Look up an extension factory.
    pub fn extension(&self, name: &str) -> Result<&ExtensionFactory, Error> {
        self.extensions.get(name).ok_or_else(|| {
            Error::Configuration(format!("unknown extension provider `{name}`"))
        })
    }

    /// Look up a resolver factory.
    pub fn resolver(&self, name: &str) -> Result<&ResolverFactory, Error> {
        self.resolvers.get(name).ok_or_else(|| {
            Error::Configuration(format!("unknown class resolver supplier `{name}`"))
        })
    }
}
