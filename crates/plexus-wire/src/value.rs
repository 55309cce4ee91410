//! Runtime value types for protocol messages.

use crate::graph::{Edge, Tree, Vertex};
use std::fmt;
use uuid::Uuid;

/// A runtime value that can be serialized over the wire.
///
/// This enum is the closed set of kinds the codec understands. Every value
/// reachable from a request argument or a response result (including map
/// keys and nested property values) maps to exactly one variant here, with
/// [`Value::Custom`] as the extension point for application-registered
/// kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 8-bit signed integer.
    Int8(i8),
    /// 16-bit signed integer.
    Int16(i16),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 8-bit unsigned integer.
    UInt8(u8),
    /// 16-bit unsigned integer.
    UInt16(u16),
    /// 32-bit unsigned integer.
    UInt32(u32),
    /// 64-bit unsigned integer.
    UInt64(u64),
    /// 32-bit floating point.
    Float32(f32),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string.
    String(String),
    /// UUID.
    Uuid(Uuid),
    /// Timestamp as microseconds since Unix epoch.
    Timestamp(i64),
    /// Ordered sequence of values. Order is preserved on the wire.
    List(Vec<Value>),
    /// Mapping of value to value. Keys may be any value, including graph
    /// elements and timestamps.
    Map(ValueMap),
    /// A detached key/value pair.
    Entry(Box<MapEntry>),
    /// A detached vertex view.
    Vertex(Box<Vertex>),
    /// A detached edge view.
    Edge(Box<Edge>),
    /// A recursive traversal tree.
    Tree(Tree),
    /// An application-registered kind, encoded by its extension codec.
    Custom(CustomValue),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as i64, widening smaller signed integers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int8(i) => Some(*i as i64),
            Value::Int16(i) => Some(*i as i64),
            Value::Int32(i) => Some(*i as i64),
            Value::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as f64, widening f32.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float32(f) => Some(*f as f64),
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as UUID.
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Try to get as a list slice.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get as a map reference.
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Try to get as a tree reference.
    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Value::Tree(tree) => Some(tree),
            _ => None,
        }
    }
}

/// A mapping of values to values with structural key equality.
///
/// Backed by an insertion-ordered pair list rather than a hash map so that
/// keys without `Eq`/`Hash` (floats, graph elements, timestamps) work as
/// map keys. Lookup is a linear scan against the key's own structural
/// equality. Equality between maps is order-insensitive.
#[derive(Debug, Clone, Default)]
pub struct ValueMap {
    entries: Vec<(Value, Value)>,
}

impl ValueMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair, replacing the value for a structurally
    /// equal key.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a value by structurally equal key.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up a value by string key.
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.get(&Value::String(key.to_string()))
    }

    /// Whether a structurally equal key is present.
    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> {
        self.entries.iter()
    }
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        // Keys are unique within a map, so equal length plus one-way
        // containment implies equality regardless of entry order.
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k) == Some(v))
    }
}

impl FromIterator<(Value, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// A detached map entry, serialized as a standalone pair.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    /// Entry key. Need not be a primitive.
    pub key: Value,
    /// Entry value.
    pub value: Value,
}

impl MapEntry {
    /// Create a new entry.
    pub fn new(key: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An application-defined value outside the core model.
///
/// The codec does not interpret the payload; the extension codec
/// registered for `kind` owns its wire layout.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomValue {
    /// The registered kind name.
    pub kind: String,
    /// Opaque application payload.
    pub data: Vec<u8>,
}

impl CustomValue {
    /// Create a custom value of the given kind.
    pub fn new(kind: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }
}

impl fmt::Display for Value {
    /// The canonical text form used by text result mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::UInt8(v) => write!(f, "{v}"),
            Value::UInt16(v) => write!(f, "{v}"),
            Value::UInt32(v) => write!(f, "{v}"),
            Value::UInt64(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Uuid(u) => write!(f, "{u}"),
            Value::Timestamp(t) => write!(f, "{t}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Entry(entry) => write!(f, "{}={}", entry.key, entry.value),
            Value::Vertex(v) => write!(f, "{v}"),
            Value::Edge(e) => write!(f, "{e}"),
            Value::Tree(t) => write!(f, "{t}"),
            Value::Custom(c) => write!(f, "{}[{} bytes]", c.kind, c.data.len()),
        }
    }
}

// Conversion implementations
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Int8(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::UInt8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::UInt16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<ValueMap> for Value {
    fn from(v: ValueMap) -> Self {
        Value::Map(v)
    }
}

impl From<MapEntry> for Value {
    fn from(v: MapEntry) -> Self {
        Value::Entry(Box::new(v))
    }
}

impl From<Vertex> for Value {
    fn from(v: Vertex) -> Self {
        Value::Vertex(Box::new(v))
    }
}

impl From<Edge> for Value {
    fn from(v: Edge) -> Self {
        Value::Edge(Box::new(v))
    }
}

impl From<Tree> for Value {
    fn from(v: Tree) -> Self {
        Value::Tree(v)
    }
}

impl From<CustomValue> for Value {
    fn from(v: CustomValue) -> Self {
        Value::Custom(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}
