//! Detached graph element views and traversal trees.
//!
//! These types are snapshots: they carry ids, labels and property data but
//! no reference to a storage engine. Decoding a message containing them
//! never requires a live graph backend.

use crate::value::Value;
use std::fmt;

/// A detached vertex view.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// Element id. Graph backends use varying id types, so this is a value.
    pub id: Value,
    /// Vertex label.
    pub label: String,
    /// Properties, keyed by name. Each key may hold several properties
    /// (list/set cardinality), each with its own meta-properties.
    pub properties: Vec<(String, Vec<VertexProperty>)>,
}

/// Default label for vertices created without one.
pub const DEFAULT_VERTEX_LABEL: &str = "vertex";

impl Vertex {
    /// Create a vertex with the default label and no properties.
    pub fn new(id: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            label: DEFAULT_VERTEX_LABEL.to_string(),
            properties: Vec::new(),
        }
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add a single-cardinality property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .push((key.into(), vec![VertexProperty::new(value)]));
        self
    }

    /// Add a property with explicit cardinality.
    pub fn with_properties(
        mut self,
        key: impl Into<String>,
        properties: Vec<VertexProperty>,
    ) -> Self {
        self.properties.push((key.into(), properties));
        self
    }

    /// First property value for a key, if present.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, props)| props.first())
            .map(|p| &p.value)
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v[{}]", self.id)
    }
}

/// One property of a vertex: a value plus optional meta-properties.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexProperty {
    /// The property value.
    pub value: Value,
    /// Meta-properties attached to this property.
    pub properties: Vec<(String, Value)>,
}

impl VertexProperty {
    /// Create a property with no meta-properties.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            properties: Vec::new(),
        }
    }

    /// Attach a meta-property.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }
}

/// A detached edge view.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Element id.
    pub id: Value,
    /// Edge label.
    pub label: String,
    /// Out-vertex (tail) id.
    pub out_id: Value,
    /// Out-vertex label.
    pub out_label: String,
    /// In-vertex (head) id.
    pub in_id: Value,
    /// In-vertex label.
    pub in_label: String,
    /// Edge properties.
    pub properties: Vec<(String, Value)>,
}

impl Edge {
    /// Create an edge between two vertices with default vertex labels.
    pub fn new(
        id: impl Into<Value>,
        label: impl Into<String>,
        out_id: impl Into<Value>,
        in_id: impl Into<Value>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            out_id: out_id.into(),
            out_label: DEFAULT_VERTEX_LABEL.to_string(),
            in_id: in_id.into(),
            in_label: DEFAULT_VERTEX_LABEL.to_string(),
            properties: Vec::new(),
        }
    }

    /// Set the out-vertex label.
    pub fn with_out_label(mut self, label: impl Into<String>) -> Self {
        self.out_label = label.into();
        self
    }

    /// Set the in-vertex label.
    pub fn with_in_label(mut self, label: impl Into<String>) -> Self {
        self.in_label = label.into();
        self
    }

    /// Add a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }

    /// Property value for a key, if present.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "e[{}][{}-{}->{}]",
            self.id, self.out_id, self.label, self.in_id
        )
    }
}

/// A recursive traversal tree.
///
/// Each node maps branch keys (arbitrary values) to child trees. Equality
/// is structural: same keys with equal subtrees, regardless of branch
/// order or how the tree was assembled.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    branches: Vec<(Value, Tree)>,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a branch key and return its child tree, merging with an
    /// existing branch when a structurally equal key is already present.
    pub fn insert(&mut self, key: impl Into<Value>) -> &mut Tree {
        let key = key.into();
        let idx = match self.branches.iter().position(|(k, _)| *k == key) {
            Some(i) => i,
            None => {
                self.branches.push((key, Tree::new()));
                self.branches.len() - 1
            }
        };
        &mut self.branches[idx].1
    }

    /// Child tree for a structurally equal branch key.
    pub fn get(&self, key: &Value) -> Option<&Tree> {
        self.branches.iter().find(|(k, _)| k == key).map(|(_, t)| t)
    }

    /// Child tree for a string branch key.
    pub fn get_str(&self, key: &str) -> Option<&Tree> {
        self.get(&Value::String(key.to_string()))
    }

    /// Whether a branch key is present.
    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    /// Number of branches at this node.
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Whether this node is a leaf.
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Iterate branches in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(Value, Tree)> {
        self.branches.iter()
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        // Branch keys are unique within a node, so equal length plus
        // one-way containment gives structural equality.
        self.branches.len() == other.branches.len()
            && self
                .branches
                .iter()
                .all(|(k, t)| other.get(k) == Some(t))
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, child)) in self.branches.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {child}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_properties() {
        let v = Vertex::new(1i64)
            .with_label("person")
            .with_property("name", "marko")
            .with_property("age", 29i32);

        assert_eq!(v.label, "person");
        assert_eq!(v.value("name"), Some(&Value::String("marko".into())));
        assert_eq!(v.value("age"), Some(&Value::Int32(29)));
        assert_eq!(v.value("missing"), None);
    }

    #[test]
    fn test_vertex_meta_properties() {
        let v = Vertex::new(1i64).with_properties(
            "location",
            vec![
                VertexProperty::new("brussels").with_meta("from", 2004i32),
                VertexProperty::new("santa fe").with_meta("from", 2005i32),
            ],
        );

        let (_, props) = &v.properties[0];
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].properties[0], ("from".into(), Value::Int32(2004)));
    }

    #[test]
    fn test_edge_construction() {
        let e = Edge::new(7i64, "knows", 1i64, 2i64)
            .with_out_label("person")
            .with_in_label("person")
            .with_property("weight", 0.5f64);

        assert_eq!(e.label, "knows");
        assert_eq!(e.out_id, Value::Int64(1));
        assert_eq!(e.in_id, Value::Int64(2));
        assert_eq!(e.value("weight"), Some(&Value::Float64(0.5)));
    }

    #[test]
    fn test_tree_insert_merges_equal_keys() {
        let mut tree = Tree::new();
        tree.insert("marko").insert("josh").insert("lop");
        tree.insert("marko").insert("josh").insert("ripple");

        assert_eq!(tree.len(), 1);
        let josh = tree.get_str("marko").unwrap().get_str("josh").unwrap();
        assert_eq!(josh.len(), 2);
        assert!(josh.contains_key(&Value::from("lop")));
        assert!(josh.contains_key(&Value::from("ripple")));
    }

    #[test]
    fn test_tree_structural_equality() {
        let mut a = Tree::new();
        let marko = a.insert("marko");
        marko.insert("josh");
        marko.insert("peter");

        let mut b = Tree::new();
        let marko = b.insert("marko");
        marko.insert("peter");
        marko.insert("josh");

        assert_eq!(a, b);

        let mut c = Tree::new();
        c.insert("marko").insert("josh");
        assert_ne!(a, c);
    }
}
