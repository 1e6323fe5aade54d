//! [`Node`]: construction, navigation and mutation.

use std::io::Read;

use crate::codec::{self, EncodeOptions, Format};
use crate::error::Result;
use crate::value::{Mapping, Value};

/// A navigable handle onto one value of a document tree.
///
/// Navigation never fails: looking up something that is not there yields a
/// node wrapping [`Value::Null`], and the failure only shows up once a typed
/// extractor is called on it. This keeps deep lookups into optional
/// configuration short:
///
/// ```
/// use simple_doc::Node;
///
/// let doc = Node::from_slice(b"server: {port: 8080}").unwrap();
/// assert_eq!(doc.get_path(["server", "port"]).as_int().unwrap(), 8080);
/// assert_eq!(doc.get_path(["server", "host"]).must_string_or("localhost".into()), "localhost");
/// ```
///
/// Nodes reached by navigating to the same mapping or sequence share its
/// storage, so [`Node::set`] and [`Node::delete`] on one are observed by the
/// others and by the root.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    value: Value,
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    /// Creates a document whose root is an empty mapping.
    pub fn new() -> Self {
        Self::from_value(Mapping::new())
    }

    pub fn from_value(value: impl Into<Value>) -> Self {
        Node {
            value: value.into(),
        }
    }

    /// Decodes a YAML document. JSON input is accepted as well, being a
    /// subset of YAML. Of a multi-document stream only the first document is
    /// kept.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::from_slice_as(bytes, Format::Yaml)
    }

    pub fn from_slice_as(bytes: &[u8], format: Format) -> Result<Self> {
        codec::decode(bytes, format).map(Node::from_value)
    }

    /// Reads `reader` to the end and decodes the bytes as YAML, keeping the
    /// first document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_as(reader, Format::Yaml)
    }

    pub fn from_reader_as<R: Read>(mut reader: R, format: Format) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_slice_as(&bytes, format)
    }

    /// Encodes the wrapped value as YAML.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        self.encode(&EncodeOptions::default())
    }

    pub fn encode(&self, options: &EncodeOptions) -> Result<Vec<u8>> {
        codec::encode(&self.value, options)
    }

    /// The wrapped value. Containers are shared with the tree.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    fn null() -> Self {
        Node { value: Value::Null }
    }

    /// Looks up `key` when the value is a mapping. Anything else, including
    /// a missing key, yields a null node.
    pub fn get(&self, key: &str) -> Node {
        self.check_get(key).unwrap_or_else(Node::null)
    }

    /// Like [`Node::get`], but tells an absent key (`None`) apart from a key
    /// that is present with a null value (`Some` of a null node).
    pub fn check_get(&self, key: &str) -> Option<Node> {
        match &self.value {
            Value::Mapping(map) => map.get(key).map(Node::from_value),
            _ => None,
        }
    }

    /// Looks up element `index` when the value is a sequence, yielding a null
    /// node otherwise.
    pub fn get_index(&self, index: usize) -> Node {
        match &self.value {
            Value::Sequence(seq) => seq.get(index).map_or_else(Node::null, Node::from_value),
            _ => Node::null(),
        }
    }

    /// Follows `path` with repeated [`Node::get`] calls. An empty path
    /// returns a clone of `self`.
    pub fn get_path<I, K>(&self, path: I) -> Node
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut current = self.clone();
        for key in path {
            current = current.get(key.as_ref());
            if current.is_null() {
                return current;
            }
        }
        current
    }

    /// Inserts or overwrites `key` when the value is a mapping. Does nothing
    /// on any other value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        if let Value::Mapping(map) = &self.value {
            map.insert(key, value);
        }
    }

    /// Writes `value` at `path`, creating mappings along the way.
    ///
    /// The receiver and every intermediate step that is missing or not a
    /// mapping are replaced by an empty mapping, discarding what was there.
    /// With an empty path the receiver's own value is replaced.
    ///
    /// Replacing the receiver's value only affects this node: when `self` was
    /// obtained by navigation from a parent holding a scalar, the parent
    /// still holds that scalar.
    pub fn set_path<I, K>(&mut self, path: I, value: impl Into<Value>)
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut keys = path.into_iter().peekable();
        if keys.peek().is_none() {
            self.value = value.into();
            return;
        }

        let mut current = match &self.value {
            Value::Mapping(map) => map.clone(),
            other => {
                tracing::trace!(kind = other.kind(), "replacing non-mapping root for set_path");
                let map = Mapping::new();
                self.value = Value::Mapping(map.clone());
                map
            }
        };

        while let Some(key) = keys.next() {
            if keys.peek().is_none() {
                current.insert(key.as_ref(), value);
                return;
            }
            current = current.child_mapping(key.as_ref());
        }
    }

    /// Removes `key` when the value is a mapping, returning the removed
    /// value. Does nothing otherwise.
    pub fn delete(&self, key: &str) -> Option<Value> {
        match &self.value {
            Value::Mapping(map) => map.remove(key),
            _ => None,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::from_value(value)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        node.value
    }
}
