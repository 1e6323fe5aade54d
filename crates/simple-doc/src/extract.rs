//! Typed extraction without coercion.
//!
//! Every accessor succeeds only when the wrapped value has exactly the
//! requested shape and fails with [`Error::TypeMismatch`] otherwise. The
//! numeric accessors, which do coerce, are defined next to this module.

use crate::error::{Error, Result};
use crate::node::Node;
use crate::value::{Mapping, Sequence, Value};

pub(crate) fn mismatch(expected: &'static str, found: &Value) -> Error {
    Error::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

impl Node {
    /// The mapping handle. Mutating it mutates the tree.
    pub fn as_mapping(&self) -> Result<Mapping> {
        match self.value() {
            Value::Mapping(map) => Ok(map.clone()),
            other => Err(mismatch("mapping", other)),
        }
    }

    /// The sequence handle. Mutating it mutates the tree.
    pub fn as_sequence(&self) -> Result<Sequence> {
        match self.value() {
            Value::Sequence(seq) => Ok(seq.clone()),
            other => Err(mismatch("sequence", other)),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self.value() {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch("bool", other)),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self.value() {
            Value::String(s) => Ok(s),
            other => Err(mismatch("string", other)),
        }
    }

    pub fn as_string(&self) -> Result<String> {
        self.as_str().map(str::to_string)
    }

    /// Raw bytes of a string value. Values decoded from a `!!binary` tag are
    /// accepted as well.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self.value() {
            Value::String(s) => Ok(s.as_bytes()),
            Value::Bytes(b) => Ok(b),
            other => Err(mismatch("bytes", other)),
        }
    }

    /// A sequence of strings. Null elements become empty strings; any other
    /// non-string element fails the whole call.
    pub fn as_string_sequence(&self) -> Result<Vec<String>> {
        let seq = self.as_sequence()?;
        seq.to_vec()
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                Value::Null => Ok(String::new()),
                other => Err(mismatch("string sequence", &other)),
            })
            .collect()
    }

    /// Extracts any type implementing [`Extract`].
    pub fn extract<T: Extract>(&self) -> Result<T> {
        T::extract(self)
    }
}

/// Types that can be pulled out of a [`Node`].
///
/// Implemented for every shape the named accessors return; it backs the
/// generic [`Node::extract`] and the total extractors in [`crate::must`].
pub trait Extract: Sized {
    /// Short name used in misuse diagnostics, e.g. `"int"` for `must_int`.
    const NAME: &'static str;

    fn extract(node: &Node) -> Result<Self>;
}

macro_rules! impl_extract {
    ($($ty:ty => $name:literal, $accessor:ident;)*) => {
        $(impl Extract for $ty {
            const NAME: &'static str = $name;

            fn extract(node: &Node) -> Result<Self> {
                node.$accessor().map(Into::into)
            }
        })*
    };
}

impl_extract! {
    Mapping => "mapping", as_mapping;
    Sequence => "sequence", as_sequence;
    bool => "bool", as_bool;
    String => "string", as_str;
    Vec<u8> => "bytes", as_bytes;
    Vec<String> => "string_sequence", as_string_sequence;
    f64 => "f64", as_f64;
    isize => "int", as_int;
    i64 => "i64", as_i64;
    u64 => "u64", as_u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_shapes() {
        assert!(Node::from_value(true).as_bool().unwrap());
        assert_eq!(Node::from_value("abc").as_str().unwrap(), "abc");
        assert_eq!(Node::from_value("abc").as_string().unwrap(), "abc");
        assert_eq!(Node::from_value("abc").as_bytes().unwrap(), b"abc");
        assert_eq!(Node::from_value(vec![0u8, 255]).as_bytes().unwrap(), &[0u8, 255]);
        assert!(Node::new().as_mapping().unwrap().is_empty());
        assert_eq!(Node::from_value(Sequence::new()).as_sequence().unwrap().len(), 0);
    }

    #[test]
    fn test_no_implicit_coercion() {
        let int = Node::from_value(10);
        assert!(matches!(
            int.as_bool(),
            Err(Error::TypeMismatch { expected: "bool", found: "int" })
        ));
        assert!(int.as_str().is_err());
        assert!(Node::from_value(vec![0u8]).as_str().is_err());
        assert!(Node::from_value(Value::Null).as_mapping().is_err());
        assert!(Node::from_value("x").as_sequence().is_err());
    }

    #[test]
    fn test_bytes_rejects_sequence() {
        let node = Node::from_value(["a", "b"].into_iter().collect::<Value>());
        assert!(node.as_bytes().is_err());
    }

    #[test]
    fn test_string_sequence_null_becomes_empty() {
        let node = Node::from_value(vec![Value::from("abc"), Value::Null, Value::from("efg")]);
        assert_eq!(node.as_string_sequence().unwrap(), vec!["abc", "", "efg"]);
    }

    #[test]
    fn test_string_sequence_rejects_other_elements() {
        let node = Node::from_value(vec![Value::from("abc"), Value::from(1)]);
        assert!(matches!(
            node.as_string_sequence(),
            Err(Error::TypeMismatch { found: "int", .. })
        ));
        assert!(Node::from_value("abc").as_string_sequence().is_err());
    }

    #[test]
    fn test_mapping_handle_aliases_tree() {
        let doc = Node::new();
        doc.as_mapping().unwrap().insert("k", "v");
        assert_eq!(doc.get("k").as_str().unwrap(), "v");
    }

    #[test]
    fn test_generic_extract() {
        let node = Node::from_value(vec![Value::from("a")]);
        assert_eq!(node.extract::<Vec<String>>().unwrap(), vec!["a"]);
        assert!(node.extract::<bool>().is_err());
        assert_eq!(Node::from_value("s").extract::<Vec<u8>>().unwrap(), b"s".to_vec());
    }
}
