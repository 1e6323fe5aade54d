//! Null-safe access to decoded YAML and JSON documents.
//!
//! A document is decoded into a tree of [`Value`]s and wrapped in a [`Node`].
//! Nodes navigate without failing, extract typed values with a [`Result`],
//! fall back to defaults with the `must_*` family and mutate the tree in
//! place.
//!
//! # Example
//!
//! ```
//! use simple_doc::Node;
//!
//! let doc = Node::from_slice(b"a: {b: 1}").unwrap();
//! assert_eq!(doc.get("a").get("b").as_int().unwrap(), 1);
//! assert!(doc.get("a").get("c").as_int().is_err());
//! assert_eq!(doc.get("a").get("c").must_int_or(42), 42);
//!
//! let mut doc = Node::new();
//! doc.set_path(["x", "y"], "v");
//! assert_eq!(doc.get_path(["x", "y"]).as_str().unwrap(), "v");
//! ```

pub mod cli;
pub mod codec;
mod coerce;
pub mod error;
mod extract;
pub mod must;
mod node;
pub mod value;

pub use codec::{decode, encode, EncodeOptions, Format};
pub use error::{Error, Result};
pub use extract::Extract;
pub use node::Node;
pub use value::{Mapping, Sequence, Value};

/// Version of this crate.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
