//! Helpers for the `doc-get` binary.

use crate::codec::{EncodeOptions, Format};
use crate::error::Result;
use crate::node::Node;

/// One navigation step: sequences are indexed when the key parses as an
/// index, everything else goes through [`Node::get`].
fn step(node: &Node, key: &str) -> Node {
    if node.as_sequence().is_ok() {
        if let Ok(index) = key.parse::<usize>() {
            return node.get_index(index);
        }
    }
    node.get(key)
}

/// Decodes `input`, walks `path` and returns the subtree encoded in the same
/// format. A missing subtree is printed as null.
pub fn lookup_path(input: &str, format: Format, pretty: bool, path: &[String]) -> Result<String> {
    let root = Node::from_slice_as(input.as_bytes(), format)?;
    let found = path.iter().fold(root, |node, key| step(&node, key));
    let bytes = found.encode(&EncodeOptions::new(format).pretty(pretty))?;
    Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
}
