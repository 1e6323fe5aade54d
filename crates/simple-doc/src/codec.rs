//! Decode/encode boundary.
//!
//! Parsing and printing are delegated to `serde_yaml` and `serde_json`; this
//! module only converts their value trees into [`Value`] and back.
//!
//! Conversion rules:
//!
//! - float literals become [`Value::Float`], integers become [`Value::Int`]
//!   when they fit `i64` and [`Value::Uint`] otherwise;
//! - only the first document of a YAML stream is decoded;
//! - YAML null, bool and number keys are turned into strings; sequence,
//!   mapping and tagged keys are rejected. Encoding does not undo this, so
//!   `1: one` comes back out as `'1': one`;
//! - a YAML `!!binary` (or local `!binary`) scalar is base64-decoded into
//!   [`Value::Bytes`], other tags are dropped and their inner value kept;
//! - [`Value::Bytes`] is written as a `!binary` base64 scalar in YAML and as a
//!   plain base64 string in JSON.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use base64::Engine;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::value::{Mapping, Value};

/// Text format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

impl Format {
    /// Guesses the format from a file extension (`yaml`, `yml` or `json`).
    pub fn from_path(path: impl AsRef<Path>) -> Option<Format> {
        let ext = path.as_ref().extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            other => Err(format!("unknown format: {other}")),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
        })
    }
}

/// Options for [`encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    pub format: Format,
    /// Indent JSON output. YAML output is always block style.
    pub pretty: bool,
}

impl EncodeOptions {
    pub fn new(format: Format) -> Self {
        EncodeOptions {
            format,
            pretty: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Decodes a document. For a YAML stream only the first document is read.
pub fn decode(bytes: &[u8], format: Format) -> Result<Value> {
    let result = match format {
        Format::Yaml => parse_yaml(bytes).and_then(|doc| from_yaml(&doc)),
        Format::Json => serde_json::from_slice::<serde_json::Value>(bytes)
            .map_err(Error::from)
            .map(|doc| from_json(&doc)),
    };
    match &result {
        Ok(value) => tracing::debug!(%format, len = bytes.len(), kind = value.kind(), "decoded document"),
        Err(err) => tracing::debug!(%format, len = bytes.len(), error = %err, "failed to decode document"),
    }
    result
}

/// Encodes `value` as text.
pub fn encode(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>> {
    let bytes = match options.format {
        Format::Yaml => serde_yaml::to_string(&to_yaml(value))?.into_bytes(),
        Format::Json => {
            let doc = to_json(value)?;
            if options.pretty {
                serde_json::to_vec_pretty(&doc)?
            } else {
                serde_json::to_vec(&doc)?
            }
        }
    };
    tracing::debug!(format = %options.format, len = bytes.len(), "encoded document");
    Ok(bytes)
}

/// Parses the first document of a YAML stream. An empty stream is null.
fn first_yaml_document(bytes: &[u8]) -> Result<serde_yaml::Value> {
    match serde_yaml::Deserializer::from_slice(bytes).next() {
        Some(doc) => Ok(serde_yaml::Value::deserialize(doc)?),
        None => Ok(serde_yaml::Value::Null),
    }
}

/// serde_yaml resolves the core `!!binary` tag to a plain string. The stream
/// is parsed a second time with the tag spelled as the local `!binary`, which
/// serde_yaml keeps, and the tags found there are moved onto the first parse.
fn parse_yaml(bytes: &[u8]) -> Result<serde_yaml::Value> {
    let mut doc = first_yaml_document(bytes)?;
    let Ok(text) = std::str::from_utf8(bytes) else {
        return Ok(doc);
    };
    if text.contains("!!binary") {
        match first_yaml_document(text.replace("!!binary", "!binary").as_bytes()) {
            Ok(tagged) => restore_binary_tags(&mut doc, &tagged),
            Err(err) => tracing::debug!(error = %err, "binary tag pass failed, keeping plain strings"),
        }
    }
    Ok(doc)
}

/// Walks `doc` and `tagged` in step, wrapping every string of `doc` that sits
/// where `tagged` holds a binary-tagged scalar. Both trees come from the same
/// text and only differ in tags and string contents, so positions line up.
fn restore_binary_tags(doc: &mut serde_yaml::Value, tagged: &serde_yaml::Value) {
    match (doc, tagged) {
        (doc, serde_yaml::Value::Tagged(t)) if doc.is_string() && is_binary_tag(&t.tag) => {
            let payload = std::mem::replace(doc, serde_yaml::Value::Null);
            *doc = serde_yaml::Value::Tagged(Box::new(serde_yaml::value::TaggedValue {
                tag: serde_yaml::value::Tag::new("binary"),
                value: payload,
            }));
        }
        (serde_yaml::Value::Tagged(d), serde_yaml::Value::Tagged(t)) => {
            restore_binary_tags(&mut d.value, &t.value);
        }
        (serde_yaml::Value::Sequence(d), serde_yaml::Value::Sequence(t)) => {
            for (d, t) in d.iter_mut().zip(t) {
                restore_binary_tags(d, t);
            }
        }
        (serde_yaml::Value::Mapping(d), serde_yaml::Value::Mapping(t)) => {
            for (d, t) in d.values_mut().zip(t.values()) {
                restore_binary_tags(d, t);
            }
        }
        _ => {}
    }
}

fn yaml_key(key: &serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Sequence(_) => Err(Error::UnsupportedKey("sequence")),
        serde_yaml::Value::Mapping(_) => Err(Error::UnsupportedKey("mapping")),
        serde_yaml::Value::Tagged(_) => Err(Error::UnsupportedKey("tagged")),
    }
}

fn is_binary_tag(tag: &serde_yaml::value::Tag) -> bool {
    let tag = tag.to_string();
    let name = tag.trim_start_matches('!');
    name == "binary" || name.ends_with(":binary")
}

fn from_yaml(value: &serde_yaml::Value) -> Result<Value> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => {
            if n.is_f64() {
                Value::Float(n.as_f64().unwrap_or_default())
            } else if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                n.as_u64().map_or(Value::Null, Value::Uint)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(items) => {
            let items = items.iter().map(from_yaml).collect::<Result<Vec<_>>>()?;
            Value::Sequence(items.into())
        }
        serde_yaml::Value::Mapping(entries) => {
            let map = Mapping::new();
            for (k, v) in entries {
                map.insert(yaml_key(k)?, from_yaml(v)?);
            }
            Value::Mapping(map)
        }
        serde_yaml::Value::Tagged(tagged) => match &tagged.value {
            serde_yaml::Value::String(payload) if is_binary_tag(&tagged.tag) => {
                let compact: String = payload.split_whitespace().collect();
                Value::Bytes(base64::engine::general_purpose::STANDARD.decode(compact)?)
            }
            inner => from_yaml(inner)?,
        },
    })
}

fn to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Int(i) => serde_yaml::Value::Number((*i).into()),
        Value::Uint(u) => serde_yaml::Value::Number((*u).into()),
        Value::Float(f) => serde_yaml::Value::Number((*f).into()),
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Bytes(b) => serde_yaml::Value::Tagged(Box::new(serde_yaml::value::TaggedValue {
            tag: serde_yaml::value::Tag::new("binary"),
            value: serde_yaml::Value::String(base64::engine::general_purpose::STANDARD.encode(b)),
        })),
        Value::Sequence(seq) => serde_yaml::Value::Sequence(seq.to_vec().iter().map(to_yaml).collect()),
        Value::Mapping(map) => {
            let mut out = serde_yaml::Mapping::new();
            for (k, v) in map.entries() {
                out.insert(serde_yaml::Value::String(k), to_yaml(&v));
            }
            serde_yaml::Value::Mapping(out)
        }
    }
}

fn from_json(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if n.is_f64() {
                Value::Float(n.as_f64().unwrap_or_default())
            } else if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                n.as_u64().map_or(Value::Null, Value::Uint)
            }
        }
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::Sequence(items.iter().map(from_json).collect()),
        serde_json::Value::Object(entries) => Value::Mapping(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), from_json(v)))
                .collect(),
        ),
    }
}

fn to_json(value: &Value) -> Result<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Uint(u) => serde_json::Value::from(*u),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or(Error::NonFiniteFloat(*f))?,
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(b) => {
            serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(b))
        }
        Value::Sequence(seq) => serde_json::Value::Array(
            seq.to_vec().iter().map(to_json).collect::<Result<Vec<_>>>()?,
        ),
        Value::Mapping(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map.entries() {
                out.insert(k, to_json(&v)?);
            }
            serde_json::Value::Object(out)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        decode(text.as_bytes(), Format::Yaml).unwrap()
    }

    #[test]
    fn test_format_parse_and_display() {
        assert_eq!("yml".parse::<Format>().unwrap(), Format::Yaml);
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert!("toml".parse::<Format>().is_err());
        assert_eq!(Format::Json.to_string(), "json");
        assert_eq!(Format::from_path("conf/app.yaml"), Some(Format::Yaml));
        assert_eq!(Format::from_path("data.json"), Some(Format::Json));
        assert_eq!(Format::from_path("README"), None);
    }

    #[test]
    fn test_yaml_numbers() {
        let doc = yaml("int: 10\nfloat: 5.150\nwhole: 3.0\nneg: -4\nbig: 18446744073709551615");
        let Value::Mapping(map) = doc else {
            panic!("Expected mapping");
        };
        assert_eq!(map.get("int"), Some(Value::Int(10)));
        assert_eq!(map.get("float"), Some(Value::Float(5.15)));
        assert_eq!(map.get("whole"), Some(Value::Float(3.0)));
        assert_eq!(map.get("neg"), Some(Value::Int(-4)));
        assert_eq!(map.get("big"), Some(Value::Uint(u64::MAX)));
    }

    #[test]
    fn test_yaml_scalar_keys_become_strings() {
        let Value::Mapping(map) = yaml("1: one\ntrue: yes-value\n") else {
            panic!("Expected mapping");
        };
        assert_eq!(map.get("1"), Some(Value::from("one")));
        assert_eq!(map.get("true"), Some(Value::from("yes-value")));
    }

    #[test]
    fn test_yaml_compound_key_rejected() {
        let err = decode(b"? [a, b]\n: value\n", Format::Yaml).unwrap_err();
        assert!(matches!(err, Error::UnsupportedKey("sequence")));
    }

    #[test]
    fn test_yaml_syntax_error() {
        let err = decode(b"a: [1, 2", Format::Yaml).unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
        assert!(!err.is_type_mismatch());
    }

    #[test]
    fn test_json_decode() {
        let doc = decode(br#"{"b": [1, 2.5, null], "a": "x"}"#, Format::Json).unwrap();
        let Value::Mapping(map) = doc else {
            panic!("Expected mapping");
        };
        assert_eq!(map.keys(), vec!["b".to_string(), "a".to_string()]);
        assert_eq!(
            map.get("b"),
            Some(vec![Value::Int(1), Value::Float(2.5), Value::Null].into())
        );
        assert!(matches!(decode(b"{", Format::Json), Err(Error::Json(_))));
    }

    #[test]
    fn test_json_encode_compact_and_pretty() {
        let map: Mapping = [("a", 1)].into_iter().collect();
        let value = Value::Mapping(map);
        let compact = encode(&value, &EncodeOptions::new(Format::Json)).unwrap();
        assert_eq!(compact, br#"{"a":1}"#);
        let pretty = encode(&value, &EncodeOptions::new(Format::Json).pretty(true)).unwrap();
        assert_eq!(String::from_utf8(pretty).unwrap(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_json_rejects_non_finite_float() {
        let err = encode(&Value::Float(f64::NAN), &EncodeOptions::new(Format::Json)).unwrap_err();
        assert!(matches!(err, Error::NonFiniteFloat(_)));
    }

    #[test]
    fn test_bytes_survive_yaml_round_trip() {
        let map: Mapping = [("blob", Value::Bytes(vec![0, 1, 254, 255]))].into_iter().collect();
        let value = Value::Mapping(map);
        let text = encode(&value, &EncodeOptions::default()).unwrap();
        assert_eq!(decode(&text, Format::Yaml).unwrap(), value);
    }

    #[test]
    fn test_bytes_in_json_are_base64() {
        let encoded = encode(&Value::Bytes(b"hi".to_vec()), &EncodeOptions::new(Format::Json)).unwrap();
        assert_eq!(encoded, br#""aGk=""#);
    }

    #[test]
    fn test_core_binary_tag_decodes_to_bytes() {
        let Value::Mapping(map) = yaml("b: !!binary aGk=\n") else {
            panic!("Expected mapping");
        };
        assert_eq!(map.get("b"), Some(Value::Bytes(b"hi".to_vec())));
    }

    #[test]
    fn test_core_binary_tag_nested_and_block() {
        let text = "note: \"tagged with !!binary\"\nblobs:\n  - !!binary |\n    AAH+/w==\n  - plain\n";
        let Value::Mapping(map) = yaml(text) else {
            panic!("Expected mapping");
        };
        assert_eq!(map.get("note"), Some(Value::from("tagged with !!binary")));
        assert_eq!(
            map.get("blobs"),
            Some(vec![Value::Bytes(vec![0, 1, 254, 255]), Value::from("plain")].into())
        );
    }

    #[test]
    fn test_core_binary_tag_bad_payload() {
        assert!(matches!(
            decode(b"b: !!binary not*base64\n", Format::Yaml),
            Err(Error::Binary(_))
        ));
    }

    #[test]
    fn test_yaml_stream_decodes_first_document() {
        let Value::Mapping(map) = yaml("a: 1\n---\nb: 2\n") else {
            panic!("Expected mapping");
        };
        assert_eq!(map.keys(), vec!["a".to_string()]);
        assert_eq!(yaml(""), Value::Null);
    }

    #[test]
    fn test_scalar_keys_stay_strings_on_encode() {
        let out = encode(&yaml("1: one\n"), &EncodeOptions::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "'1': one\n");
    }

    #[test]
    fn test_yaml_round_trip_keeps_order() {
        let text = "z: 1\na: x\nm:\n  k: true\n  f: 1.5\n";
        let value = yaml(text);
        let out = encode(&value, &EncodeOptions::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), text);
    }
}
