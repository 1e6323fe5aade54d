//! Numeric coercion.
//!
//! Decoders pick an integer or a float representation depending on the
//! literal, so every numeric accessor accepts both and converts:
//!
//! - floats convert to integers by truncating toward zero;
//! - integers above `i64::MAX` are accepted by [`Node::as_f64`] and
//!   [`Node::as_u64`], and fail with
//!   [`Error::OutOfRange`](crate::Error::OutOfRange) in the signed accessors;
//! - [`Node::as_u64`] reinterprets negative results as two's-complement
//!   unsigned values, so `-1` and `-1.5` both become `u64::MAX`;
//! - bool, string, bytes, null, sequence and mapping values are rejected
//!   with [`Error::TypeMismatch`](crate::Error::TypeMismatch).

use crate::error::{Error, Result};
use crate::extract::mismatch;
use crate::node::Node;
use crate::value::Value;

fn out_of_range(value: impl ToString, target: &'static str) -> Error {
    Error::OutOfRange {
        value: value.to_string(),
        target,
    }
}

impl Node {
    pub fn as_f64(&self) -> Result<f64> {
        match *self.value() {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            Value::Uint(u) => Ok(u as f64),
            ref other => Err(mismatch("f64", other)),
        }
    }

    /// Platform-sized signed integer.
    pub fn as_int(&self) -> Result<isize> {
        match *self.value() {
            Value::Float(f) => Ok(f as isize),
            Value::Int(i) => isize::try_from(i).map_err(|_| out_of_range(i, "isize")),
            Value::Uint(u) => isize::try_from(u).map_err(|_| out_of_range(u, "isize")),
            ref other => Err(mismatch("int", other)),
        }
    }

    pub fn as_i64(&self) -> Result<i64> {
        match *self.value() {
            Value::Float(f) => Ok(f as i64),
            Value::Int(i) => Ok(i),
            Value::Uint(u) => i64::try_from(u).map_err(|_| out_of_range(u, "i64")),
            ref other => Err(mismatch("i64", other)),
        }
    }

    /// Unsigned 64-bit integer. Negative inputs wrap: the value is first
    /// taken as a signed 64-bit integer and its bits reinterpreted.
    pub fn as_u64(&self) -> Result<u64> {
        match *self.value() {
            Value::Float(f) if f >= 0.0 => Ok(f as u64),
            Value::Float(f) => Ok(f as i64 as u64),
            Value::Int(i) => Ok(i as u64),
            Value::Uint(u) => Ok(u),
            ref other => Err(mismatch("u64", other)),
        }
    }
}
