//! Total extractors.
//!
//! Each fallible accessor has two infallible counterparts: `must_x` returns
//! the zero value of the target type on failure, `must_x_or` returns the
//! supplied default. [`Node::must_from`] takes the defaults as a slice and
//! treats more than one as a bug in the caller: it panics.
//!
//! ```
//! use simple_doc::Node;
//!
//! let doc = Node::from_slice(b"retries: 3").unwrap();
//! assert_eq!(doc.get("retries").must_int(), 3);
//! assert_eq!(doc.get("timeout").must_f64_or(1.5), 1.5);
//! assert_eq!(doc.get("name").must_string(), "");
//! ```

use crate::extract::Extract;
use crate::node::Node;
use crate::value::{Mapping, Sequence};

impl Node {
    /// Extracts `T`, falling back to `T::default()`.
    pub fn must<T: Extract + Default>(&self) -> T {
        self.must_or(T::default())
    }

    /// Extracts `T`, falling back to `default`.
    pub fn must_or<T: Extract>(&self, default: T) -> T {
        match self.extract() {
            Ok(value) => value,
            Err(err) => {
                tracing::trace!(error = %err, target_type = T::NAME, "falling back to default");
                default
            }
        }
    }

    /// Extracts `T` with zero or one default.
    ///
    /// # Panics
    ///
    /// Panics when `defaults` holds more than one value. That is a misuse of
    /// the API, not a property of the document.
    pub fn must_from<T: Extract + Default + Clone>(&self, defaults: &[T]) -> T {
        match defaults {
            [] => self.must(),
            [default] => self.must_or(default.clone()),
            _ => panic!(
                "must_{}() received too many defaults: {}",
                T::NAME,
                defaults.len()
            ),
        }
    }
}

macro_rules! total_extractors {
    ($($ty:ty => $must:ident, $must_or:ident;)*) => {
        impl Node {
            $(
                #[doc = concat!("Like [`Node::", stringify!($must_or), "`] with the zero value as default.")]
                pub fn $must(&self) -> $ty {
                    self.must::<$ty>()
                }

                pub fn $must_or(&self, default: $ty) -> $ty {
                    self.must_or(default)
                }
            )*
        }
    };
}

total_extractors! {
    Mapping => must_mapping, must_mapping_or;
    Sequence => must_sequence, must_sequence_or;
    bool => must_bool, must_bool_or;
    String => must_string, must_string_or;
    Vec<u8> => must_bytes, must_bytes_or;
    Vec<String> => must_string_sequence, must_string_sequence_or;
    f64 => must_f64, must_f64_or;
    isize => must_int, must_int_or;
    i64 => must_i64, must_i64_or;
    u64 => must_u64, must_u64_or;
}
