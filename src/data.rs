// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context data attached to log records.
//!
//! [Data] is an ordinary ordered map from key to [Value].  Loggers never mutate a map once
//! it is attached to them; every derivation builds a fresh one with [merge].
//!
//! [Value] is a closed set of variants the JSON encoder understands, plus [Value::Opaque]
//! for anything else.  Opaque values (and non-finite floats) cannot be encoded; a
//! [WriterSink](crate::WriterSink) replaces the data of such records with a printable dump.
//!
//! ```rust
//! use lager::{data, Value};
//!
//! let d = data! {
//!     "id" => 123456,
//!     "method" => "GET",
//!     "tags" => vec!["a", "b"],
//! };
//! assert_eq!(d["id"], Value::I64(123456));
//! ```

use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Key/value context for a log record.
pub type Data = BTreeMap<String, Value>;

/// A context value.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(String),
    List(Vec<Value>),
    Map(Data),
    /// A value the encoder cannot introspect.  It is only ever printed through `Debug`.
    Opaque(Arc<dyn Debug + Send + Sync>),
}

impl Value {
    /// Wraps an arbitrary value that has no structured representation.
    pub fn opaque<T: Debug + Send + Sync + 'static>(value: T) -> Self {
        Value::Opaque(Arc::new(value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "{b:?}"),
            Value::I64(i) => write!(f, "{i:?}"),
            Value::U64(u) => write!(f, "{u:?}"),
            Value::F64(x) => write!(f, "{x:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Map(map) => f.debug_map().entries(map).finish(),
            Value::Opaque(inner) => write!(f, "Opaque({inner:?})"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            //provenance, not contents
            (Value::Opaque(a), Value::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::I64(i) => serializer.serialize_i64(*i),
            Value::U64(u) => serializer.serialize_u64(*u),
            Value::F64(x) if x.is_finite() => serializer.serialize_f64(*x),
            Value::F64(x) => Err(S::Error::custom(format_args!(
                "unsupported value: {x}"
            ))),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Opaque(inner) => Err(S::Error::custom(format_args!(
                "unsupported type: {inner:?}"
            ))),
        }
    }
}

macro_rules! value_from {
    ($variant:ident: $($t:ty),* => $conv:ty) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(<$conv>::from(v))
                }
            }
        )*
    };
}

value_from!(I64: i8, i16, i32, i64 => i64);
value_from!(U64: u8, u16, u32, u64 => u64);
value_from!(F64: f32, f64 => f64);

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::I64(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::U64(v as u64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl From<Data> for Value {
    fn from(v: Data) -> Self {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Builds a [Data] map.
///
/// ```rust
/// let d = lager::data! { "url" => "https://example.com", "status" => 200 };
/// assert_eq!(d.len(), 2);
/// let empty = lager::data! {};
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! data {
    () => {
        $crate::Data::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Data::new();
        $(
            map.insert(::std::string::String::from($key), $crate::Value::from($value));
        )+
        map
    }};
}

/// Merges context maps, lowest precedence first.
///
/// Later maps overwrite keys of earlier ones.  Returns `None` when there are no keys at all,
/// so records without context omit the field rather than carrying an empty object.
/// The inputs are never modified.
pub fn merge<'a>(layers: impl IntoIterator<Item = &'a Data>) -> Option<Data> {
    let mut merged: Option<Data> = None;
    for layer in layers {
        if layer.is_empty() {
            continue;
        }
        let target = merged.get_or_insert_with(Data::new);
        for (k, v) in layer {
            target.insert(k.clone(), v.clone());
        }
    }
    merged
}
