//! Native Rust data → [`Json`].
//!
//! Each supported native type has its own `From` impl, so an unsupported
//! type is a compile error at the call site rather than a runtime surprise.
//! Data that is only known to be [`Serialize`] goes through
//! [`Json::from_serialize`], which reports unrepresentable values (maps with
//! non-string keys, for instance) as a usage error naming the type.
//!
//! `None` and `()` become the JSON `null` value. Every numeric width becomes a
//! number, i.e. an `f64`; integers beyond 2^53 lose precision.
//!
//! The serde bridge also goes the other way: `Json` implements `Serialize` and
//! `Deserialize`, and converts to and from `serde_json::Value`.

use std::collections::{BTreeMap, HashMap};

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;

use crate::error::{JsonError, Result};
use crate::value::{Json, Node};

/// Largest integer an `f64` holds exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Json {
    /// Convert any serializable value.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use vivid_core::Json;
    ///
    /// let mut ports = BTreeMap::new();
    /// ports.insert("http", vec![80, 8080]);
    /// let doc = Json::from_serialize(&ports).unwrap();
    /// assert_eq!(doc.get("http").at(-1).as_int(), 8080);
    /// ```
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Json> {
        serde_json::to_value(value).map(Json::from).map_err(|e| {
            JsonError::usage(format!(
                "cannot convert a value of type `{}` to JSON: {e}",
                std::any::type_name::<T>()
            ))
        })
    }
}

impl From<bool> for Json {
    fn from(b: bool) -> Self {
        Json::boolean(b)
    }
}

macro_rules! from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Json {
                fn from(n: $t) -> Self {
                    Json::number(n as f64)
                }
            }
        )*
    };
}

from_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl From<&str> for Json {
    fn from(s: &str) -> Self {
        Json::string(s.to_string())
    }
}

impl From<String> for Json {
    fn from(s: String) -> Self {
        Json::string(s)
    }
}

impl From<&String> for Json {
    fn from(s: &String) -> Self {
        Json::string(s.clone())
    }
}

impl From<char> for Json {
    fn from(c: char) -> Self {
        Json::string(c.to_string())
    }
}

impl From<()> for Json {
    fn from(_: ()) -> Self {
        Json::null()
    }
}

impl<T: Into<Json>> From<Option<T>> for Json {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Json::null, Into::into)
    }
}

/// Aliases the node; no copy is made.
impl From<&Json> for Json {
    fn from(value: &Json) -> Self {
        value.clone()
    }
}

impl<T: Into<Json>> From<Vec<T>> for Json {
    fn from(items: Vec<T>) -> Self {
        Json::from_vec(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Json>> From<&[T]> for Json {
    fn from(items: &[T]) -> Self {
        Json::from_vec(items.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Json>, const N: usize> From<[T; N]> for Json {
    fn from(items: [T; N]) -> Self {
        Json::from_vec(items.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Json>> From<BTreeMap<K, V>> for Json {
    fn from(map: BTreeMap<K, V>) -> Self {
        Json::from_map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<Json>, S> From<HashMap<K, V, S>> for Json {
    fn from(map: HashMap<K, V, S>) -> Self {
        Json::from_map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Collects into an array.
impl<T: Into<Json>> FromIterator<T> for Json {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Json::from_vec(iter.into_iter().map(Into::into).collect())
    }
}

// ----------------------------------------------------------------------
// serde_json bridge
// ----------------------------------------------------------------------

impl From<Value> for Json {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Json::null(),
            Value::Bool(b) => Json::boolean(b),
            Value::Number(n) => Json::number(n.as_f64().unwrap_or_default()),
            Value::String(s) => Json::string(s),
            Value::Array(items) => Json::from_vec(items.into_iter().map(Json::from).collect()),
            Value::Object(map) => {
                Json::from_map(map.into_iter().map(|(k, v)| (k, Json::from(v))).collect())
            }
        }
    }
}

impl From<&Value> for Json {
    fn from(value: &Value) -> Self {
        Json::from(value.clone())
    }
}

/// Absent values and non-finite numbers become `Value::Null`.
impl From<&Json> for Value {
    fn from(value: &Json) -> Self {
        match value.node() {
            Node::Null | Node::Absent(_) => Value::Null,
            Node::Boolean(b) => Value::Bool(*b),
            Node::Number(n) => number_to_value(*n),
            Node::String(s) => Value::String(s.clone()),
            Node::Object(map) => Value::Object(
                map.borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
            Node::Array(items) => Value::Array(items.borrow().iter().map(Value::from).collect()),
        }
    }
}

impl From<Json> for Value {
    fn from(value: Json) -> Self {
        Value::from(&value)
    }
}

fn number_to_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl Serialize for Json {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.node() {
            Node::Null | Node::Absent(_) => serializer.serialize_unit(),
            Node::Boolean(b) => serializer.serialize_bool(*b),
            Node::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Node::Number(n) => serializer.serialize_f64(*n),
            Node::String(s) => serializer.serialize_str(s),
            Node::Object(map) => {
                let map = map.borrow();
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map.iter() {
                    state.serialize_entry(key, value)?;
                }
                state.end()
            }
            Node::Array(items) => {
                let items = items.borrow();
                let mut state = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    state.serialize_element(item)?;
                }
                state.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Json {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Json::from)
    }
}
