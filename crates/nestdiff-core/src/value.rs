//! Nested value model
//!
//! [`Value`] is the closed set of shapes the differ understands: maps with
//! insertion-ordered string keys, ordered sequences, sets of scalars and
//! scalars. Every comparison in the engine is an exhaustive `match` over
//! these variants.
//!
//! Map equality ignores key order (two maps with the same entries are equal),
//! but iteration always follows insertion order so that diffs over logically
//! equal trees are textually reproducible.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

/// Leaf value. Totally ordered and hashable so it can live in a set.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    /// Float (using OrderedFloat for Ord/Hash impl)
    Float(OrderedFloat<f64>),
    String(String),
}

impl Scalar {
    /// Numeric view used by tolerance comparisons. Booleans are not numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(f.into_inner()),
            _ => None,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Scalar::Float(f) if f.is_nan())
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::String(_) => "string",
        }
    }
}

/// Container kinds. Used to build the empty counterpart of an added container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    Map,
    Sequence,
    Set,
}

impl ContainerKind {
    pub fn empty(self) -> Value {
        match self {
            ContainerKind::Map => Value::Map(IndexMap::new()),
            ContainerKind::Sequence => Value::Sequence(Vec::new()),
            ContainerKind::Set => Value::Set(BTreeSet::new()),
        }
    }
}

/// A nested value tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// String-keyed map; iteration follows insertion order
    Map(IndexMap<String, Value>),
    /// Index-ordered sequence
    Sequence(Vec<Value>),
    /// Set of scalars; never recursed into
    Set(BTreeSet<Scalar>),
    Scalar(Scalar),
}

impl Value {
    /// An empty map.
    pub fn map() -> Self {
        Value::Map(IndexMap::new())
    }

    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    /// Build a set from anything convertible into scalars.
    pub fn set<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        Value::Set(items.into_iter().map(Into::into).collect())
    }

    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            Value::Map(_) => Some(ContainerKind::Map),
            Value::Sequence(_) => Some(ContainerKind::Sequence),
            Value::Set(_) => Some(ContainerKind::Set),
            Value::Scalar(_) => None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.container_kind().is_some()
    }

    /// Empty container of the same kind, or `None` for scalars.
    pub fn empty_like(&self) -> Option<Value> {
        self.container_kind().map(ContainerKind::empty)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_scalar().and_then(Scalar::as_f64)
    }

    pub fn is_nan(&self) -> bool {
        self.as_scalar().is_some_and(Scalar::is_nan)
    }

    /// Short human-readable name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Map(_) => "map",
            Value::Sequence(_) => "sequence",
            Value::Set(_) => "set",
            Value::Scalar(s) => s.kind_name(),
        }
    }

    /// Insert into a map value, builder style. No-op on other variants.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Value::Map(map) = &mut self {
            map.insert(key.into(), value.into());
        }
        self
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:expr),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(v: $ty) -> Self {
                    ($variant)(v)
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Scalar(Scalar::from(v))
                }
            }
        )*
    };
}

scalar_from! {
    bool => Scalar::Bool,
    i64 => Scalar::Int,
    i32 => |v: i32| Scalar::Int(i64::from(v)),
    f64 => |v: f64| Scalar::Float(OrderedFloat(v)),
    String => Scalar::String,
    &str => |v: &str| Scalar::String(v.to_string()),
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::null(),
            serde_json::Value::Bool(b) => Value::from(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::from(i),
                None => Value::from(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&Scalar> for serde_json::Value {
    fn from(s: &Scalar) -> Self {
        match s {
            Scalar::Null => serde_json::Value::Null,
            Scalar::Bool(b) => serde_json::Value::Bool(*b),
            Scalar::Int(i) => serde_json::Value::from(*i),
            // Non-finite floats have no JSON form and become null
            Scalar::Float(f) => serde_json::Number::from_f64(f.into_inner())
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Scalar::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// Sets become arrays in ascending element order.
impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Set(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Scalar(s) => serde_json::Value::from(s),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) => serializer.serialize_f64(f.into_inner()),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Sequence(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(item)?;
                }
                out.end()
            }
            Value::Set(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(item)?;
                }
                out.end()
            }
            Value::Scalar(s) => s.serialize(serializer),
        }
    }
}

/// Decodes through `serde_json::Value`; arrays always come back as sequences.
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}
