//! Dynamic representation of data the codec understands, analogous to
//! `serde_json::Value` extended with arrays, records and complex numbers.


use crate::{
    array::NdArray,
    codec,
    complex::Complex,
    error::{
        Error,
        Result,
    },
    record::Record,
};
use serde::{
    de::Error as _,
    ser::Error as _,
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use serde_json::{
    Number,
    Value as Json,
};
use std::collections::BTreeMap;


#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Seq(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Array(NdArray),
    Record(Record),
    Complex(Complex),
}

impl Value {
    /// Convert any serializable value through the baseline serializer. The
    /// result only ever holds JSON-native variants.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Value::from(serde_json::to_value(value)?))
    }

    /// Lossy untagged form: arrays become nested lists, records plain
    /// objects, complex numbers `{"real", "imag"}` objects.
    pub fn to_plain_json(&self) -> Result<Json> {
        Ok(match self {
            &Value::Null => Json::Null,
            &Value::Bool(b) => Json::Bool(b),
            &Value::Number(ref n) => Json::Number(n.clone()),
            &Value::String(ref s) => Json::String(s.clone()),
            &Value::Seq(ref items) => Json::Array(items
                .iter()
                .map(Value::to_plain_json)
                .collect::<Result<_>>()?),
            &Value::Map(ref map) => Json::Object(map
                .iter()
                .map(|(k, v)| Ok((k.clone(), v.to_plain_json()?)))
                .collect::<Result<_>>()?),
            &Value::Array(ref array) => array.nested_data()?,
            &Value::Record(ref record) => Json::Object(record
                .iter()
                .map(|field| Ok((field.name.clone(), field.value.to_plain_json()?)))
                .collect::<Result<_>>()?),
            &Value::Complex(c) => {
                let mut obj = serde_json::Map::new();
                obj.insert("real".into(), codec::finite(c.re, "complex real part")?);
                obj.insert("imag".into(), codec::finite(c.im, "complex imaginary part")?);
                Json::Object(obj)
            },
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            &Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&NdArray> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<Complex> {
        match self {
            &Value::Complex(c) => Some(c),
            _ => None,
        }
    }

    /// Look up a key of a map or a field of a record.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            Value::Record(record) => record.get(key),
            _ => None,
        }
    }
}

/// JSON-native values map one to one. Tagged objects are not interpreted,
/// use `codec::decode` for that.
impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Seq(items
                .into_iter()
                .map(Value::from)
                .collect()),
            Json::Object(obj) => Value::Map(obj
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect()),
        }
    }
}

macro_rules! from_integers {
    ($($t:ty,)*)=>{$(
        impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Number(Number::from(n))
            }
        }
    )*};
}

from_integers!(
    u8, u16, u32, u64, usize,
    i8, i16, i32, i64, isize,
);

/// Non-finite floats become `Null`, as in `serde_json`.
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::from(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(s: &'a str) -> Self {
        Value::String(s.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<NdArray> for Value {
    fn from(array: NdArray) -> Self {
        Value::Array(array)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Complex> for Value {
    fn from(c: Complex) -> Self {
        Value::Complex(c)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Seq(iter.into_iter().map(Into::into).collect())
    }
}

/// Serializes in tagged form with the default discriminator key.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        codec::encode(self)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = Json::deserialize(deserializer)?;
        codec::decode(&json).map_err(D::Error::custom)
    }
}

impl TryFrom<Value> for Record {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Record(record) => Ok(record),
            other => Err(Error::Decode(format!("expected a record, found {:?}", other))),
        }
    }
}
