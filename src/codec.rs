//! The tagged JSON codec.
//!
//! Values which plain JSON cannot represent are written as objects carrying
//! a reserved discriminator key (`DEFAULT_TAG_KEY` unless configured
//! otherwise) whose value names the category:
//!
//! - array: `{"__tag__": "ndarray", "dtype": "int64", "shape": [2, 2], "data": [[1, 2], [3, 4]]}`
//! - record: `{"__tag__": "record", "fields": {"name": "a", "value": 3}}`
//! - complex: `{"__tag__": "complex", "real": 1.0, "imag": -2.0}`
//! - map which itself contains the discriminator key:
//!   `{"__tag__": "map", "entries": {..}}`
//!
//! Everything else is plain JSON. Decoding an object without the
//! discriminator key yields a plain `Value::Map`.


use crate::{
    array::{
        ElementType,
        NdArray,
    },
    complex::Complex,
    error::{
        bail,
        ensure,
        error,
        Error,
        Result,
    },
    record::{
        Record,
        RecordField,
    },
    value::Value,
    StringEnum,
};
use serde_json::{
    Map,
    Number,
    Value as Json,
};
use std::{
    borrow::Cow,
    collections::BTreeMap,
    io::{
        Read,
        Write,
    },
};
use tracing::trace;


/// Discriminator key used by `Codec::default()`.
pub const DEFAULT_TAG_KEY: &str = "__tag__";

const DTYPE: &str = "dtype";
const SHAPE: &str = "shape";
const DATA: &str = "data";
const FIELDS: &str = "fields";
const REAL: &str = "real";
const IMAG: &str = "imag";
const ENTRIES: &str = "entries";

/// Payload keys, which the discriminator key may not shadow.
const PAYLOAD_KEYS: &[&str] = &[DTYPE, SHAPE, DATA, FIELDS, REAL, IMAG, ENTRIES];

/// Category named by the discriminator of a tagged object.
#[derive(Debug, Clone, Copy, StringEnum)]
#[string_enum(rename_all = "lowercase")]
pub enum Tag {
    NdArray,
    Record,
    Complex,
    Map,
}

impl Tag {
    fn payload_keys(self) -> &'static [&'static str] {
        match self {
            Tag::NdArray => &[DTYPE, SHAPE, DATA],
            Tag::Record => &[FIELDS],
            Tag::Complex => &[REAL, IMAG],
            Tag::Map => &[ENTRIES],
        }
    }
}

/// Encoder/decoder between `Value` and JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    tag_key: Cow<'static, str>,
}

impl Default for Codec {
    fn default() -> Self {
        Codec {
            tag_key: Cow::Borrowed(DEFAULT_TAG_KEY),
        }
    }
}

impl Codec {
    pub fn new() -> Self {
        Codec::default()
    }

    /// Codec using a different discriminator key, e.g. to namespace it away
    /// from keys occurring in user data.
    pub fn with_tag_key<S: Into<String>>(tag_key: S) -> Result<Self> {
        let tag_key = tag_key.into();
        if PAYLOAD_KEYS.contains(&tag_key.as_str()) {
            return Err(Error::Unsupported(format!(
                "{:?} is a payload key and cannot be the tag key",
                tag_key,
            )));
        }
        Ok(Codec {
            tag_key: Cow::Owned(tag_key),
        })
    }

    pub fn tag_key(&self) -> &str {
        &self.tag_key
    }

    /// Start a tagged object.
    fn tagged(&self, tag: Tag) -> Map<String, Json> {
        let mut obj = Map::new();
        obj.insert(self.tag_key.to_string(), Json::String(tag.as_str().into()));
        obj
    }

    pub fn encode(&self, value: &Value) -> Result<Json> {
        Ok(match value {
            &Value::Null => Json::Null,
            &Value::Bool(b) => Json::Bool(b),
            &Value::Number(ref n) => Json::Number(n.clone()),
            &Value::String(ref s) => Json::String(s.clone()),
            &Value::Seq(ref items) => Json::Array(items
                .iter()
                .map(|item| self.encode(item))
                .collect::<Result<_>>()?),
            &Value::Map(ref map) => {
                let entries = self.encode_entries(map
                    .iter()
                    .map(|(k, v)| (k.as_str(), v)))?;
                if map.contains_key(self.tag_key()) {
                    trace!(tag_key = %self.tag_key, "escaping map containing the tag key");
                    let mut obj = self.tagged(Tag::Map);
                    obj.insert(ENTRIES.into(), Json::Object(entries));
                    Json::Object(obj)
                } else {
                    Json::Object(entries)
                }
            },
            &Value::Array(ref array) => {
                let mut obj = self.tagged(Tag::NdArray);
                obj.insert(DTYPE.into(), Json::String(array.element_type().as_str().into()));
                obj.insert(SHAPE.into(), Json::from(array.shape().to_vec()));
                obj.insert(DATA.into(), array.nested_data()?);
                Json::Object(obj)
            },
            &Value::Record(ref record) => {
                let fields = self.encode_entries(record
                    .iter()
                    .map(|field| (field.name.as_str(), &field.value)))?;
                let mut obj = self.tagged(Tag::Record);
                obj.insert(FIELDS.into(), Json::Object(fields));
                Json::Object(obj)
            },
            &Value::Complex(c) => {
                let mut obj = self.tagged(Tag::Complex);
                obj.insert(REAL.into(), finite(c.re, "complex real part")?);
                obj.insert(IMAG.into(), finite(c.im, "complex imaginary part")?);
                Json::Object(obj)
            },
        })
    }

    fn encode_entries<'v, I>(&self, entries: I) -> Result<Map<String, Json>>
    where
        I: Iterator<Item = (&'v str, &'v Value)>,
    {
        entries
            .map(|(k, v)| Ok((k.to_owned(), self.encode(v)?)))
            .collect()
    }

    pub fn decode(&self, json: &Json) -> Result<Value> {
        Ok(match json {
            &Json::Null => Value::Null,
            &Json::Bool(b) => Value::Bool(b),
            &Json::Number(ref n) => Value::Number(n.clone()),
            &Json::String(ref s) => Value::String(s.clone()),
            &Json::Array(ref items) => Value::Seq(items
                .iter()
                .map(|item| self.decode(item))
                .collect::<Result<_>>()?),
            &Json::Object(ref obj) => match obj.get(self.tag_key()) {
                None => Value::Map(self.decode_entries(obj)?),
                Some(tag) => self.decode_tagged(tag, obj)?,
            },
        })
    }

    fn decode_entries(&self, obj: &Map<String, Json>) -> Result<BTreeMap<String, Value>> {
        obj.iter()
            .map(|(k, v)| Ok((k.clone(), self.decode(v)?)))
            .collect()
    }

    fn decode_tagged(&self, tag: &Json, obj: &Map<String, Json>) -> Result<Value> {
        let tag = match tag {
            Json::String(s) => Tag::from_text(s)
                .map_err(|_| error!(
                    "unknown tag {:?}, needs to be one of {}",
                    s,
                    Tag::allowed_values(),
                ))?,
            _ => bail!("tag must be a string, found {}", tag),
        };
        trace!(%tag, "decoding tagged value");

        for key in obj.keys() {
            ensure!(
                key.as_str() == self.tag_key() || tag.payload_keys().contains(&key.as_str()),
                "unexpected key {:?} in {} payload",
                key,
                tag,
            );
        }
        let field = move |key: &str| obj
            .get(key)
            .ok_or_else(|| error!("missing key {:?} in {} payload", key, tag));

        Ok(match tag {
            Tag::NdArray => {
                let dtype = match field(DTYPE)? {
                    Json::String(s) => ElementType::from_text(s)
                        .map_err(|e| error!("bad dtype: {}", e))?,
                    other => bail!("dtype must be a string, found {}", other),
                };
                let shape = decode_shape(field(SHAPE)?)?;
                Value::Array(NdArray::from_nested(dtype, &shape, field(DATA)?)?)
            },
            Tag::Record => match field(FIELDS)? {
                Json::Object(fields) => Value::Record(Record::from_unique_fields(fields
                    .iter()
                    .map(|(name, value)| Ok(RecordField {
                        name: name.clone(),
                        value: self.decode(value)?,
                    }))
                    .collect::<Result<_>>()?)),
                other => bail!("record fields must be an object, found {}", other),
            },
            Tag::Complex => {
                let part = |key: &str| -> Result<f64> {
                    let json = field(key)?;
                    json.as_f64()
                        .ok_or_else(|| error!("complex {} part must be a number, found {}", key, json))
                };
                Value::Complex(Complex::new(part(REAL)?, part(IMAG)?))
            },
            Tag::Map => match field(ENTRIES)? {
                Json::Object(entries) => Value::Map(self.decode_entries(entries)?),
                other => bail!("map entries must be an object, found {}", other),
            },
        })
    }

    pub fn to_string(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string(&self.encode(value)?)?)
    }

    pub fn to_string_pretty(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.encode(value)?)?)
    }

    pub fn to_writer<W: Write>(&self, writer: W, value: &Value) -> Result<()> {
        serde_json::to_writer(writer, &self.encode(value)?)?;
        Ok(())
    }

    pub fn from_str(&self, s: &str) -> Result<Value> {
        self.decode(&serde_json::from_str(s)?)
    }

    pub fn from_slice(&self, bytes: &[u8]) -> Result<Value> {
        self.decode(&serde_json::from_slice(bytes)?)
    }

    pub fn from_reader<R: Read>(&self, reader: R) -> Result<Value> {
        self.decode(&serde_json::from_reader(reader)?)
    }
}

fn decode_shape(json: &Json) -> Result<Vec<usize>> {
    let dims = match json {
        Json::Array(dims) => dims,
        _ => bail!("shape must be a list, found {}", json),
    };
    dims.iter()
        .map(|dim| dim
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| error!("shape entries must be non-negative integers, found {}", dim)))
        .collect()
}

/// JSON number for a float, failing for NaN and infinities.
pub(crate) fn finite(n: f64, what: &str) -> Result<Json> {
    Number::from_f64(n)
        .map(Json::Number)
        .ok_or_else(|| Error::Unsupported(format!("{} {} is not finite", what, n)))
}

/// Encode with the default codec.
pub fn encode(value: &Value) -> Result<Json> {
    Codec::default().encode(value)
}

/// Decode with the default codec.
pub fn decode(json: &Json) -> Result<Value> {
    Codec::default().decode(json)
}

pub fn to_string(value: &Value) -> Result<String> {
    Codec::default().to_string(value)
}

pub fn from_str(s: &str) -> Result<Value> {
    Codec::default().from_str(s)
}
