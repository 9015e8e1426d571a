//! Structured records: a fixed, ordered set of named fields.


use crate::{
    error::{
        Error,
        Result,
    },
    value::Value,
};
use serde::{
    de::DeserializeOwned,
    Serialize,
};
use serde_json::Value as Json;


#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<RecordField>,
}

/// Item in `Record`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: String,
    pub value: Value,
}

impl<S: Into<String>, V: Into<Value>> From<(S, V)> for RecordField {
    fn from((name, value): (S, V)) -> Self {
        RecordField {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    /// Fields whose names are already known to be unique, such as the keys
    /// of a JSON object.
    pub(crate) fn from_unique_fields(fields: Vec<RecordField>) -> Self {
        Record { fields }
    }

    /// Builder form of `insert`.
    pub fn with_field<S: Into<String>, V: Into<Value>>(mut self, name: S, value: V) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field. Replaces the value in place if the name is already
    /// present, so field order is that of first insertion.
    pub fn insert<S: Into<String>, V: Into<Value>>(&mut self, name: S, value: V) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => Some(std::mem::replace(&mut field.value, value)),
            None => {
                self.fields.push(RecordField { name, value });
                None
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|field| field.name == name)
            .map(|field| &mut field.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecordField> {
        self.fields.iter()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Build a record from any type the baseline serializer writes as an
    /// object, such as a struct deriving `Serialize`.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            Json::Object(obj) => Ok(Record::from_unique_fields(obj
                .into_iter()
                .map(RecordField::from)
                .collect())),
            other => Err(Error::Unsupported(format!(
                "expected a value serializing to an object, found {}",
                other,
            ))),
        }
    }

    /// Rebuild a typed value from the plain form of this record, e.g. the
    /// struct it was made from with `from_serialize`.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T> {
        let plain = Value::Record(self.clone()).to_plain_json()?;
        Ok(serde_json::from_value(plain)?)
    }
}

impl<S: Into<String>, V: Into<Value>> FromIterator<(S, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = RecordField;
    type IntoIter = std::vec::IntoIter<RecordField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a RecordField;
    type IntoIter = std::slice::Iter<'a, RecordField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
