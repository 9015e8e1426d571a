//! Types which store themselves as tagged JSON strings and files.

use crate::{
    codec,
    error::Result,
    value::Value,
};
use std::{
    fs,
    path::Path,
};
use tracing::debug;


/// A type which can be stored into and read from tagged JSON strings and
/// files. Only the conversion to and from `Value` has to be provided.
pub trait JsonSerializable: Sized {
    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self>;

    fn to_json(&self) -> Result<String> {
        codec::to_string(&self.to_value())
    }

    fn from_json(json: &str) -> Result<Self> {
        Self::from_value(codec::from_str(json)?)
    }

    fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading json");
        Self::from_json(&fs::read_to_string(path)?)
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), "saving json");
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl JsonSerializable for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl JsonSerializable for crate::record::Record {
    fn to_value(&self) -> Value {
        Value::Record(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        Self::try_from(value)
    }
}
