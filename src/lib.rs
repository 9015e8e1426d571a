//! String-compatible enumerations and a tagged JSON codec for numeric arrays,
//! structured records and complex numbers.

extern crate self as tagjson;

pub mod error;
pub mod string_enum;
pub mod value;
pub mod array;
pub mod record;
pub mod complex;
pub mod codec;
pub mod serializable;

pub use crate::{
    error::{
        Error,
        Result,
    },
    string_enum::StringEnum,
    value::Value,
    array::{
        ElementType,
        NdArray,
    },
    record::{
        Record,
        RecordField,
    },
    complex::Complex,
    codec::{
        Codec,
        Tag,
        DEFAULT_TAG_KEY,
        encode,
        decode,
        to_string,
        from_str,
    },
    serializable::JsonSerializable,
};
pub use tagjson_derive::StringEnum;

#[doc(hidden)]
pub use serde;
