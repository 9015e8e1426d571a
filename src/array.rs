//! Numeric arrays with an explicit shape and a fixed element type.
//!
//! An `NdArray` wraps an `ndarray::ArrayD` of one of the supported element
//! types. In JSON its elements are written as nested lists, one level per
//! axis, so a 0-d array is written as the bare scalar.


use crate::{
    codec,
    error::{
        bail,
        ensure,
        error,
        Result,
    },
    value::Value,
    StringEnum,
};
use ndarray::{
    ArrayD,
    ArrayViewD,
    IxDyn,
};
use serde_json::Value as Json;


/// Element type of an `NdArray`, named like the corresponding numpy dtype.
#[derive(Debug, Clone, Copy, StringEnum)]
#[string_enum(rename_all = "lowercase")]
pub enum ElementType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

/// Scalar type which can be stored in an `NdArray`.
pub trait Element: Clone + PartialEq + 'static {
    const TYPE: ElementType;

    fn to_json(&self) -> Result<Json>;

    /// `None` if `json` is not representable as `Self`.
    fn from_json(json: &Json) -> Option<Self>;

    fn wrap(array: ArrayD<Self>) -> NdArray;

    fn downcast_ref(array: &NdArray) -> Option<&ArrayD<Self>>;

    fn downcast(array: NdArray) -> Option<ArrayD<Self>>;
}

macro_rules! element_to_json {
    (bool, $x:expr)=>{ Ok(Json::Bool($x)) };
    (int, $x:expr)=>{ Ok(Json::from($x)) };
    (float, $x:expr)=>{ codec::finite($x as f64, "array element") };
}

macro_rules! element_from_json {
    (bool, $t:ident, $j:expr)=>{ $j.as_bool() };
    (int, $t:ident, $j:expr)=>{
        $j.as_i64()
            .and_then(|n| $t::try_from(n).ok())
            .or_else(|| $j.as_u64().and_then(|n| $t::try_from(n).ok()))
    };
    (float, $t:ident, $j:expr)=>{
        $j.as_f64().and_then(|n| {
            let x = n as $t;
            x.is_finite().then(|| x)
        })
    };
}

macro_rules! elements {
    ($($variant:ident($t:ident) $kind:ident,)*)=>{
        #[derive(Debug, Clone, PartialEq)]
        pub enum NdArray {
            $( $variant(ArrayD<$t>), )*
        }

        $(
            impl Element for $t {
                const TYPE: ElementType = ElementType::$variant;

                fn to_json(&self) -> Result<Json> {
                    element_to_json!($kind, *self)
                }

                fn from_json(json: &Json) -> Option<Self> {
                    element_from_json!($kind, $t, json)
                }

                fn wrap(array: ArrayD<Self>) -> NdArray {
                    NdArray::$variant(array)
                }

                fn downcast_ref(array: &NdArray) -> Option<&ArrayD<Self>> {
                    match array {
                        NdArray::$variant(array) => Some(array),
                        _ => None,
                    }
                }

                fn downcast(array: NdArray) -> Option<ArrayD<Self>> {
                    match array {
                        NdArray::$variant(array) => Some(array),
                        _ => None,
                    }
                }
            }
        )*

        impl NdArray {
            pub fn element_type(&self) -> ElementType {
                match self {
                    $( NdArray::$variant(_) => ElementType::$variant, )*
                }
            }

            /// Size along each axis.
            pub fn shape(&self) -> &[usize] {
                match self {
                    $( NdArray::$variant(array) => array.shape(), )*
                }
            }

            /// Elements as nested JSON lists.
            pub(crate) fn nested_data(&self) -> Result<Json> {
                match self {
                    $( NdArray::$variant(array) => nest(array.view()), )*
                }
            }

            /// Rebuild an array from its dtype, shape and nested data.
            pub(crate) fn from_nested(
                dtype: ElementType,
                shape: &[usize],
                data: &Json,
            ) -> Result<Self> {
                match dtype {
                    $( ElementType::$variant => from_nested_as::<$t>(shape, data)
                        .map(NdArray::$variant), )*
                }
            }
        }
    };
}

elements!(
    Bool(bool) bool,
    Int8(i8) int,
    Int16(i16) int,
    Int32(i32) int,
    Int64(i64) int,
    UInt8(u8) int,
    UInt16(u16) int,
    UInt32(u32) int,
    UInt64(u64) int,
    Float32(f32) float,
    Float64(f64) float,
);

impl NdArray {
    /// Build an array from row-major `values`.
    pub fn from_shape_vec<T: Element>(shape: &[usize], values: Vec<T>) -> Result<Self> {
        ArrayD::from_shape_vec(IxDyn(shape), values)
            .map(T::wrap)
            .map_err(|e| error!("invalid shape {:?}: {}", shape, e))
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The underlying array, if its element type is `T`.
    pub fn as_array<T: Element>(&self) -> Option<&ArrayD<T>> {
        T::downcast_ref(self)
    }

    pub fn into_array<T: Element>(self) -> Option<ArrayD<T>> {
        T::downcast(self)
    }
}

impl<T: Element> From<ArrayD<T>> for NdArray {
    fn from(array: ArrayD<T>) -> Self {
        T::wrap(array)
    }
}

impl<T: Element> From<ArrayD<T>> for Value {
    fn from(array: ArrayD<T>) -> Self {
        Value::Array(T::wrap(array))
    }
}

fn nest<T: Element>(view: ArrayViewD<'_, T>) -> Result<Json> {
    if view.ndim() == 0 {
        return match view.iter().next() {
            Some(elem) => elem.to_json(),
            None => Ok(Json::Null),
        };
    }
    Ok(Json::Array(view
        .outer_iter()
        .map(nest)
        .collect::<Result<_>>()?))
}

/// Walk nested lists along `shape`, collecting leaves in row-major order.
fn collect_leaves<'j>(data: &'j Json, shape: &[usize], out: &mut Vec<&'j Json>) -> Result<()> {
    let (&len, inner) = match shape.split_first() {
        Some(split) => split,
        None => {
            out.push(data);
            return Ok(());
        },
    };
    let items = match data {
        Json::Array(items) => items,
        _ => bail!("expected a list of length {}, found {}", len, data),
    };
    ensure!(
        items.len() == len,
        "list has length {}, shape requires {}",
        items.len(),
        len,
    );
    for item in items {
        collect_leaves(item, inner, out)?;
    }
    Ok(())
}

fn from_nested_as<T: Element>(shape: &[usize], data: &Json) -> Result<ArrayD<T>> {
    let mut leaves = Vec::new();
    collect_leaves(data, shape, &mut leaves)?;
    let values = leaves
        .into_iter()
        .map(|leaf| T::from_json(leaf)
            .ok_or_else(|| error!("{} is not a valid {} element", leaf, T::TYPE)))
        .collect::<Result<Vec<T>>>()?;
    ArrayD::from_shape_vec(IxDyn(shape), values)
        .map_err(|e| error!("invalid shape {:?}: {}", shape, e))
}
