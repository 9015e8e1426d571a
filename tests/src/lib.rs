

use tagjson::*;
use ndarray::{
    array,
    ArrayD,
    IxDyn,
};
use serde_json::json;
use std::collections::{
    BTreeMap,
    HashMap,
};


#[cfg(test)]
fn round_trip_test(val: Value) {
    println!("{:#?}", val);

    // codec
    let s = tagjson::to_string(&val)
        .map_err(|e| println!("{}", e))
        .unwrap();
    println!("{}", s);
    let val2 = tagjson::from_str(&s)
        .map_err(|e| println!("{}", e))
        .unwrap();
    assert_eq!(val, val2);

    // serde impls of Value
    let s = serde_json::to_string(&val).unwrap();
    let val3: Value = serde_json::from_str(&s).unwrap();
    assert_eq!(val, val3);
}

#[cfg(test)]
fn map<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Map(entries
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect::<BTreeMap<_, _>>())
}

#[test]
fn int_matrix_encoding() {
    let a = array![[1i64, 2], [3, 4]].into_dyn();
    let json = encode(&Value::from(a.clone())).unwrap();
    assert_eq!(json, json!({
        "__tag__": "ndarray",
        "dtype": "int64",
        "shape": [2, 2],
        "data": [[1, 2], [3, 4]],
    }));

    let val = decode(&json).unwrap();
    let array = val.as_array().unwrap();
    assert_eq!(array.element_type(), ElementType::Int64);
    assert_eq!(array.shape(), &[2, 2]);
    assert_eq!(array.as_array::<i64>(), Some(&a));
    assert_eq!(array.as_array::<i32>(), None);
}

#[test]
fn record_encoding() {
    let record = Record::new()
        .with_field("name", "a")
        .with_field("value", 3);
    let s = to_string(&Value::from(record.clone())).unwrap();
    assert_eq!(s, r#"{"__tag__":"record","fields":{"name":"a","value":3}}"#);

    let val = from_str(&s).unwrap();
    let record2 = val.as_record().unwrap();
    assert_eq!(record2.get("name"), Some(&Value::from("a")));
    assert_eq!(record2.get("value").and_then(Value::as_i64), Some(3));
    assert_eq!(record2, &record);
}

#[test]
fn record_field_order_survives() {
    round_trip_test(Value::from(Record::new()
        .with_field("zeta", 1)
        .with_field("alpha", 2)
        .with_field("mu", 3)));
}

#[test]
fn wide_record_decodes_in_field_order() {
    let names: Vec<String> = (0..2000).rev().map(|i| format!("f{}", i)).collect();
    let mut fields = serde_json::Map::new();
    for (i, name) in names.iter().enumerate() {
        fields.insert(name.clone(), json!(i));
    }
    let json = json!({"__tag__": "record", "fields": fields});
    let record = Record::try_from(decode(&json).unwrap()).unwrap();
    assert_eq!(record.len(), names.len());
    assert!(record.field_names().eq(names.iter().map(String::as_str)));
    assert_eq!(record.get("f0"), Some(&Value::from(1999)));
    assert_eq!(encode(&Value::from(record)).unwrap(), json);
}

#[test]
fn every_element_type() {
    round_trip_test(Value::from(array![true, false, true].into_dyn()));
    round_trip_test(Value::from(array![i8::MIN, 0, i8::MAX].into_dyn()));
    round_trip_test(Value::from(array![i16::MIN, 0, i16::MAX].into_dyn()));
    round_trip_test(Value::from(array![i32::MIN, 0, i32::MAX].into_dyn()));
    round_trip_test(Value::from(array![i64::MIN, 0, i64::MAX].into_dyn()));
    round_trip_test(Value::from(array![0u8, u8::MAX].into_dyn()));
    round_trip_test(Value::from(array![0u16, u16::MAX].into_dyn()));
    round_trip_test(Value::from(array![0u32, u32::MAX].into_dyn()));
    round_trip_test(Value::from(array![0u64, u64::MAX].into_dyn()));
    round_trip_test(Value::from(array![0.1f32, -2.5, 1e-30, 3.0e30].into_dyn()));
    round_trip_test(Value::from(array![0.1f64, -2.5, 1e-300, 3.0].into_dyn()));
}

#[test]
fn odd_shapes() {
    round_trip_test(Value::from(ArrayD::from_elem(IxDyn(&[]), 7i32)));
    round_trip_test(Value::from(ArrayD::<f64>::zeros(IxDyn(&[0]))));
    round_trip_test(Value::from(ArrayD::<u8>::zeros(IxDyn(&[2, 0]))));
    round_trip_test(Value::from(ArrayD::<i16>::zeros(IxDyn(&[0, 3]))));
    let values: Vec<f32> = (0..24).map(|n| n as f32 / 4.0).collect();
    round_trip_test(Value::from(NdArray::from_shape_vec(&[2, 3, 4], values).unwrap()));
}

#[test]
fn zero_dim_array_data_is_a_scalar() {
    let val = Value::from(ArrayD::from_elem(IxDyn(&[]), 7i32));
    assert_eq!(encode(&val).unwrap()["data"], json!(7));
    assert_eq!(encode(&val).unwrap()["shape"], json!([]));
}

#[test]
fn empty_array_keeps_inner_dimensions() {
    let val = Value::from(ArrayD::<i16>::zeros(IxDyn(&[0, 3])));
    let json = encode(&val).unwrap();
    assert_eq!(json["data"], json!([]));
    assert_eq!(decode(&json).unwrap().as_array().unwrap().shape(), &[0, 3]);
}

#[test]
fn record_with_array_field() {
    round_trip_test(Value::from(Record::new()
        .with_field("number", 3.141)
        .with_field("values", array![[1.0, 2.0], [3.0, 4.0]].into_dyn())));
}

#[test]
fn seq_of_records() {
    round_trip_test(Value::from((0..3)
        .map(|n| Record::new()
            .with_field("index", n)
            .with_field("squares", array![n, n * n].into_dyn()))
        .collect::<Vec<_>>()));
}

#[test]
fn deep_nesting() {
    let inner = Record::new()
        .with_field("z", Complex::new(1.1, -2.2))
        .with_field("grid", map([
            ("a", Value::from(array![[true], [false]].into_dyn())),
            ("b", Value::Null),
        ]));
    round_trip_test(map([
        ("list", Value::from(vec![
            Value::from(inner.clone()),
            Value::from(vec![Value::from(inner), Value::from("text")]),
        ])),
        ("flag", Value::from(false)),
        ("nothing", Value::Null),
        ("count", Value::from(-4)),
    ]));
}

#[test]
fn complex_encoding() {
    let val = Value::from(Complex::new(1.1, -2.2));
    assert_eq!(encode(&val).unwrap(), json!({
        "__tag__": "complex",
        "real": 1.1,
        "imag": -2.2,
    }));
    round_trip_test(val);
}

#[test]
fn plain_json_passes_through() {
    let json = json!({"a": [1, 2.5, "x", null, true], "b": {"c": {}}});
    assert_eq!(encode(&decode(&json).unwrap()).unwrap(), json);
    assert_eq!(decode(&json).unwrap(), Value::from(json));
}

#[test]
fn maps_containing_the_tag_key_are_escaped() {
    let val = map([
        ("__tag__", Value::from("record")),
        ("other", Value::from(1)),
    ]);
    let json = encode(&val).unwrap();
    assert_eq!(json, json!({
        "__tag__": "map",
        "entries": {"__tag__": "record", "other": 1},
    }));
    round_trip_test(val);
}

#[test]
fn record_fields_named_like_the_tag_key() {
    round_trip_test(Value::from(Record::new().with_field("__tag__", "ndarray")));
}

#[test]
fn custom_tag_key() {
    let codec = Codec::with_tag_key("$type").unwrap();
    let val = Value::from(vec![
        Value::from(array![1u8, 2].into_dyn()),
        map([("__tag__", Value::from(1))]),
    ]);
    let json = codec.encode(&val).unwrap();
    assert_eq!(json[0]["$type"], json!("ndarray"));
    assert_eq!(json[1], json!({"__tag__": 1}));
    assert_eq!(codec.decode(&json).unwrap(), val);

    // the default codec sees only a plain map
    let plain = decode(&json[0]).unwrap();
    assert_eq!(plain.get("$type"), Some(&Value::from("ndarray")));
}

#[test]
fn codec_text_and_io_wrappers() {
    let codec = Codec::new();
    let val = Value::from(Record::new().with_field("x", array![1.5f32].into_dyn()));

    let mut buf = Vec::new();
    codec.to_writer(&mut buf, &val).unwrap();
    assert_eq!(codec.from_slice(&buf).unwrap(), val);
    assert_eq!(codec.from_reader(buf.as_slice()).unwrap(), val);

    let pretty = codec.to_string_pretty(&val).unwrap();
    assert!(pretty.contains('\n'));
    assert_eq!(codec.from_str(&pretty).unwrap(), val);
}

#[cfg(test)]
fn decode_err(json: serde_json::Value) -> Error {
    let e = decode(&json).unwrap_err();
    println!("{}", e);
    e
}

#[test]
fn malformed_payloads_are_decode_errors() {
    let cases = [
        json!({"__tag__": "matrix", "data": []}),
        json!({"__tag__": 3}),
        json!({"__tag__": "ndarray", "dtype": "int64", "shape": [2]}),
        json!({"__tag__": "ndarray", "dtype": "int64", "shape": [2], "data": [1, 2], "extra": 0}),
        json!({"__tag__": "ndarray", "dtype": "int64", "shape": [2, 2], "data": [[1, 2], [3]]}),
        json!({"__tag__": "ndarray", "dtype": "int64", "shape": [3], "data": [1, 2]}),
        json!({"__tag__": "ndarray", "dtype": "int64", "shape": [], "data": [1]}),
        json!({"__tag__": "ndarray", "dtype": "complex128", "shape": [1], "data": [1]}),
        json!({"__tag__": "ndarray", "dtype": "uint8", "shape": [1], "data": [300]}),
        json!({"__tag__": "ndarray", "dtype": "bool", "shape": [1], "data": [1]}),
        json!({"__tag__": "ndarray", "dtype": "float32", "shape": [1], "data": [1e300]}),
        json!({"__tag__": "ndarray", "dtype": "int64", "shape": [-1], "data": []}),
        json!({"__tag__": "record", "fields": [1, 2]}),
        json!({"__tag__": "complex", "real": "1", "imag": 0}),
        json!({"__tag__": "map", "entries": null}),
        json!([1, {"nested": {"__tag__": "record"}}]),
    ];
    for json in cases {
        assert!(decode_err(json).is_decode());
    }
}

#[test]
fn unknown_tag_lists_known_tags() {
    let e = decode_err(json!({"__tag__": "matrix"}));
    assert!(e.to_string().contains("ndarray, record, complex, map"));
}

#[test]
fn non_finite_floats_are_unsupported() {
    let cases = [
        Value::from(array![1.0, f64::NAN].into_dyn()),
        Value::from(array![f32::INFINITY].into_dyn()),
        Value::from(Complex::new(0.0, f64::NEG_INFINITY)),
    ];
    for val in cases {
        assert!(matches!(encode(&val), Err(Error::Unsupported(_))));
    }
}

#[test]
fn baseline_errors_propagate() {
    let mut keyed_by_tuple = HashMap::new();
    keyed_by_tuple.insert((1, 2), 3);
    assert!(matches!(Value::from_serialize(&keyed_by_tuple), Err(Error::Json(_))));
    assert!(matches!(from_str("{\"a\": "), Err(Error::Json(_))));
}

#[test]
fn plain_json_form() {
    let val = Value::from(Record::new()
        .with_field("values", array![[1, 2], [3, 4]].into_dyn())
        .with_field("z", Complex::new(1.0, 2.0)));
    assert_eq!(val.to_plain_json().unwrap(), json!({
        "values": [[1, 2], [3, 4]],
        "z": {"real": 1.0, "imag": 2.0},
    }));
}
