use crate::EncodeError;
use datafusion::arrow::array::{
    Array, BooleanArray, FixedSizeListArray, Float32Array, Float64Array, Int8Array, Int16Array,
    Int32Array, Int64Array, ListArray, StringArray, StructArray, UInt8Array, UInt16Array,
    UInt32Array, UInt64Array,
};
use datafusion::arrow::datatypes::DataType;
use serde_json::{Map, Number, Value as JsonValue};

/// Downcasts a dynamically typed Arrow array, reporting a column-level
/// encoding error if the runtime array type disagrees with the expectation.
pub(crate) fn downcast_array<'a, T: 'static>(
    field: &str,
    array: &'a dyn Array,
) -> Result<&'a T, EncodeError> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        EncodeError::column(
            field,
            format!("unexpected array type {}", array.data_type()),
        )
    })
}

/// Converts one Arrow cell into a JSON value for the passthrough encoding of
/// nested list types.
///
/// Only types that survive a JSON round-trip are allowed inside a cell;
/// anything else is a column-level encoding error, as is a non-finite float
/// (JSON has no representation for it).
pub(crate) fn json_cell(
    field: &str,
    array: &dyn Array,
    index: usize,
) -> Result<JsonValue, EncodeError> {
    if array.is_null(index) {
        return Ok(JsonValue::Null);
    }
    Ok(match array.data_type() {
        DataType::Boolean => {
            JsonValue::Bool(downcast_array::<BooleanArray>(field, array)?.value(index))
        }
        DataType::Int8 => signed(downcast_array::<Int8Array>(field, array)?.value(index)),
        DataType::Int16 => signed(downcast_array::<Int16Array>(field, array)?.value(index)),
        DataType::Int32 => signed(downcast_array::<Int32Array>(field, array)?.value(index)),
        DataType::Int64 => signed(downcast_array::<Int64Array>(field, array)?.value(index)),
        DataType::UInt8 => unsigned(downcast_array::<UInt8Array>(field, array)?.value(index)),
        DataType::UInt16 => unsigned(downcast_array::<UInt16Array>(field, array)?.value(index)),
        DataType::UInt32 => unsigned(downcast_array::<UInt32Array>(field, array)?.value(index)),
        DataType::UInt64 => unsigned(downcast_array::<UInt64Array>(field, array)?.value(index)),
        DataType::Float32 => finite(
            field,
            f64::from(downcast_array::<Float32Array>(field, array)?.value(index)),
        )?,
        DataType::Float64 => finite(
            field,
            downcast_array::<Float64Array>(field, array)?.value(index),
        )?,
        DataType::Utf8 => JsonValue::String(
            downcast_array::<StringArray>(field, array)?
                .value(index)
                .to_owned(),
        ),
        DataType::List(_) => {
            let values = downcast_array::<ListArray>(field, array)?.value(index);
            json_elements(field, values.as_ref())?
        }
        DataType::FixedSizeList(_, _) => {
            let values = downcast_array::<FixedSizeListArray>(field, array)?.value(index);
            json_elements(field, values.as_ref())?
        }
        DataType::Struct(fields) => {
            let values = downcast_array::<StructArray>(field, array)?;
            let mut object = Map::new();
            for (child_index, child) in fields.iter().enumerate() {
                object.insert(
                    child.name().to_owned(),
                    json_cell(field, values.column(child_index).as_ref(), index)?,
                );
            }
            JsonValue::Object(object)
        }
        other => {
            return Err(EncodeError::column(
                field,
                format!("type {other} cannot be represented inside a JSON cell"),
            ));
        }
    })
}

fn json_elements(field: &str, values: &dyn Array) -> Result<JsonValue, EncodeError> {
    let elements = (0..values.len())
        .map(|index| json_cell(field, values, index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(JsonValue::Array(elements))
}

fn signed(value: impl Into<i64>) -> JsonValue {
    JsonValue::Number(Number::from(value.into()))
}

fn unsigned(value: impl Into<u64>) -> JsonValue {
    JsonValue::Number(Number::from(value.into()))
}

fn finite(field: &str, value: f64) -> Result<JsonValue, EncodeError> {
    Number::from_f64(value)
        .map(JsonValue::Number)
        .ok_or_else(|| EncodeError::column(field, format!("non-finite float {value} in JSON cell")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafusion::arrow::array::BinaryArray;
    use datafusion::arrow::datatypes::Int32Type;
    use serde_json::json;

    #[test]
    fn test_list_cell_with_nulls() {
        let lists = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![
            Some(vec![Some(1), None, Some(3)]),
            Some(vec![]),
        ]);
        assert_eq!(json_cell("c", &lists, 0).unwrap(), json!([1, null, 3]));
        assert_eq!(json_cell("c", &lists, 1).unwrap(), json!([]));
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        let floats = Float64Array::from(vec![f64::NAN]);
        let error = json_cell("c", &floats, 0).unwrap_err();
        assert!(error.to_string().contains("non-finite"));
    }

    #[test]
    fn test_binary_cannot_enter_a_json_cell() {
        let bytes = BinaryArray::from_vec(vec![b"ab".as_slice()]);
        assert!(json_cell("c", &bytes, 0).is_err());
    }
}
