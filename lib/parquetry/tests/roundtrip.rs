use datafusion::arrow::array::{
    Array, ArrayRef, BooleanArray, Date64Array, Float64Array, Int32Array, Int64Builder, ListArray,
    MapBuilder, StringArray, StringBuilder, UInt64Array,
};
use datafusion::arrow::datatypes::{DataType, Field, Int32Type, Schema};
use datafusion::arrow::record_batch::RecordBatch;
use parquetry::common::StorageError;
use parquetry::encoding::EncodeError;
use parquetry::model::{PlainValue, Row};
use parquetry::storage::{encode_table, ContainerReader, MemoryByteRangeSource};
use serde_json::json;
use std::sync::Arc;

async fn open(buffer: Vec<u8>) -> ContainerReader {
    ContainerReader::open(Box::new(MemoryByteRangeSource::new(buffer)))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_int_and_string_table_roundtrips_exactly() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("int", DataType::Int32, false),
        Field::new("str", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(vec![0, 1, 2])) as ArrayRef,
            Arc::new(StringArray::from(vec!["foo", "bar", "baz"])) as ArrayRef,
        ],
    )
    .unwrap();

    let reader = open(encode_table(&batch).unwrap()).await;
    let rows: Vec<Row> = reader.cursor().collect();

    let expected = |int: i32, str: &str| {
        Row::new(vec![
            ("int".into(), Some(PlainValue::Int32(int))),
            ("str".into(), Some(PlainValue::from(str))),
        ])
    };
    assert_eq!(
        rows,
        vec![expected(0, "foo"), expected(1, "bar"), expected(2, "baz")]
    );

    let mut cursor = reader.cursor();
    assert_eq!(cursor.by_ref().count(), 3);
    assert!(cursor.next().is_none());
    reader.close().await;
}

#[tokio::test]
async fn test_mixed_types_and_nulls_roundtrip() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("flag", DataType::Boolean, true),
        Field::new("score", DataType::Float64, true),
        Field::new("count", DataType::UInt64, false),
        Field::new("day", DataType::Date64, true),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(BooleanArray::from(vec![Some(true), None])) as ArrayRef,
            Arc::new(Float64Array::from(vec![None, Some(2.5)])) as ArrayRef,
            Arc::new(UInt64Array::from(vec![7, 8])) as ArrayRef,
            Arc::new(Date64Array::from(vec![Some(86_400_000), None])) as ArrayRef,
        ],
    )
    .unwrap();

    let reader = open(encode_table(&batch).unwrap()).await;
    let rows: Vec<Row> = reader.cursor().collect();

    assert_eq!(rows[0].get("flag"), Some(&PlainValue::Bool(true)));
    assert_eq!(rows[0].entry("score"), Some(&None));
    assert_eq!(rows[0].get("count"), Some(&PlainValue::UInt64(7)));
    assert_eq!(
        rows[0].get("day"),
        Some(&PlainValue::TimestampMillis(86_400_000))
    );
    assert_eq!(rows[1].get("flag"), None);
    assert_eq!(rows[1].get("score"), Some(&PlainValue::Double(2.5)));
    assert_eq!(rows[1].entry("day"), Some(&None));
    reader.close().await;
}

#[tokio::test]
async fn test_nested_lists_come_back_as_json() {
    let lists = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![
        Some(vec![Some(1), Some(2)]),
        Some(vec![]),
        None,
    ]);
    let schema = Arc::new(Schema::new(vec![Field::new(
        "l",
        lists.data_type().clone(),
        true,
    )]));
    let batch = RecordBatch::try_new(schema, vec![Arc::new(lists) as ArrayRef]).unwrap();

    let reader = open(encode_table(&batch).unwrap()).await;
    let rows: Vec<Row> = reader.cursor().collect();

    assert_eq!(rows[0].get("l"), Some(&PlainValue::Json(json!([1, 2]))));
    assert_eq!(rows[1].get("l"), Some(&PlainValue::Json(json!([]))));
    assert_eq!(rows[2].get("l"), None);
    reader.close().await;
}

#[tokio::test]
async fn test_map_column_roundtrips_as_repeated_group() {
    let mut builder = MapBuilder::new(None, StringBuilder::new(), Int64Builder::new());
    builder.keys().append_value("a");
    builder.values().append_value(1);
    builder.append(true).unwrap();
    let map = builder.finish();

    let schema = Arc::new(Schema::new(vec![Field::new(
        "m",
        map.data_type().clone(),
        false,
    )]));
    let batch = RecordBatch::try_new(schema, vec![Arc::new(map) as ArrayRef]).unwrap();

    let reader = open(encode_table(&batch).unwrap()).await;
    let rows: Vec<Row> = reader.cursor().collect();

    assert_eq!(
        rows[0].get("m"),
        Some(&PlainValue::Repeated(vec![PlainValue::Group(vec![
            ("keys".into(), Some(PlainValue::from("a"))),
            ("values".into(), Some(PlainValue::Int64(1))),
        ])]))
    );
    reader.close().await;
}

#[tokio::test]
async fn test_unsupported_field_fails_schema_build_before_encoding() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("ok", DataType::Int32, false),
        Field::new("half", DataType::Float16, false),
    ]));
    let batch = RecordBatch::new_empty(schema);

    match encode_table(&batch) {
        Err(EncodeError::UnsupportedType(error)) => {
            assert_eq!(error.0, DataType::Float16);
        }
        other => panic!("expected an unsupported type failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_corrupt_container_closes_source_exactly_once() {
    let schema = Arc::new(Schema::new(vec![Field::new("n", DataType::Int32, false)]));
    let batch = RecordBatch::try_new(
        schema,
        vec![Arc::new(Int32Array::from(vec![1])) as ArrayRef],
    )
    .unwrap();
    let mut buffer = encode_table(&batch).unwrap();
    buffer[0] ^= 0xFF;

    let source = MemoryByteRangeSource::new(buffer);
    let closes = source.close_counter();
    let error = ContainerReader::open(Box::new(source)).await.unwrap_err();

    assert!(matches!(error, StorageError::Corruption(_)));
    assert_eq!(closes.load(std::sync::atomic::Ordering::SeqCst), 1);
}
