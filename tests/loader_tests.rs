//! File loading through `RegressionEngine::load_file`.

use std::io::Write;
use std::sync::Arc;

use approx::assert_relative_eq;
use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::tempdir;

use linear_regressor::data::model::ColumnKind;
use linear_regressor::{EngineState, RegressionEngine, RegressionError, Separator};

#[test]
fn test_csv_file_with_pipe_separator() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pipes.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "id|hours|score").unwrap();
    writeln!(file, "1|1.0|42.5").unwrap();
    writeln!(file, "2|2.0|47.0").unwrap();
    writeln!(file, "3|N/A|50.0").unwrap();
    writeln!(file, "4|4.0|56.0").unwrap();
    drop(file);

    let mut engine = RegressionEngine::new();
    let dataset = engine.load_file(&path, Separator::Pipe).unwrap();
    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.column("hours").unwrap().missing_count(), 1);

    engine.select_columns("hours", "score").unwrap();
    engine.fit().unwrap();
    assert_eq!(engine.metrics().unwrap().n_samples, 3);
}

#[test]
fn test_wrong_separator_gives_single_text_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("semi.csv");
    std::fs::write(&path, "x;y\n1;2\n2;3\n").unwrap();

    let mut engine = RegressionEngine::new();
    let dataset = engine.load_file(&path, Separator::Comma).unwrap();
    assert_eq!(dataset.columns().len(), 1);
    assert_eq!(dataset.columns()[0].kind(), ColumnKind::Text);
    assert!(engine.select_columns("x", "y").is_err());
}

#[test]
fn test_missing_file_is_data_load_error() {
    let dir = tempdir().unwrap();
    let mut engine = RegressionEngine::new();
    let err = engine
        .load_file(&dir.path().join("absent.csv"), Separator::Comma)
        .unwrap_err();
    assert!(matches!(err, RegressionError::DataLoad(_)));
    assert_eq!(engine.state(), EngineState::Empty);
}

#[test]
fn test_parquet_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("table.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("x", DataType::Int32, false),
        Field::new("y", DataType::Float64, true),
        Field::new("label", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int32Array::from(vec![1, 2, 3, 4])),
            Arc::new(Float64Array::from(vec![Some(3.0), Some(5.0), None, Some(9.0)])),
            Arc::new(StringArray::from(vec!["a", "b", "c", "d"])),
        ],
    )
    .unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let mut engine = RegressionEngine::new();
    let dataset = engine.load_file(&path, Separator::Comma).unwrap();
    assert_eq!(dataset.column_names(), vec!["x", "y", "label"]);
    assert_eq!(dataset.column("label").unwrap().kind(), ColumnKind::Text);

    engine.select_columns("x", "y").unwrap();
    let model = engine.fit().unwrap();
    assert_relative_eq!(model.slope, 2.0, epsilon = 1e-12);
    assert_relative_eq!(model.intercept, 1.0, epsilon = 1e-12);

    engine.select_columns("x", "label").unwrap();
    assert!(matches!(
        engine.fit(),
        Err(RegressionError::NonNumericColumn { .. })
    ));
}
