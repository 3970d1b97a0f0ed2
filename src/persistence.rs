//! ## Persisting Fitted Discretizers
//!
//! A [`Discretizer`] is stored as a single-row Arrow [`RecordBatch`]:
//!
//! | column         | type            |
//! |----------------|-----------------|
//! | `breakpoints`  | `List<Float64>` |
//! | `labels`       | `List<Utf8>`    |
//! | `bin_count`    | `UInt64`        |
//! | `prefix`       | `Utf8`          |
//! | `label_scheme` | `Utf8`          |
//! | `keep_missing` | `Boolean`       |
//!
//! The batch can be written to and read from Parquet. Loading always re-validates the model, so
//! corrupted state surfaces as [`DiscretizerError::InvalidModel`].

use crate::exceptions::{DiscretizerError, DiscretizerResult};
use crate::labels::LabelScheme;
use crate::model::Discretizer;
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, ListArray, ListBuilder, StringArray,
    StringBuilder, UInt64Array,
};
use arrow::datatypes::{DataType, Field, Float64Type, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::file::reader::ChunkReader;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

const BREAKPOINTS: &str = "breakpoints";
const LABELS: &str = "labels";
const BIN_COUNT: &str = "bin_count";
const PREFIX: &str = "prefix";
const LABEL_SCHEME: &str = "label_scheme";
const KEEP_MISSING: &str = "keep_missing";

/// Schema of a persisted discretizer.
pub fn model_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(
            BREAKPOINTS,
            DataType::List(Arc::new(Field::new("item", DataType::Float64, true))),
            false,
        ),
        Field::new(
            LABELS,
            DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
            false,
        ),
        Field::new(BIN_COUNT, DataType::UInt64, false),
        Field::new(PREFIX, DataType::Utf8, false),
        Field::new(LABEL_SCHEME, DataType::Utf8, false),
        Field::new(KEEP_MISSING, DataType::Boolean, false),
    ]))
}

/// Encodes a discretizer as a single-row record batch.
pub fn to_record_batch(model: &Discretizer) -> DiscretizerResult<RecordBatch> {
    let breakpoints = ListArray::from_iter_primitive::<Float64Type, _, _>(vec![Some(
        model.breakpoints().iter().copied().map(Some).collect::<Vec<_>>(),
    )]);

    let mut labels = ListBuilder::new(StringBuilder::new());
    for label in model.labels() {
        labels.values().append_value(label);
    }
    labels.append(true);

    let columns: Vec<ArrayRef> = vec![
        Arc::new(breakpoints),
        Arc::new(labels.finish()),
        Arc::new(UInt64Array::from(vec![model.bin_count() as u64])),
        Arc::new(StringArray::from(vec![model.prefix()])),
        Arc::new(StringArray::from(vec![model.label_scheme().as_str()])),
        Arc::new(BooleanArray::from(vec![model.keep_missing()])),
    ];
    Ok(RecordBatch::try_new(model_schema(), columns)?)
}

/// Decodes a discretizer from a single-row record batch.
pub fn from_record_batch(batch: &RecordBatch) -> DiscretizerResult<Discretizer> {
    if batch.num_rows() != 1 {
        return Err(DiscretizerError::InvalidModel(format!(
            "expected exactly one row, found {}",
            batch.num_rows()
        )));
    }

    let breakpoints_list = column::<ListArray>(batch, BREAKPOINTS)?.value(0);
    let breakpoints = downcast::<Float64Array>(breakpoints_list.as_ref(), BREAKPOINTS)?
        .iter()
        .map(|b| b.ok_or_else(|| null_in(BREAKPOINTS)))
        .collect::<DiscretizerResult<Vec<f64>>>()?;

    let labels_list = column::<ListArray>(batch, LABELS)?.value(0);
    let labels = downcast::<StringArray>(labels_list.as_ref(), LABELS)?
        .iter()
        .map(|l| l.map(str::to_string).ok_or_else(|| null_in(LABELS)))
        .collect::<DiscretizerResult<Vec<String>>>()?;

    let bin_count = usize::try_from(column::<UInt64Array>(batch, BIN_COUNT)?.value(0))
        .map_err(|_| DiscretizerError::InvalidModel("bin count does not fit in memory".into()))?;
    let prefix = column::<StringArray>(batch, PREFIX)?.value(0).to_string();
    let scheme_name = column::<StringArray>(batch, LABEL_SCHEME)?.value(0);
    let label_scheme = LabelScheme::parse(scheme_name).ok_or_else(|| {
        DiscretizerError::InvalidModel(format!("unknown label scheme '{}'", scheme_name))
    })?;
    let keep_missing = column::<BooleanArray>(batch, KEEP_MISSING)?.value(0);

    Discretizer::from_parts(
        breakpoints,
        bin_count,
        prefix,
        labels,
        label_scheme,
        keep_missing,
    )
}

/// Writes a discretizer as Parquet.
pub fn write_parquet<W: Write + Send>(model: &Discretizer, writer: W) -> DiscretizerResult<()> {
    let batch = to_record_batch(model)?;
    let mut writer = ArrowWriter::try_new(writer, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Reads a discretizer from Parquet.
pub fn read_parquet<R: ChunkReader + 'static>(reader: R) -> DiscretizerResult<Discretizer> {
    let mut batches = ParquetRecordBatchReaderBuilder::try_new(reader)?.build()?;
    let batch = batches
        .next()
        .ok_or_else(|| DiscretizerError::InvalidModel("no rows found".to_string()))??;
    from_record_batch(&batch)
}

/// Saves a discretizer to a Parquet file.
pub fn save(model: &Discretizer, path: impl AsRef<Path>) -> DiscretizerResult<()> {
    write_parquet(model, File::create(path)?)
}

/// Loads a discretizer from a Parquet file.
pub fn load(path: impl AsRef<Path>) -> DiscretizerResult<Discretizer> {
    read_parquet(File::open(path)?)
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> DiscretizerResult<&'a T> {
    let array = batch
        .column_by_name(name)
        .ok_or_else(|| DiscretizerError::InvalidModel(format!("column '{}' not found", name)))?;
    if array.is_null(0) {
        return Err(null_in(name));
    }
    downcast::<T>(array.as_ref(), name)
}

fn downcast<'a, T: 'static>(array: &'a dyn Array, name: &str) -> DiscretizerResult<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        DiscretizerError::InvalidModel(format!(
            "column '{}' has unexpected type {:?}",
            name,
            array.data_type()
        ))
    })
}

fn null_in(name: &str) -> DiscretizerError {
    DiscretizerError::InvalidModel(format!("column '{}' contains nulls", name))
}
