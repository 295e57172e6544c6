use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use ndarray::ArrayViewD;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::format::KeyValue;

use crate::error::{ExtractError, Result};
use crate::spectrum::Spectrum;

/// Column names of the flattened table
pub mod columns {
    /// Wavelength in microns
    pub const WAVELENGTH: &str = "wavelength";
    /// Flux
    pub const FLUX: &str = "flux";
    /// Flux error
    pub const FLUX_ERROR: &str = "flux_error";
    /// Hours since the first integration (time series only)
    pub const TIME: &str = "time";
}

/// Schema-level metadata key holding the flux unit label
pub const FLUX_UNIT_KEY: &str = "flux_unit";

/// Parquet writer settings for dataframe output
#[derive(Debug, Clone)]
pub struct DataFrameWriterConfig {
    /// ZSTD compression level
    pub compression_level: i32,
    /// Maximum rows per row group
    pub row_group_size: usize,
    /// Whether to write column chunk statistics
    pub write_statistics: bool,
}

impl Default for DataFrameWriterConfig {
    fn default() -> Self {
        Self {
            compression_level: 3,
            row_group_size: 64 * 1024,
            write_statistics: true,
        }
    }
}

impl DataFrameWriterConfig {
    fn to_writer_properties(&self, metadata: &HashMap<String, String>) -> WriterProperties {
        let compression =
            Compression::ZSTD(ZstdLevel::try_new(self.compression_level).unwrap_or_default());

        let statistics = if self.write_statistics {
            EnabledStatistics::Chunk
        } else {
            EnabledStatistics::None
        };

        let kv_metadata: Vec<KeyValue> = metadata
            .iter()
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: Some(v.clone()),
            })
            .collect();

        WriterProperties::builder()
            .set_compression(compression)
            .set_statistics_enabled(statistics)
            .set_max_row_group_size(self.row_group_size)
            // float samples rarely repeat
            .set_dictionary_enabled(false)
            .set_key_value_metadata(Some(kv_metadata))
            .build()
    }
}

/// Flatten with the last axis outermost, so for `(n, t)` arrays all `n`
/// wavelength samples of integration 0 come first.
fn flatten_time_major(array: ArrayViewD<'_, f64>) -> Vec<f64> {
    array.t().iter().copied().collect()
}

/// Build the flat table for a spectrum.
///
/// Fails with [`ExtractError::ShapeError`] for arrays of rank other than 1 or 2.
pub fn to_record_batch(spectrum: &Spectrum) -> Result<RecordBatch> {
    if !matches!(spectrum.ndim(), 1 | 2) {
        return Err(ExtractError::ShapeError(format!(
            "cannot flatten arrays of rank {} into a dataframe",
            spectrum.ndim()
        )));
    }

    let mut fields = vec![
        Field::new(columns::WAVELENGTH, DataType::Float64, false),
        Field::new(columns::FLUX, DataType::Float64, false),
        Field::new(columns::FLUX_ERROR, DataType::Float64, false),
    ];
    let mut arrays: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(flatten_time_major(spectrum.wavelength()))),
        Arc::new(Float64Array::from(flatten_time_major(spectrum.flux()))),
        Arc::new(Float64Array::from(flatten_time_major(spectrum.flux_error()))),
    ];

    if let Some(time) = spectrum.time() {
        let n = spectrum.len();
        let repeated: Vec<f64> = time
            .iter()
            .flat_map(|&t| std::iter::repeat(t).take(n))
            .collect();
        fields.push(Field::new(columns::TIME, DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(repeated)));
    }

    let metadata = HashMap::from([(
        FLUX_UNIT_KEY.to_string(),
        spectrum.flux_unit().label().to_string(),
    )]);
    let schema = Arc::new(Schema::new_with_metadata(fields, metadata));
    Ok(RecordBatch::try_new(schema, arrays)?)
}

/// Write a dataframe to Parquet with ZSTD compression
pub fn write_parquet<W: Write + Send>(
    batch: &RecordBatch,
    writer: W,
    config: &DataFrameWriterConfig,
) -> Result<()> {
    let props = config.to_writer_properties(batch.schema().metadata());
    let mut writer = ArrowWriter::try_new(writer, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

/// Write a dataframe as CSV with a header row
pub fn write_csv<W: Write>(batch: &RecordBatch, writer: W) -> Result<()> {
    let schema = batch.schema();
    let columns = batch
        .columns()
        .iter()
        .zip(schema.fields())
        .map(|(column, field)| {
            column
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| {
                    ArrowError::SchemaError(format!(
                        "column '{}' is {}, expected Float64",
                        field.name(),
                        column.data_type()
                    ))
                })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(schema.fields().iter().map(|f| f.name().as_str()))?;
    for row in 0..batch.num_rows() {
        csv.write_record(columns.iter().map(|c| c.value(row).to_string()))?;
    }
    csv.flush()?;
    Ok(())
}
