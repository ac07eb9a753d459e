//! Apache Parquet candle exports.

use arrow::array::{Float64Array, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use clibra_aggregate::Candle;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;

use crate::{FormatError, Formatter};

/// Parquet formatter.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Rows per row group, also the batch size handed to Arrow.
    row_group_size: usize,
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size. Zero is treated as one.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = if size == 0 { 1 } else { size };
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Arrow schema matching the partition columns.
    pub(crate) fn candle_schema() -> Schema {
        let price = |name: &str| Field::new(name, DataType::Float64, false);
        Schema::new(vec![
            Field::new(
                "datetime",
                DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
                false,
            ),
            price("open"),
            price("high"),
            price("low"),
            price("close"),
            price("volume"),
            price("buyVolume"),
            price("sellVolume"),
        ])
    }

    fn candles_to_batch(schema: SchemaRef, candles: &[Candle]) -> Result<RecordBatch, FormatError> {
        let column = |f: fn(&Candle) -> f64| Float64Array::from_iter_values(candles.iter().map(f));
        let timestamps = TimestampMicrosecondArray::from_iter_values(
            candles.iter().map(|c| c.timestamp.timestamp_micros()),
        )
        .with_timezone("UTC");

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(timestamps),
                Arc::new(column(|c| c.open)),
                Arc::new(column(|c| c.high)),
                Arc::new(column(|c| c.low)),
                Arc::new(column(|c| c.close)),
                Arc::new(column(|c| c.volume)),
                Arc::new(column(|c| c.buy_volume)),
                Arc::new(column(|c| c.sell_volume)),
            ],
        )
        .map_err(|e| FormatError::Parquet(e.to_string()))
    }
}

impl Formatter for ParquetFormatter {
    fn write_candles<W: Write + Send>(
        &self,
        candles: &[Candle],
        writer: W,
    ) -> Result<(), FormatError> {
        let schema: SchemaRef = Arc::new(Self::candle_schema());
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, Arc::clone(&schema), Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        for chunk in candles.chunks(self.row_group_size) {
            let batch = Self::candles_to_batch(Arc::clone(&schema), chunk)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;

    fn create_test_candles(n: u32) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let ts = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
                    + chrono::TimeDelta::seconds(i64::from(i));
                let p = f64::from(i);
                Candle::new(ts, p, p + 1.0, p - 1.0, p, 2.0, 1.0, 1.0)
            })
            .collect()
    }

    #[test]
    fn test_parquet_magic() {
        let formatter = ParquetFormatter::new();
        let mut output = Cursor::new(Vec::new());

        formatter
            .write_candles(&create_test_candles(3), &mut output)
            .unwrap();

        let data = output.into_inner();
        assert!(data.len() > 8);
        assert_eq!(&data[0..4], b"PAR1");
        assert_eq!(&data[data.len() - 4..], b"PAR1");
    }

    #[test]
    fn test_small_row_groups() {
        let formatter = ParquetFormatter::new().with_row_group_size(2);
        let mut output = Cursor::new(Vec::new());

        formatter
            .write_candles(&create_test_candles(5), &mut output)
            .unwrap();
        assert!(!output.into_inner().is_empty());
    }

    #[test]
    fn test_candle_schema() {
        let schema = ParquetFormatter::candle_schema();
        assert_eq!(schema.fields().len(), 8);
        assert!(schema.field_with_name("datetime").is_ok());
        assert!(schema.field_with_name("buyVolume").is_ok());
        assert!(schema.field_with_name("sellVolume").is_ok());
    }
}
