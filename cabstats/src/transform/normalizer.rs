use super::record::{NormalizedTripRecord, RawTripRecord, OUTPUT_HEADER, RAW_FIELD_COUNT};
use super::timestamp::{normalize_timestamp, TimestampError};
use crate::error::{Error, Result};
use std::io::{Read, Write};

/// Rewrites trip rows to 24-hour timestamps and tags them with a taxi type.
#[derive(Debug, Clone)]
pub struct Normalizer {
    taxi_type: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformSummary {
    /// Data rows written, header excluded
    pub rows: u64,
}

impl Normalizer {
    pub fn new(taxi_type: impl Into<String>) -> Self {
        Self {
            taxi_type: taxi_type.into(),
        }
    }

    pub fn taxi_type(&self) -> &str {
        &self.taxi_type
    }

    pub fn normalize(
        &self,
        raw: RawTripRecord,
    ) -> std::result::Result<NormalizedTripRecord, TimestampError> {
        let pickup = normalize_timestamp(raw.pickup())?;
        let dropoff = normalize_timestamp(raw.dropoff())?;
        Ok(NormalizedTripRecord::new(raw, pickup, dropoff, &self.taxi_type))
    }

    /// Stream `input` to `output`.
    ///
    /// The first input row is a header and is dropped; the fixed output
    /// header is written first. Any malformed row aborts the run, leaving
    /// only the rows before it in `output`. `on_row` is called after each
    /// written row with the running count.
    pub fn run<R: Read, W: Write>(
        &self,
        input: R,
        output: W,
        mut on_row: impl FnMut(u64),
    ) -> Result<TransformSummary> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);
        let mut writer = csv::Writer::from_writer(output);

        writer.write_record(OUTPUT_HEADER)?;

        let mut summary = TransformSummary::default();
        let mut record = csv::StringRecord::new();

        while reader.read_record(&mut record)? {
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let raw = RawTripRecord::from_csv(&record).ok_or_else(|| Error::MalformedRecord {
                line,
                reason: format!(
                    "expected {} fields, found {}",
                    RAW_FIELD_COUNT,
                    record.len()
                ),
            })?;

            let normalized = self.normalize(raw).map_err(|e| Error::MalformedRecord {
                line,
                reason: e.to_string(),
            })?;

            writer.write_record(normalized.fields())?;
            summary.rows += 1;
            metrics::counter!("cabstats_transform_rows_total").increment(1);
            on_row(summary.rows);
        }

        writer.flush()?;
        Ok(summary)
    }
}
