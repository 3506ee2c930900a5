//! One-off dataset transform
//!
//! Reads the raw trip CSV, rewrites both 12-hour timestamps to 24-hour form
//! and appends a taxi-type tag, so the file can be loaded for querying.

pub mod normalizer;
pub mod record;
pub mod timestamp;

pub use normalizer::{Normalizer, TransformSummary};
pub use record::{NormalizedTripRecord, RawTripRecord, OUTPUT_HEADER, RAW_FIELD_COUNT};
pub use timestamp::{normalize_timestamp, Meridiem, TimestampError};

use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Instant;

/// File written when no output path is configured
pub const DEFAULT_OUTPUT_FILE: &str = "2016_Green_Taxi_Trip_Data.csv";

/// Tag appended to every record when none is configured
pub const DEFAULT_TAXI_TYPE: &str = "green";

/// Normalize the CSV at `input` into `output`.
pub fn run_transform(
    input: &Path,
    output: &Path,
    taxi_type: &str,
    on_row: impl FnMut(u64),
) -> Result<TransformSummary> {
    let start = Instant::now();
    let source = File::open(input)?;
    let dest = File::create(output)?;

    tracing::info!(
        "Normalizing {} -> {} (type={})",
        input.display(),
        output.display(),
        taxi_type
    );

    let summary = Normalizer::new(taxi_type).run(
        BufReader::new(source),
        BufWriter::new(dest),
        on_row,
    )?;

    tracing::info!(
        "Wrote {} rows to {} in {:.2}s",
        summary.rows,
        output.display(),
        start.elapsed().as_secs_f64()
    );

    Ok(summary)
}
