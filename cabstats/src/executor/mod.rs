//! Query execution against the analytics service

pub mod analytics;

pub use analytics::AnalyticsClient;

use crate::error::{Error, Result};
use crate::query::{AGGREGATE_COLUMN, PERIOD_COLUMN};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

/// One result row, keyed by output column name
pub type Row = Map<String, Value>;

/// Executes built statements.
///
/// Implementations are constructed once at startup and shared across requests.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a statement and return its rows
    async fn execute(&self, statement: &str) -> Result<ResultSet>;

    /// Human-readable executor name
    fn name(&self) -> &str;
}

/// Rows returned by an executor along with the service's completion status.
///
/// Iterate the rows, then call [`ResultSet::close`] to learn whether the
/// service finished cleanly.
#[derive(Debug)]
pub struct ResultSet {
    rows: std::vec::IntoIter<Row>,
    status: String,
    errors: Vec<String>,
}

impl ResultSet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self::with_status(rows, "success", Vec::new())
    }

    pub fn with_status(rows: Vec<Row>, status: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            rows: rows.into_iter(),
            status: status.into(),
            errors,
        }
    }

    /// Finalize the result, failing if the service reported errors.
    pub fn close(self) -> Result<()> {
        if !self.errors.is_empty() {
            return Err(Error::Executor(self.errors.join("; ")));
        }
        if self.status != "success" {
            return Err(Error::Executor(format!(
                "query finished with status '{}'",
                self.status
            )));
        }
        Ok(())
    }
}

impl Iterator for ResultSet {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.rows.next()
    }
}

/// Period values and their aggregates, in result order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodSeries {
    pub periods: Vec<f64>,
    pub aggregates: Vec<f64>,
}

impl PeriodSeries {
    /// Read `period`/`aggregate` from every row, then close the result.
    ///
    /// Rows without a period column are skipped. Other columns are ignored.
    pub fn collect(mut results: ResultSet) -> Result<Self> {
        let mut series = PeriodSeries::default();

        for row in results.by_ref() {
            let Some(period) = row.get(PERIOD_COLUMN) else {
                continue;
            };
            let period = as_number(PERIOD_COLUMN, period)?;
            let aggregate = row
                .get(AGGREGATE_COLUMN)
                .ok_or_else(|| Error::Executor(format!("row is missing '{}'", AGGREGATE_COLUMN)))
                .and_then(|v| as_number(AGGREGATE_COLUMN, v))?;

            series.periods.push(period);
            series.aggregates.push(aggregate);
        }

        results.close()?;
        Ok(series)
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

fn as_number(column: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| Error::Executor(format!("column '{}' is not numeric: {}", column, value)))
}
