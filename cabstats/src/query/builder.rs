use super::{FilterRequest, Period, TimeWindow};
use crate::config::AnalyticsConfig;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Output column holding the extracted period value
pub const PERIOD_COLUMN: &str = "period";
/// Output column holding the aggregate value
pub const AGGREGATE_COLUMN: &str = "aggregate";
/// Timestamp column windows and extraction operate on
pub const TIME_COLUMN: &str = "pickupDate";

/// Resolves the dataset a request reads from.
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    default: String,
    vendors: HashMap<String, String>,
}

impl DatasetCatalog {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            vendors: HashMap::new(),
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>, dataset: impl Into<String>) -> Self {
        self.vendors.insert(vendor.into(), dataset.into());
        self
    }

    pub fn resolve(&self, vendor: Option<&str>) -> Result<&str> {
        match vendor {
            None => Ok(&self.default),
            Some(v) => self
                .vendors
                .get(v)
                .map(String::as_str)
                .ok_or_else(|| Error::UnknownVendor(v.to_string())),
        }
    }
}

/// A built statement plus the pieces echoed back to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationQuery {
    statement: String,
    aggregate: String,
    where_clause: Option<String>,
    period: Period,
}

impl AggregationQuery {
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// The full `WHERE ...` clause, if any predicate applied.
    pub fn where_clause(&self) -> Option<&str> {
        self.where_clause.as_deref()
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Aggregate expression followed by the resolved filter, e.g. `count(*) WHERE tip<1`.
    pub fn description(&self) -> String {
        match &self.where_clause {
            Some(clause) => format!("{} {}", self.aggregate, clause),
            None => self.aggregate.clone(),
        }
    }
}

/// Turns filter requests into time-windowed aggregation statements.
///
/// Holds no mutable state; one instance is shared by all request handlers.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    catalog: DatasetCatalog,
    year: i32,
}

impl QueryBuilder {
    pub fn new(catalog: DatasetCatalog, year: i32) -> Self {
        Self { catalog, year }
    }

    pub fn from_config(config: &AnalyticsConfig) -> Self {
        let catalog = config
            .vendors
            .iter()
            .fold(DatasetCatalog::new(&config.dataset), |catalog, (vendor, dataset)| {
                catalog.with_vendor(vendor, dataset)
            });
        Self::new(catalog, config.year)
    }

    pub fn build(&self, request: &FilterRequest) -> Result<AggregationQuery> {
        let aggregate = request.aggregate_expression.trim();
        if aggregate.is_empty() {
            return Err(Error::MissingParameter("aggregate".to_string()));
        }

        let dataset = self.catalog.resolve(request.vendor.as_deref())?;

        let window = TimeWindow::for_period(request.period, request.month, request.day, self.year)?;
        let predicates: Vec<String> = window
            .map(|w| w.predicate(TIME_COLUMN))
            .into_iter()
            .chain(request.extra_predicates.iter().cloned())
            .collect();

        let where_clause = if predicates.is_empty() {
            None
        } else {
            Some(format!("WHERE {}", predicates.join(" AND ")))
        };

        let extraction = format!("DATE_PART_STR({}, \"{}\")", TIME_COLUMN, request.period);
        let mut statement = format!(
            "SELECT {extraction} AS {PERIOD_COLUMN}, {aggregate} AS {AGGREGATE_COLUMN} FROM {dataset}"
        );
        if let Some(clause) = &where_clause {
            statement.push(' ');
            statement.push_str(clause);
        }
        statement.push_str(&format!(
            " GROUP BY {extraction} ORDER BY {PERIOD_COLUMN};"
        ));

        Ok(AggregationQuery {
            statement,
            aggregate: aggregate.to_string(),
            where_clause,
            period: request.period,
        })
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::from_config(&AnalyticsConfig::default())
    }
}
