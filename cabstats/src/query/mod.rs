//! Temporal query building
//!
//! Translates a [`FilterRequest`] (period, month, day, free-form predicates,
//! optional vendor) into one aggregation statement grouped by the period.

pub mod builder;
pub mod period;
pub mod request;
pub mod window;

pub use builder::{
    AggregationQuery, DatasetCatalog, QueryBuilder, AGGREGATE_COLUMN, PERIOD_COLUMN, TIME_COLUMN,
};
pub use period::Period;
pub use request::FilterRequest;
pub use window::{Bound, TimeWindow};
