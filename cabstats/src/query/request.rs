//! Filter request accepted by the query builder.

use super::Period;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Parameters of a single aggregation request.
///
/// `extra_predicates` are trusted, pre-validated filter text. They are
/// inserted into the statement verbatim, without escaping or parentheses,
/// so callers exposing this to untrusted input own that trust boundary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
    pub aggregate_expression: String,
    #[serde(default)]
    pub extra_predicates: Vec<String>,
    #[serde(default)]
    pub vendor: Option<String>,
}

impl FilterRequest {
    pub fn new(aggregate_expression: impl Into<String>) -> Self {
        Self {
            aggregate_expression: aggregate_expression.into(),
            ..Default::default()
        }
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    pub fn with_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.extra_predicates.push(predicate.into());
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    /// Build a request from a raw, still percent-encoded query string.
    ///
    /// Decoding is lossy and never fails: invalid escapes pass through and
    /// invalid UTF-8 becomes U+FFFD, so every rejection surfaces as a typed
    /// error from [`FilterRequest::from_query_pairs`].
    pub fn from_query_string(raw: &str) -> Result<Self> {
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(raw.as_bytes())
            .into_owned()
            .collect();
        Self::from_query_pairs(&pairs)
    }

    /// Build a request from decoded URL query pairs.
    ///
    /// Recognized keys: `aggregate` (required), `period`, `month`, `day`,
    /// `vendor` and any number of `where`. For single-valued keys the first
    /// occurrence wins. Unknown keys are ignored, and so are `month`/`day`
    /// when the period does not use them.
    ///
    /// e.g. `period=hour&month=5&day=14&aggregate=count(*)&where=fareAmount>15&where=tip<1`
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Result<Self> {
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let aggregate_expression = first("aggregate")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::MissingParameter("aggregate".to_string()))?
            .to_string();

        let period = match first("period") {
            Some(p) => p.parse()?,
            None => Period::default(),
        };

        let month = match period {
            Period::Day | Period::Hour => first("month")
                .map(|v| parse_number("month", v, MONTH_RANGE))
                .transpose()?,
            Period::Month => None,
        };
        let day = match period {
            Period::Hour => first("day")
                .map(|v| parse_number("day", v, DAY_RANGE))
                .transpose()?,
            Period::Month | Period::Day => None,
        };

        let extra_predicates = pairs
            .iter()
            .filter(|(k, v)| k == "where" && !v.trim().is_empty())
            .map(|(_, v)| v.clone())
            .collect();

        let vendor = first("vendor")
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Ok(Self {
            period,
            month,
            day,
            aggregate_expression,
            extra_predicates,
            vendor,
        })
    }
}

pub(crate) const MONTH_RANGE: RangeInclusive<u32> = 1..=12;
pub(crate) const DAY_RANGE: RangeInclusive<u32> = 1..=31;

fn parse_number(field: &str, value: &str, range: RangeInclusive<u32>) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| range.contains(n))
        .ok_or_else(|| Error::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        })
}
