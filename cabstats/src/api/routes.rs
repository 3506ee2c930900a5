use super::error::ApiError;
use super::server::AppState;
use crate::executor::PeriodSeries;
use crate::query::FilterRequest;
use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Instant;

/// Response body of `GET /all`
#[derive(Debug, Serialize)]
pub struct CalendarData {
    pub periods: Vec<f64>,
    pub aggregate: Vec<f64>,
    /// Aggregate expression and resolved filter, echoed for diagnostics
    #[serde(rename = "where")]
    pub where_text: String,
}

/// GET / - redirect to the static front-end
pub async fn index() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/static/")]).into_response()
}

/// GET /all - run one time-windowed aggregation
///
/// e.g. `/all?period=hour&month=5&day=14&aggregate=count(*)&where=fareAmount>15&where=tip<1`
pub async fn aggregate(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<CalendarData>, ApiError> {
    let request = FilterRequest::from_query_string(raw.as_deref().unwrap_or_default())?;
    let query = state.builder.build(&request)?;
    tracing::debug!(executor = state.executor.name(), "Statement: {}", query.statement());

    let start = Instant::now();
    let results = state.executor.execute(query.statement()).await?;
    let series = PeriodSeries::collect(results)?;

    metrics::counter!("cabstats_queries_total", "period" => query.period().as_str())
        .increment(1);
    metrics::histogram!("cabstats_query_duration_seconds").record(start.elapsed().as_secs_f64());
    tracing::info!(
        "Aggregated {} {} periods in {:?}",
        series.len(),
        query.period(),
        start.elapsed()
    );

    Ok(Json(CalendarData {
        periods: series.periods,
        aggregate: series.aggregates,
        where_text: query.description(),
    }))
}

/// GET /metrics - Prometheus exposition
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}
