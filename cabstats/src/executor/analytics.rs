//! HTTP client for the analytics query service

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::{QueryExecutor, ResultSet, Row};
use crate::config::AnalyticsConfig;
use crate::error::{Error, Result};

/// Executes statements via `POST {endpoint}/analytics/service`
pub struct AnalyticsClient {
    client: Client,
    url: String,
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct ServiceResponse {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Vec<ServiceError>,
}

#[derive(Deserialize)]
struct ServiceError {
    #[serde(default)]
    code: Option<i64>,
    msg: String,
}

impl ServiceError {
    fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("{}: {}", code, self.msg),
            None => self.msg.clone(),
        }
    }
}

impl AnalyticsClient {
    pub fn new(config: &AnalyticsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            url: format!("{}/analytics/service", config.endpoint.trim_end_matches('/')),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn service_url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QueryExecutor for AnalyticsClient {
    async fn execute(&self, statement: &str) -> Result<ResultSet> {
        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.username, Some(&self.password))
            .form(&[("statement", statement)])
            .send()
            .await?;

        let http_status = response.status();
        let body = response.text().await?;

        let parsed: ServiceResponse = serde_json::from_str(&body).map_err(|e| {
            Error::Executor(format!(
                "unreadable response ({}): {}",
                http_status,
                if body.is_empty() { e.to_string() } else { body.clone() }
            ))
        })?;

        let errors: Vec<String> = parsed.errors.iter().map(ServiceError::describe).collect();

        if !http_status.is_success() {
            let detail = if errors.is_empty() {
                http_status.to_string()
            } else {
                errors.join("; ")
            };
            return Err(Error::Executor(format!("analytics query failed: {}", detail)));
        }

        let rows: Vec<Row> = parsed
            .results
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                other => {
                    tracing::debug!("Skipping non-object result row: {}", other);
                    None
                }
            })
            .collect();

        let status = parsed.status.unwrap_or_else(|| "success".to_string());
        Ok(ResultSet::with_status(rows, status, errors))
    }

    fn name(&self) -> &str {
        "analytics"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_url_trims_trailing_slash() {
        let config = AnalyticsConfig {
            endpoint: "http://analytics.local:8095/".to_string(),
            ..Default::default()
        };
        let client = AnalyticsClient::new(&config).unwrap();
        assert_eq!(client.service_url(), "http://analytics.local:8095/analytics/service");
        assert_eq!(client.name(), "analytics");
    }

    #[test]
    fn test_service_error_description() {
        let response: ServiceResponse = serde_json::from_str(
            r#"{"errors":[{"code":24045,"msg":"Cannot find dataset alltaxis"}],"status":"fatal"}"#,
        )
        .unwrap();
        assert!(response.results.is_empty());
        assert_eq!(response.status.as_deref(), Some("fatal"));
        assert_eq!(
            response.errors[0].describe(),
            "24045: Cannot find dataset alltaxis"
        );
    }
}
