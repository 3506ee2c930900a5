use crate::config::{CorsConfig, ServerConfig};
use crate::executor::QueryExecutor;
use crate::query::QueryBuilder;
use crate::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<dyn QueryExecutor>,
    pub builder: Arc<QueryBuilder>,
    pub metrics: Option<PrometheusHandle>,
}

pub struct ApiServer {
    executor: Arc<dyn QueryExecutor>,
    builder: Arc<QueryBuilder>,
    metrics: Option<PrometheusHandle>,
    static_dir: PathBuf,
    cors_config: CorsConfig,
}

impl ApiServer {
    /// The executor is created once by the caller and shared by every request.
    pub fn new(executor: Arc<dyn QueryExecutor>, builder: QueryBuilder) -> Self {
        Self::with_config(executor, builder, &ServerConfig::default())
    }

    pub fn with_config(
        executor: Arc<dyn QueryExecutor>,
        builder: QueryBuilder,
        config: &ServerConfig,
    ) -> Self {
        Self {
            executor,
            builder: Arc::new(builder),
            metrics: None,
            static_dir: config.static_dir.clone(),
            cors_config: config.cors.clone(),
        }
    }

    /// Serve GET /metrics from this recorder handle
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Build CORS layer from configuration
    fn build_cors_layer(&self) -> CorsLayer {
        if !self.cors_config.enabled {
            return CorsLayer::new();
        }

        let origins: Vec<HeaderValue> = self
            .cors_config
            .origins
            .iter()
            .filter(|o| o.as_str() != "*")
            .filter_map(|o| o.parse().ok())
            .collect();

        let has_wildcard = self.cors_config.origins.iter().any(|o| o == "*");

        let cors = if has_wildcard {
            CorsLayer::new().allow_origin(tower_http::cors::Any)
        } else if origins.is_empty() {
            CorsLayer::new()
        } else {
            CorsLayer::new().allow_origin(origins)
        };

        cors.allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(tower_http::cors::Any)
    }

    pub fn router(&self) -> Router {
        let state = AppState {
            executor: self.executor.clone(),
            builder: self.builder.clone(),
            metrics: self.metrics.clone(),
        };

        Router::new()
            .route("/", get(crate::api::routes::index))
            .route("/all", get(crate::api::routes::aggregate))
            .route("/health", get(crate::api::routes::health))
            .route("/metrics", get(crate::api::routes::metrics))
            .nest_service("/static", ServeDir::new(&self.static_dir))
            .with_state(state)
            .layer(self.build_cors_layer())
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until Ctrl-C
    pub async fn serve(self, addr: &str) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server running on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for interrupt: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Stopping server");
}
