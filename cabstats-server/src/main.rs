use anyhow::Result;
use cabstats::api::ApiServer;
use cabstats::executor::{AnalyticsClient, QueryExecutor};
use cabstats::query::QueryBuilder;
use clap::Parser;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "cabstats-server")]
#[command(about = "Taxi trip analytics server")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "cabstats.toml")]
    config: String,

    /// Address to bind to (overrides server.bind_addr)
    #[arg(long, env = "CABSTATS_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = cabstats::Config::load_or_create(std::path::Path::new(&args.config))?;
    cabstats::observability::init_tracing(&config.observability)?;

    tracing::info!("Config file: {}", args.config);

    let addr = args.bind.unwrap_or_else(|| config.server.bind_addr.clone());

    // One executor for the process lifetime, injected into the router state
    let executor: Arc<dyn QueryExecutor> = Arc::new(AnalyticsClient::new(&config.analytics)?);
    tracing::info!(
        "Analytics endpoint: {} (dataset={})",
        config.analytics.endpoint,
        config.analytics.dataset
    );

    let builder = QueryBuilder::from_config(&config.analytics);
    let mut server = ApiServer::with_config(executor, builder, &config.server);

    if config.observability.metrics_enabled {
        let handle = cabstats::observability::install_metrics_recorder()?;
        server = server.with_metrics(handle);
        tracing::info!("Metrics enabled at /metrics");
    }

    server.serve(&addr).await?;

    Ok(())
}
