use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "cabstats")]
#[command(about = "cabstats CLI - trip dataset tools")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "cabstats.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite the raw taxi CSV with 24-hour timestamps for loading
    Reformat {
        /// Path to the raw taxi CSV
        #[arg(long)]
        csv: PathBuf,

        /// Output file (defaults to transform.output from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Taxi type tag appended to every row (defaults to transform.taxi_type)
        #[arg(long)]
        taxi_type: Option<String>,

        /// Disable progress output
        #[arg(long)]
        no_progress: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cabstats::Config::load(std::path::Path::new(&cli.config))?;
    cabstats::observability::init_tracing(&config.observability)?;

    match cli.command {
        Commands::Reformat {
            csv,
            output,
            taxi_type,
            no_progress,
        } => {
            let output = output.unwrap_or_else(|| config.transform.output.clone());
            let taxi_type = taxi_type.unwrap_or_else(|| config.transform.taxi_type.clone());
            tracing::info!("Reformatting {} -> {}", csv.display(), output.display());
            commands::run_reformat(&csv, &output, &taxi_type, no_progress)?;
        }
    }

    Ok(())
}
