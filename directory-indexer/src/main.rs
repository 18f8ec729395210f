use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::{error, info, warn};

use directory_indexer::logging::{init_logging, LogFormat};
use directory_indexer::{Dependencies, IndexingError, Settings};
use directory_pipeline::{DataProcess, PipelineError};

#[derive(Parser)]
#[command(name = "directory-indexer")]
#[command(
    about = "Load company directory files into the search index and query it",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    settings: Settings,

    /// Log output format (text|json)
    #[arg(long, env = "LOG_FORMAT", global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initial load of an empty index from a file
    Restore {
        /// Semicolon-delimited input file with a header line
        path: PathBuf,
    },
    /// Upsert every record of a file into the index
    Update {
        /// Semicolon-delimited input file with a header line
        path: PathBuf,
    },
    /// Fetch one page of companies, printed as JSON
    Search {
        /// Fuzzy match on the company name
        #[arg(long)]
        name: Option<String>,

        /// Exact match on the postal code
        #[arg(long)]
        zip: Option<String>,

        /// Cursor returned by a previous page; filters are ignored when set
        #[arg(long)]
        scroll_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();
    init_logging(LogFormat::from_env_value(cli.log_format.as_deref()));

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let dependencies = Dependencies::new(&cli.settings).await?;
    let data_process = dependencies.data_process;

    let result = tokio::select! {
        result = execute(&data_process, cli.command) => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, shutting down");
            Ok(())
        }
    };

    if let Err(e) = data_process.shutdown().await {
        warn!(error = %e, "Failed to release store resources");
    }
    result
}

async fn execute(data_process: &DataProcess, command: Commands) -> Result<()> {
    let output = match command {
        Commands::Restore { path } => {
            info!(path = %path.display(), "Starting restore");
            data_process.restore(&path).await?.message.to_string()
        }
        Commands::Update { path } => {
            info!(path = %path.display(), "Starting update");
            let report = data_process.update(&path).await?;
            for failure in &report.failures {
                warn!(doc_id = %failure.id, error = %failure.error, "Document not updated");
            }
            report.message.to_string()
        }
        Commands::Search {
            name,
            zip,
            scroll_id,
        } => {
            let page = data_process.retrieve(name, zip, scroll_id).await?;
            serde_json::to_string_pretty(&page).map_err(IndexingError::from)?
        }
    };

    writeln!(std::io::stdout().lock(), "{}", output).context("failed to write to stdout")?;
    Ok(())
}

/// Print a pipeline failure as the error body an HTTP caller would receive,
/// anything else as a plain error chain.
fn report_failure(e: &anyhow::Error) {
    let pipeline_error = e.downcast_ref::<PipelineError>().or_else(|| {
        e.downcast_ref::<IndexingError>().and_then(|err| match err {
            IndexingError::PipelineError(inner) => Some(inner),
            _ => None,
        })
    });

    match pipeline_error {
        Some(err) => {
            error!(kind = err.kind(), cause = %err, "Command failed");
            let body = serde_json::json!({
                "error": err.kind(),
                "message": err.message(),
                "status": err.status_code(),
            });
            eprintln!("{}", body);
        }
        None => {
            error!("Command failed: {:#}", e);
            eprintln!("Error: {:#}", e);
        }
    }
}
