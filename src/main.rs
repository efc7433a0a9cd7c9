//! CLI entry point for the student analytics tool.
//!
//! Provides a subcommand to serve the JSON API and one-shot subcommands that
//! run a single query against the CSV snapshot and print the result.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;
use student_analytics::analytics::Analytics;
use student_analytics::analytics::types::SummaryRow;
use student_analytics::config::{
    DEFAULT_DATA_DIR, DEFAULT_FRONTEND_ORIGIN, DEFAULT_HOST, DEFAULT_LOG_FILE_PATH,
    DEFAULT_PORT, DataPaths, ServerConfig, log_file_location,
};
use student_analytics::dataset::loader::load_dataset;
use student_analytics::output::{append_records, print_json, print_pretty};
use student_analytics::server;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "student_analytics")]
#[command(about = "Per-student academic analytics over assessment records", long_about = None)]
struct Cli {
    /// Directory containing studentAssessment.csv, studentRegistration.csv and studentInfo.csv
    #[arg(long, global = true, env = "STUDENT_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Directory searched when a CSV is missing from the data directory
    #[arg(long, global = true, env = "STUDENT_FALLBACK_DATA_DIR")]
    fallback_data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API
    Serve {
        /// Address to bind
        #[arg(long, env = "STUDENT_API_HOST", default_value_t = DEFAULT_HOST)]
        host: IpAddr,

        /// Port to listen on
        #[arg(short, long, env = "STUDENT_API_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Origin allowed by CORS
        #[arg(long, env = "FRONTEND_ORIGIN", default_value = DEFAULT_FRONTEND_ORIGIN)]
        frontend_origin: String,
    },
    /// Average, tier and predicted next score for a student
    Summary { student_id: i64 },
    /// Completed modules of a student
    Modules { student_id: i64 },
    /// Assessment table of a student
    Assessments { student_id: i64 },
    /// Score distribution of an assessment and the student's place in it
    Analytics { assessment_id: i64, student_id: i64 },
    /// Rank of a student among peers sharing a module
    Rank { student_id: i64 },
    /// Append summary rows for several students to a CSV file
    Report {
        #[arg(required = true)]
        student_ids: Vec<i64>,

        /// CSV file to append results to
        #[arg(short, long, default_value = "summaries.csv")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE_PATH.to_string());
    let (log_dir, log_file_name) = log_file_location(&log_file_path);

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let paths = DataPaths::new(cli.data_dir, cli.fallback_data_dir);
    let dataset = load_dataset(&paths)?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            frontend_origin,
        } => {
            let config = ServerConfig {
                host,
                port,
                frontend_origin,
            };
            server::serve(&config, dataset).await?;
        }
        Commands::Summary { student_id } => {
            let summary = Analytics::new(&dataset).student_summary(student_id);
            print_pretty(&summary);
            print_json(&summary)?;
        }
        Commands::Modules { student_id } => {
            print_json(&Analytics::new(&dataset).completed_modules(student_id))?;
        }
        Commands::Assessments { student_id } => {
            print_json(&Analytics::new(&dataset).student_assessments(student_id))?;
        }
        Commands::Analytics {
            assessment_id,
            student_id,
        } => {
            let result = Analytics::new(&dataset).assessment_analytics(assessment_id, student_id)?;
            print_json(&result)?;
        }
        Commands::Rank { student_id } => {
            print_json(&Analytics::new(&dataset).student_rank(student_id)?)?;
        }
        Commands::Report {
            student_ids,
            output,
        } => {
            let analytics = Analytics::new(&dataset);
            let rows: Vec<SummaryRow> = student_ids
                .iter()
                .map(|id| SummaryRow::from(&analytics.student_summary(*id)))
                .collect();
            append_records(&output, &rows)?;
            info!(students = rows.len(), output = %output.display(), "Report complete");
        }
    }

    Ok(())
}
