//! CLI entry point for the student record analyzer.
//!
//! Provides subcommands for extracting a record and its grade averages from a
//! CSV export, and for writing a Markdown report with an optional narrative
//! assessment.

mod infra;
mod services;

use crate::infra::anthropic::{AnthropicClient, NarrativeConfig};
use crate::services::narrative_api::NarrativeApi;
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use saenggibu_analyzer::analyzers::insights::derive_insights;
use saenggibu_analyzer::{
    GradePolicy, MalformedInputError, StudentRecord, extract_csv,
    fetch::load_source,
    output::{print_json, print_pretty, render_report, write_grades_csv},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "saenggibu_analyzer")]
#[command(about = "A tool to analyze student record CSV exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract remarks, grades and averages from a record export
    Analyze {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// How to print the extracted record
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// JSON file overriding the main subjects or the total rule
        #[arg(short, long)]
        policy: Option<PathBuf>,

        /// Optional: CSV file to write one row per course to
        #[arg(long)]
        grades_csv: Option<PathBuf>,
    },
    /// Write a Markdown report, optionally with a narrative assessment
    Report {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Report file to write
        #[arg(short, long, default_value = "report.md")]
        out: PathBuf,

        /// JSON file overriding the main subjects or the total rule
        #[arg(short, long)]
        policy: Option<PathBuf>,

        /// Append a narrative from the Anthropic API (needs ANTHROPIC_API_KEY)
        #[arg(long, default_value_t = false)]
        narrative: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/saenggibu_analyzer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("saenggibu_analyzer.log"));

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

    match cli.command {
        Commands::Analyze {
            source,
            format,
            policy,
            grades_csv,
        } => {
            let Some(record) = load_record(&source, policy.as_deref()).await? else {
                return Ok(ExitCode::FAILURE);
            };

            match format {
                Format::Pretty => print_pretty(&record)?,
                Format::Json => print_json(&record)?,
                Format::Markdown => println!("{}", render_report(&record, &derive_insights(&record))),
            }

            if let Some(path) = grades_csv {
                let rows = write_grades_csv(&path, &record)?;
                info!(path = %path.display(), rows, "Grades exported");
            }
        }
        Commands::Report {
            source,
            out,
            policy,
            narrative,
        } => {
            let Some(record) = load_record(&source, policy.as_deref()).await? else {
                return Ok(ExitCode::FAILURE);
            };

            let mut report = render_report(&record, &derive_insights(&record));

            if narrative {
                append_narrative(&mut report, narrative_client()).await;
            }

            std::fs::write(&out, report)?;
            info!(path = %out.display(), "Report written");
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Loads and extracts a record. A malformed upload is reported to the user
/// and yields `None` instead of an error.
#[tracing::instrument(skip(policy_path))]
async fn load_record(source: &str, policy_path: Option<&Path>) -> Result<Option<StudentRecord>> {
    let policy = match policy_path {
        Some(path) => GradePolicy::load(path)?,
        None => GradePolicy::default(),
    };

    let bytes = load_source(source).await?;
    match extract_csv(&bytes, &policy) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            report_malformed(&e);
            Ok(None)
        }
    }
}

fn report_malformed(e: &MalformedInputError) {
    error!(error = %e, "Upload could not be parsed");
    eprintln!("{}", e.user_message());
}

fn narrative_client() -> Result<AnthropicClient> {
    AnthropicClient::new(NarrativeConfig::from_env()?)
}

/// Appends the narrative section to `report`. A missing client or a failed
/// request leaves the report as it was.
async fn append_narrative<A: NarrativeApi>(report: &mut String, api: Result<A>) {
    let api = match api {
        Ok(api) => api,
        Err(e) => {
            warn!(error = %e, "Narrative client unavailable; writing report without it");
            return;
        }
    };

    match api.generate(report.as_str()).await {
        Ok(text) => {
            report.push_str("\n## AI 분석\n");
            report.push_str(&text);
            report.push('\n');
        }
        Err(e) => {
            warn!(error = %e, "Narrative generation failed; writing report without it");
        }
    }
}
