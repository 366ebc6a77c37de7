use crate::infra::Monitor;
use crate::server;
use admission_monitor::analysis::{diff_snapshots, find_applicant, snapshot_statistics};
use admission_monitor::config::AppConfig;
use admission_monitor::error::AppError;
use admission_monitor::export::export_csv_to_path;
use admission_monitor::telemetry;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Admission Monitor",
    about = "Scrape admission ranking lists and inspect the saved sessions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Scrape every configured direction and save the session
    Scrape,
    /// List saved sessions, newest first
    Sessions,
    /// Compare two saved sessions
    Compare {
        /// Older session id, e.g. 2025-07-20_09-00-00
        older: String,
        /// Newer session id
        newer: String,
    },
    /// Print statistics for a session (latest by default)
    Stats(SessionArgs),
    /// Find every direction listing an applicant in the latest session
    Find {
        /// Applicant unique code
        code: String,
    },
    /// Export a session's applicants as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// Session id to use instead of the latest session
    #[arg(long)]
    session: Option<String>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Session id to use instead of the latest session
    #[arg(long)]
    session: Option<String>,
    /// Destination CSV file
    #[arg(long)]
    out: PathBuf,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Scrape => {
            let monitor = offline_monitor()?;
            // Keeps the blocking client off the async workers.
            let response = tokio::task::spawn_blocking(move || monitor.scrape())
                .await
                .map_err(|err| AppError::Io(std::io::Error::other(err)))??;
            print_json(&response)
        }
        Command::Sessions => {
            let sessions = offline_monitor()?.sessions()?;
            if sessions.is_empty() {
                println!("No sessions saved yet.");
            }
            for session in sessions {
                println!("{}\t{}", session.session_id(), session.path.display());
            }
            Ok(())
        }
        Command::Compare { older, newer } => {
            let monitor = offline_monitor()?;
            let before = monitor.session(&older)?;
            let after = monitor.session(&newer)?;
            print_json(&diff_snapshots(&before, &after, older, newer))
        }
        Command::Stats(args) => {
            let snapshot = offline_monitor()?.session_or_latest(args.session.as_deref())?;
            print_json(&snapshot_statistics(&snapshot))
        }
        Command::Find { code } => {
            let search = find_applicant(&offline_monitor()?.latest()?, &code);
            if search.is_empty() {
                return Err(AppError::not_found(format!("applicant {code}")));
            }
            print_json(&search)
        }
        Command::Export(args) => {
            let snapshot = offline_monitor()?.session_or_latest(args.session.as_deref())?;
            let rows = export_csv_to_path(&snapshot, &args.out)?;
            println!("Exported {rows} applicants to {}", args.out.display());
            Ok(())
        }
    }
}

/// Configuration and logging for the one-shot commands; `serve` sets up its own.
fn offline_monitor() -> Result<Monitor, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(Monitor::from_config(&config))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
    println!("{rendered}");
    Ok(())
}
