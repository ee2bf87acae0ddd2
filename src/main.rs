// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod compliance;
mod excel;
mod report;
mod settings;
mod vnface_client;

use compliance::{ComplianceThresholds, MalformedTimeError};
use report::{build_calendar, build_table, ReportError};
use settings::{ReportSettings, SettingsError, DEFAULT_SETTINGS_FILE};
use vnface_client::{AttendanceRecord, VnfaceClient, VnfaceError};

pub const ACCESS_TOKEN_ENV: &str = "VNFACE_ACCESS_TOKEN";

// --- Error Handling ---

#[derive(Error, Debug)]
enum AppError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("could not retrieve check-in data: {0}")]
    DataSource(#[from] VnfaceError),

    #[error("no check-in data found for {month:02}/{year}")]
    NoDataInRange { month: u32, year: i32 },

    #[error("invalid check-in cutoff: {0}")]
    BadCutoff(#[from] MalformedTimeError),

    #[error("could not build the report: {0}")]
    Report(#[from] ReportError),

    #[error("could not serialize the report workbook: {0}")]
    Serialization(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("failed to write report file {path}")]
    WriteReport {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// --- CLI ---

/// Fetch a month of vnFace check-in records and write a compliance report
/// workbook with a chronological log sheet and a calendar sheet.
#[derive(Parser, Debug)]
#[command(name = "vnface-checkin", version, about)]
struct Cli {
    /// Report month (1-12)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,

    /// Report year (4-digit)
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(1000..=9999))]
    year: i32,

    /// First check-in cutoff (HH:MM); overrides and updates the saved setting
    #[arg(long)]
    first_checkin: Option<String>,

    /// Last check-in cutoff (HH:MM); overrides and updates the saved setting
    #[arg(long)]
    last_checkin: Option<String>,

    /// File holding the persisted cutoffs
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings_file: PathBuf,

    /// Directory the report workbook is written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Setting tracing subscriber failed")?;

    let cli = Cli::parse();
    run(cli).await?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut settings = ReportSettings::load(&cli.settings_file)?;
    let cutoffs_changed = apply_cutoff_overrides(&mut settings, &cli);

    // Parse before persisting so a malformed override is never saved.
    let thresholds = ComplianceThresholds::from_times(
        &settings.first_checkin_time,
        &settings.last_checkin_time,
    )?;
    if cutoffs_changed {
        settings.save(&cli.settings_file)?;
        info!("Updated check-in cutoffs saved to {:?}", cli.settings_file);
    }
    info!(
        "Cutoffs in effect: first {} / last {}",
        settings.first_checkin_time, settings.last_checkin_time
    );

    let client = VnfaceClient::new(load_access_token()?)?;

    info!("Fetching check-in records for {:02}/{}", cli.month, cli.year);
    let records = client.fetch_month(cli.month, cli.year).await?;
    ensure_records(&records, cli.month, cli.year)?;
    info!("Received {} check-in record(s)", records.len());

    let table = build_table(&records, &thresholds)?;
    let calendar = build_calendar(&records, cli.month, cli.year, &thresholds)?;
    let workbook_bytes = excel::write_workbook(&table, &calendar)?;

    let username = records[0].username.as_str();
    let file_name = format!(
        "[{}]_checkin_vnface_{:02}-{}.xlsx",
        username, cli.month, cli.year
    );
    let report_path = cli.output_dir.join(&file_name);
    fs::write(&report_path, &workbook_bytes).map_err(|source| AppError::WriteReport {
        path: report_path.display().to_string(),
        source,
    })?;

    info!("Report written to {}", report_path.display());
    Ok(())
}

fn load_access_token() -> Result<String, AppError> {
    env::var(ACCESS_TOKEN_ENV).map_err(|_| AppError::MissingEnvVar(ACCESS_TOKEN_ENV.to_string()))
}

/// Guard between fetch and report building: a month with no records is
/// fatal, and must fail before any workbook bytes exist.
fn ensure_records(records: &[AttendanceRecord], month: u32, year: i32) -> Result<(), AppError> {
    if records.is_empty() {
        return Err(AppError::NoDataInRange { month, year });
    }
    Ok(())
}

/// Apply CLI cutoff overrides to the loaded settings. Returns whether
/// anything changed and therefore needs to be written back.
fn apply_cutoff_overrides(settings: &mut ReportSettings, cli: &Cli) -> bool {
    let mut changed = false;
    if let Some(first) = &cli.first_checkin {
        if *first != settings.first_checkin_time {
            settings.first_checkin_time = first.clone();
            changed = true;
        }
    }
    if let Some(last) = &cli.last_checkin {
        if *last != settings.last_checkin_time {
            settings.last_checkin_time = last.clone();
            changed = true;
        }
    }
    changed
}
