//! RemanCore - core inspection CLI
//!
//! The `remancore` command runs the staged diagnostic pipeline against an
//! image reference and prints the accept/reject report.
//!
//! ## Commands
//!
//! - `diagnose`: Run a full diagnosis with live stage progress
//! - `categories`: Show the category registry
//! - `stages`: Show the diagnostic stage sequence

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};

use remancore_core::{CoreCategory, DiagnosticReport, ReportStatus, Severity, METRICS};
use remancore_pipeline::{stages, InspectionStation, PipelineConfig, PipelineEvent};

#[derive(Parser)]
#[command(name = "remancore")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "RemanCore core inspection and remaining-life predictor", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Pipeline configuration file (TOML)
    #[arg(long, global = true, env = "REMANCORE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a diagnosis on one inspected unit
    Diagnose {
        /// Image reference (path, URL or data URI)
        #[arg(short, long)]
        image: String,

        /// Core category
        #[arg(short, long, default_value = "Turbocharger")]
        category: String,

        /// Output format for progress and the final report
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List known core categories and their specs
    Categories,

    /// List the diagnostic stages in order
    Stages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    remancore_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Diagnose {
            image,
            category,
            format,
        } => cmd_diagnose(cli.config, &image, &category, format).await,
        Commands::Categories => cmd_categories(),
        Commands::Stages => cmd_stages(),
    }
}

async fn cmd_diagnose(
    config_path: Option<PathBuf>,
    image: &str,
    category: &str,
    format: OutputFormat,
) -> Result<()> {
    let config = PipelineConfig::load(config_path.as_deref())
        .context("Failed to load pipeline configuration")?;

    if CoreCategory::from_label(category).is_none() {
        info!(category = %category, "Unknown category, scoring as {}", CoreCategory::DEFAULT);
    }

    let (station, mut events) = InspectionStation::new(config);
    station.select_sample(image, category);
    station
        .run_diagnosis()
        .context("Failed to start diagnosis")?;

    if format == OutputFormat::Text {
        println!("Diagnosing {} as {}", image, category);
        println!();
    }

    let outcome = loop {
        let event = tokio::select! {
            event = events.recv() => event,
            _ = tokio::signal::ctrl_c() => {
                station.cancel();
                continue;
            }
        };
        let Some(event) = event else {
            bail!("Pipeline stopped without a result");
        };

        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&event)?),
            OutputFormat::Text => print_event(&event),
        }

        if event.is_terminal() {
            break event;
        }
    };

    METRICS.flush();

    match outcome {
        PipelineEvent::Completed { report, .. } => {
            if format == OutputFormat::Text {
                print_report(&report);
            }
            Ok(())
        }
        _ => bail!("Diagnosis cancelled"),
    }
}

fn print_event(event: &PipelineEvent) {
    match event {
        PipelineEvent::Started { .. } => println!("> Initializing..."),
        PipelineEvent::Progress {
            stage_label,
            percent,
            ..
        } => println!("> {:<36} [{:>5.1}%]", stage_label, percent),
        PipelineEvent::Completed { .. } => println!(),
        PipelineEvent::Cancelled { .. } => println!("> Cancelled"),
    }
}

fn print_report(report: &DiagnosticReport) {
    let mark = match report.status {
        ReportStatus::Pass => "✓",
        ReportStatus::Salvage => "✗",
    };
    println!("{} {}", mark, report.status.verdict());
    println!("  {}", report.status.headline());
    println!();
    println!("Report ID:      {}", report.id);
    println!("Timestamp:      {}", report.timestamp.to_rfc3339());
    println!("Category:       {}", report.category);
    println!("Est. new life:  {:.1} yrs", report.predicted_life_years);
    println!("Warranty:       {} mo", report.warranty_months);
    println!("Confidence:     {:.1}%", report.confidence_percent);
    println!();
    println!("Identified anomalies:");
    for defect in &report.defects {
        let marker = match defect.severity {
            Severity::High => "!!",
            Severity::Medium => "! ",
            Severity::Low | Severity::None => "  ",
        };
        println!("  {} {:<28} {}", marker, defect.name, defect.severity);
    }
}

fn cmd_categories() -> Result<()> {
    println!("{:<16} {:>10} {:>16}", "CATEGORY", "MAX LIFE", "BASE WARRANTY");
    for category in CoreCategory::ALL {
        let spec = category.spec();
        println!(
            "{:<16} {:>8.0} y {:>13} mo",
            category.label(),
            spec.max_life_years,
            spec.warranty_base_months
        );
    }
    Ok(())
}

fn cmd_stages() -> Result<()> {
    for (i, label) in stages().iter().enumerate() {
        println!("{}. {}", i + 1, label);
    }
    Ok(())
}
