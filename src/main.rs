// worklog-report - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config resolution and loading
// 3. Logging initialisation (debug mode support)
// 4. Running the report pipeline

use clap::Parser;
use std::path::PathBuf;
use worklog_report::app::report::{self, ReportRequest};
use worklog_report::core::export::ReportFormat;
use worklog_report::platform::config::{self, PlatformPaths};
use worklog_report::util;

/// worklog-report - time spent per task and per user from a worklog export.
///
/// Reads a CSV export whose "Log Work" columns hold `tag;date;user;minutes`
/// cells and prints an HTML (or CSV/JSON) table of time spent.
#[derive(Parser, Debug)]
#[command(name = "worklog-report", version, about)]
struct Cli {
    /// CSV export to summarise.
    input: PathBuf,

    /// Config document (JSON, or TOML by extension). Defaults to
    /// config.json / config.toml in the current or platform config directory.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Output format: html, csv or json.
    #[arg(short = 'f', long = "format", default_value = "html")]
    format: ReportFormat,

    /// Write the report to this file instead of stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config comes first so its logging level can take part in init.
    let platform_paths = PlatformPaths::resolve();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let loaded = config::resolve_config_path(cli.config.as_deref(), &cwd, &platform_paths)
        .and_then(|path| config::load_config(&path));

    let config_level = loaded
        .as_ref()
        .ok()
        .and_then(|(c, _)| c.log_level.clone());
    util::logging::init(cli.debug, config_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "worklog-report starting"
    );

    let (report_config, warnings) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Config validation warning");
    }

    let request = ReportRequest {
        input: cli.input,
        format: cli.format,
        output: cli.output,
    };

    if let Err(e) = report::run(&request, &report_config) {
        tracing::error!(error = %e, kind = ?e.kind(), "Report failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
