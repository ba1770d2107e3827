// LasQC - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation (debug mode support)
// 3. QC catalog loading (built-in or user-defined)
// 4. Analysis, report output, and optional archiving
//
// Exit codes: 0 approved, 1 not approved, 2 load/parse/output error.

use clap::{Parser, ValueEnum};
use lasqc::app;
use lasqc::core::export;
use lasqc::platform::config::{self, PlatformPaths};
use lasqc::util;
use lasqc::util::error::{self, ArchiveError, LasQcError};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Report format written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// LasQC - Quality-control gate for well-log (.LAS) files.
///
/// Classifies every curve, runs the catalog's quality rules, checks the
/// well header, and validates the requested service bundles.
#[derive(Parser, Debug)]
#[command(name = "lasqc", version, about)]
struct Cli {
    /// LAS file to analyse.
    #[arg(required_unless_present = "list_services")]
    file: Option<PathBuf>,

    /// Service bundle to validate (repeatable). Defaults to the services in
    /// config.toml, or every catalog service.
    #[arg(short = 's', long = "service", value_name = "NAME")]
    services: Vec<String>,

    /// QC catalog file replacing the built-in catalog.
    #[arg(long = "catalog", value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Report format.
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also write the per-curve table as CSV.
    #[arg(long = "csv", value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Copy the file into the verified archive when approved.
    #[arg(long = "archive")]
    archive: bool,

    /// Archive root directory (overrides config.toml).
    #[arg(long = "archive-root", value_name = "PATH")]
    archive_root: Option<PathBuf>,

    /// List the catalog's service bundles and exit.
    #[arg(long = "list-services")]
    list_services: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();
    let (app_config, config_warnings) = config::load_config(&platform_paths.config_file());

    util::logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );
    util::logging::install_panic_hook();

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "LasQC starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    match run(&cli, &platform_paths, &app_config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!(error = %e, "LasQC failed");
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether the file was approved (listing always succeeds).
fn run(
    cli: &Cli,
    platform_paths: &PlatformPaths,
    app_config: &config::AppConfig,
) -> error::Result<bool> {
    let catalog_path = cli
        .catalog
        .as_deref()
        .or(app_config.catalog_path.as_deref());
    let catalog =
        app::catalog_mgr::load_catalog(catalog_path, Some(&platform_paths.user_catalog))?;

    let stdout_path = Path::new("<stdout>");
    let mut stdout = io::stdout().lock();

    if cli.list_services {
        for service in catalog.services.services() {
            writeln!(stdout, "{}: {}", service.name, service.curve_types.join(", ")).map_err(
                |e| LasQcError::Io {
                    path: stdout_path.to_path_buf(),
                    operation: "write",
                    source: e,
                },
            )?;
        }
        return Ok(true);
    }

    let Some(file) = cli.file.as_deref() else {
        // clap enforces FILE unless --list-services is given.
        return Ok(false);
    };

    let requested = if cli.services.is_empty() {
        app_config.services.as_slice()
    } else {
        cli.services.as_slice()
    };
    let report = app::analyze::analyze_file(file, &catalog, requested)?;

    match cli.format {
        OutputFormat::Text => {
            export::write_text_report(&report, &catalog.aliases, &mut stdout, stdout_path)?
        }
        OutputFormat::Json => {
            export::export_json(&report, &mut stdout, stdout_path)?;
            writeln!(stdout).map_err(|e| LasQcError::Io {
                path: stdout_path.to_path_buf(),
                operation: "write",
                source: e,
            })?;
        }
    }

    if let Some(csv_path) = &cli.csv {
        let csv_file = std::fs::File::create(csv_path).map_err(|e| LasQcError::Io {
            path: csv_path.clone(),
            operation: "create",
            source: e,
        })?;
        let rows = export::export_curves_csv(&report.curves, csv_file, csv_path)?;
        tracing::info!(path = %csv_path.display(), rows, "Curve table exported");
    }

    if cli.archive {
        let root = cli
            .archive_root
            .clone()
            .or_else(|| app_config.archive_root.clone())
            .unwrap_or_else(|| platform_paths.default_archive_root());
        match app::archive::archive(&report, file, &root) {
            Ok(target) => eprintln!("Archived to {}", target.display()),
            Err(ArchiveError::NotApproved) => {
                tracing::info!("File not approved; skipping archive");
                eprintln!("Not archived: file was not approved");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(report.summary.approved)
}
