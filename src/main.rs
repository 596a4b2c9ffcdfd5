//! Employee Roster - desktop client for the employee REST backend.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use directories::ProjectDirs;
use eframe::egui;
use employee_roster as app;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use app::config::{AppConfig, ConfigLoadResult};
use app::ui::RosterApp;

/// Desktop roster for browsing and editing employee records.
#[derive(Parser)]
#[command(name = "employee-roster")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Load configuration from this file
    #[arg(long, value_name = "PATH", conflicts_with = "dev")]
    config: Option<PathBuf>,

    /// Override the backend base URL for this run
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = init_logging();

    tracing::info!("Employee Roster starting...");

    // Determine config path based on mode
    let config_path = match cli.config {
        Some(path) => path,
        None if cli.dev => {
            tracing::info!("Dev mode: loading config from current directory");
            PathBuf::from("config.toml")
        }
        None => AppConfig::default_path(),
    };
    tracing::info!("Config path: {:?}", config_path);

    let (mut config, mut initial_error) = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            (config, None)
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing, using defaults");
            (AppConfig::default(), None)
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::warn!("Config invalid: {}", e);
            (AppConfig::default(), Some(format!("Config file ignored: {e}")))
        }
    };

    if let Some(url) = cli.api_url {
        tracing::info!("Backend URL overridden: {}", url);
        config.api.base_url = url;
        if let Err(e) = config.api.validate() {
            tracing::warn!("Invalid --api-url: {}", e);
            initial_error = Some(e.to_string());
        }
    }

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Employee Roster")
            .with_inner_size([config.ui.window_width, config.ui.window_height])
            .with_min_inner_size([600.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Employee Roster",
        options,
        Box::new(move |cc| {
            install_fonts(&cc.egui_ctx);
            Ok(Box::new(RosterApp::new(
                cc.egui_ctx.clone(),
                config,
                config_path,
                rt,
                initial_error,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("UI terminated with error: {e}"))
}

/// Log to stdout and to a daily rolling file in the platform data directory.
fn init_logging() -> Option<WorkerGuard> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let file = ProjectDirs::from("", "", "employee-roster")
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .map(|dir| tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "employee-roster.log")));

    let (file_layer, guard) = match file {
        Some((writer, guard)) => (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard)),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

/// Register the phosphor icon font alongside the defaults.
fn install_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}
