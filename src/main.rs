use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use sysinfo::System;

use timelapse_wizard::app::{App, RunOutcome};
use timelapse_wizard::config::Settings;
use timelapse_wizard::encoder::FfmpegEncoder;
use timelapse_wizard::error::AppResult;
use timelapse_wizard::fs_access::OsFileSystem;
use timelapse_wizard::tui::{self, InputThread, TerminalGuard};

const LOG_TARGET_STARTUP: &str = "timelapse_wizard::startup";

#[derive(Parser, Debug)]
#[command(version, about = "Interactive timelapse builder for folders of camera images.")]
struct Args {
    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Folder whose subfolders hold the source images
    #[arg(long)]
    input_root: Option<PathBuf>,

    /// Folder that receives the rendered video
    #[arg(long)]
    output_root: Option<PathBuf>,
}

/// Initialize tracing with file rotation
///
/// Logs are written to `<config dir>/TimelapseWizard/logs/`, one file per
/// day named `timelapse-wizard.log.YYYY-MM-DD`.
///
/// The terminal belongs to the UI, so nothing is logged to the console.
fn initialize_tracing() {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = Settings::log_dir();

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "timelapse-wizard.log");

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}

fn log_runtime_environment() {
    let version = env!("CARGO_PKG_VERSION");
    let os_name = System::long_os_version()
        .or_else(System::name)
        .unwrap_or_else(|| "Unknown OS".to_string());
    let kernel = System::kernel_version().unwrap_or_else(|| "Unknown Kernel".to_string());
    let architecture = std::env::consts::ARCH;

    tracing::info!(target: LOG_TARGET_STARTUP, "Starting Timelapse Wizard v{} on ({})", version, architecture);
    tracing::info!(target: LOG_TARGET_STARTUP, "Operating System: {} (kernel {})", os_name, kernel);
}

fn load_settings(args: &Args) -> AppResult<Settings> {
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(root) = &args.input_root {
        settings.input_root = root.clone();
    }
    if let Some(root) = &args.output_root {
        settings.output_root = root.clone();
    }
    settings.prepare_roots()?;

    tracing::info!(
        target: LOG_TARGET_STARTUP,
        "Input root: {}, output root: {}",
        settings.input_root.display(),
        settings.output_root.display()
    );
    Ok(settings)
}

fn run(settings: Settings) -> AppResult<RunOutcome> {
    let encoder = Arc::new(FfmpegEncoder::new(settings.encoder.clone()));
    let app = App::new(settings, Arc::new(OsFileSystem), encoder);

    let _guard = TerminalGuard::new()?;
    let mut terminal = tui::init_terminal()?;
    let _input = InputThread::spawn(app.sender())?;

    app.run(&mut terminal)
}

fn report(outcome: &RunOutcome) -> ExitCode {
    match outcome {
        RunOutcome::Rendered(report) => {
            println!(
                "Wrote {} ({} frames)",
                report.output_path.display(),
                report.frame_count
            );
            ExitCode::SUCCESS
        }
        RunOutcome::Cancelled => {
            println!("Cancelled");
            ExitCode::from(130)
        }
        RunOutcome::Failed(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
        RunOutcome::RenderFailed(err) => {
            eprintln!("Render failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    initialize_tracing();
    log_runtime_environment();

    let outcome = load_settings(&args).and_then(run);

    // The terminal guard has been dropped at this point
    match outcome {
        Ok(outcome) => {
            tracing::info!("Run finished: {:?}", outcome);
            report(&outcome)
        }
        Err(e) => {
            tracing::error!("Fatal: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
