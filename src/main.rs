use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use archpkg::config::PackageConfig;
use archpkg::lock::InstanceLock;
use archpkg::menu::Menu;
use archpkg::runner::SystemRunner;
use archpkg::{logging, paths, ui};

/// Interactive installer for a configured list of pacman and AUR packages.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON package list (defaults to packages.json next to the binary)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path used for the single-instance lock
    #[arg(long, default_value = paths::DEFAULT_LOCK_PATH)]
    lock_file: PathBuf,

    /// Directory for diagnostic log files (defaults to the user data dir)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Pacman database lock probed before running package commands
    #[arg(long, default_value = paths::DEFAULT_PACMAN_LOCK)]
    pacman_lock: PathBuf,

    /// Timeout in seconds for a single package manager invocation
    #[arg(long, default_value_t = 300)]
    command_timeout: u64,

    /// Activate debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_dir = cli.log_dir.clone().unwrap_or_else(paths::default_log_dir);
    let _log_guard = match logging::setup(&log_dir, cli.debug) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {e}");
            None
        }
    };

    let _lock = match InstanceLock::acquire(&cli.lock_file) {
        Ok(lock) => lock,
        Err(e) => {
            ui::error(&format!("Error: {e}"));
            std::process::exit(1);
        }
    };

    // An in-flight child is left to process-group teardown; the OS releases
    // the instance lock with the process.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted");
            std::process::exit(1);
        }
    });

    let config_path = cli.config.clone().unwrap_or_else(paths::default_config_path);
    let config = match PackageConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            ui::error(&format!("Error loading configuration: {e}"));
            std::process::exit(1);
        }
    };

    let runner = SystemRunner::new(
        cli.pacman_lock.clone(),
        Duration::from_secs(cli.command_timeout),
    );
    let menu = Menu::new(config, &runner);

    if let Err(e) = menu.run().await {
        ui::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}
