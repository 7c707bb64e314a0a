use std::path::PathBuf;

/// Centralized default paths for archpkg
///
/// All of these can be overridden on the command line so tests and scripts
/// can substitute temporary locations.

pub const DEFAULT_LOCK_PATH: &str = "/tmp/archpkg.lock";

/// Pacman's own database lock. Probed read-only, never created or removed.
pub const DEFAULT_PACMAN_LOCK: &str = "/var/lib/pacman/db.lck";

/// Default package list location: `packages.json` next to the executable,
/// falling back to the current directory.
pub fn default_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("packages.json")))
        .unwrap_or_else(|| PathBuf::from("packages.json"))
}

/// Default directory for diagnostic log files.
pub fn default_log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("archpkg").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
