//! Interactive Arch Linux package installation helper.
//!
//! Installs a configured list of packages through pacman and an AUR helper,
//! with single-instance enforcement, bounded retries and per-package progress
//! reporting. The binary in `main.rs` wires these modules together; they are
//! exposed as a library so the seams stay testable.

pub mod config;
pub mod installer;
pub mod lock;
pub mod logging;
pub mod menu;
pub mod paths;
pub mod progress;
pub mod runner;
pub mod ui;
