//! Colored console messages, mirrored into the diagnostic log.

use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

/// Print a leveled message to the console and record it in the log file.
/// Success is a console-only distinction and logs at info.
pub fn emit(level: Level, message: &str) {
    match level {
        Level::Info => {
            tracing::info!("{message}");
            println!("{}", message.cyan());
        }
        Level::Success => {
            tracing::info!("{message}");
            println!("{}", message.green());
        }
        Level::Warn => {
            tracing::warn!("{message}");
            println!("{}", message.yellow());
        }
        Level::Error => {
            tracing::error!("{message}");
            println!("{}", message.red());
        }
    }
}

pub fn info(message: &str) {
    emit(Level::Info, message);
}

pub fn success(message: &str) {
    emit(Level::Success, message);
}

pub fn warn(message: &str) {
    emit(Level::Warn, message);
}

pub fn error(message: &str) {
    emit(Level::Error, message);
}
