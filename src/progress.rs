//! Single-line textual progress rendering.

use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};

use crate::installer::PackageSource;

pub const BAR_WIDTH: usize = 50;
const NAME_WIDTH: usize = 25;

pub fn percent(current: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    current as f64 / total as f64 * 100.0
}

/// Number of filled bar segments: floor(percent / 2), capped at the bar width.
pub fn filled_segments(current: usize, total: usize) -> usize {
    ((percent(current, total) / 2.0) as usize).min(BAR_WIDTH)
}

pub fn format_bar(current: usize, total: usize) -> String {
    let filled = filled_segments(current, total);
    format!("{}{}", "█".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Overwrite the current console line with bar, package name, stage label and
/// status. No newline: successive calls repaint the same line, the caller
/// prints the terminating newline when the run is done.
pub fn render(current: usize, total: usize, name: &str, source: PackageSource, status: &str) {
    let bar = format!("[{}]", format_bar(current, total));
    let bar: ColoredString = match source {
        PackageSource::Official => bar.blue(),
        PackageSource::Aur => bar.magenta(),
    };

    let status_colored: ColoredString = if status.contains('✓') {
        status.green()
    } else if status.contains('✗') {
        status.red()
    } else {
        status.yellow()
    };

    let name_short: String = name.chars().take(NAME_WIDTH).collect();

    print!(
        "\r{} {:.1}% {} {} {}",
        bar,
        percent(current, total),
        format!("{name_short:<NAME_WIDTH$}").yellow(),
        format!("{:<6}", source.stage_label()).cyan(),
        status_colored,
    );
    let _ = io::stdout().flush();
}

/// Indeterminate spinner for steps without a package count, e.g. the AUR
/// helper bootstrap.
pub fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap()
            .tick_chars("⠁⠉⠙⠚⠒⠂⠒⠲⠴⠤⠄⠤⠦⠖⠒⠐⠒⠓⠋⠉"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
