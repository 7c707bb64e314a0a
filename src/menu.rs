//! Interactive menu loop driving the install workflow.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use crate::config::PackageConfig;
use crate::installer::{Installer, PackageSource, ensure_aur_helper};
use crate::progress;
use crate::runner::CommandRunner;
use crate::ui;

/// Short pause after each package so the final progress state stays readable.
const SETTLE_DELAY: Duration = Duration::from_millis(500);

pub struct Menu<'a> {
    config: PackageConfig,
    runner: &'a dyn CommandRunner,
    installer: Installer<'a>,
    settle_delay: Duration,
}

impl<'a> Menu<'a> {
    pub fn new(config: PackageConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            installer: Installer::new(runner),
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Block on single-line choices from stdin until the user exits or the
    /// input stream closes.
    pub async fn run(&self) -> Result<()> {
        loop {
            let Some(choice) = self.prompt()? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => {
                    self.install_sets(&self.config.pacman, &self.config.aur)
                        .await;
                }
                "2" => self.list_packages(),
                "3" => {
                    self.install_sets(&self.config.pacman, &[]).await;
                }
                "4" => {
                    if self.config.aur.is_empty() {
                        ui::warn("No AUR packages configured");
                    } else {
                        self.install_sets(&[], &self.config.aur).await;
                    }
                }
                "5" => {
                    ui::info("Exiting...");
                    return Ok(());
                }
                _ => ui::warn("Invalid option"),
            }
        }
    }

    /// Returns `None` on end of input, which is treated like choosing exit.
    fn prompt(&self) -> Result<Option<String>> {
        println!("{}", format!("\n{}", "=".repeat(50)).cyan());
        println!("{}", format!("{:^50}", "ARCH LINUX PACKAGE MANAGER").yellow());
        println!("{}", "=".repeat(50).cyan());
        println!();
        println!("{}", "1. Install ALL packages".green());
        println!("{}", "2. List configured packages".blue());
        println!("{}", "3. Install official packages only (pacman)".magenta());
        println!("{}", "4. Install AUR packages only".blue());
        println!("{}", "5. Exit".red());

        print!("{}", "\nSelect an option: ".yellow());
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn list_packages(&self) {
        println!("{}", "\nOFFICIAL PACKAGES (pacman):".yellow());
        for package in &self.config.pacman {
            println!("  - {package}");
        }

        println!("{}", "\nAUR PACKAGES:".magenta());
        for package in &self.config.aur {
            println!("  - {package}");
        }

        println!(
            "{}",
            format!("\nTotal: {} official packages", self.config.pacman.len()).cyan()
        );
        println!(
            "{}",
            format!("       {} AUR packages", self.config.aur.len()).cyan()
        );
    }

    /// Install the official set fully, then the AUR set. Returns true only
    /// when every package ended up installed (including already-installed
    /// skips).
    pub async fn install_sets(&self, official: &[String], aur: &[String]) -> bool {
        if official.is_empty() && aur.is_empty() {
            ui::warn("No packages to install");
            return false;
        }

        let total = official.len() + aur.len();
        let mut success = 0;
        let mut count = 0;

        if !official.is_empty() {
            ui::info(&format!(
                "\nInstalling {} official packages...",
                official.len()
            ));
            for package in official {
                count += 1;
                if self
                    .install_one(package, PackageSource::Official, None, count, total)
                    .await
                {
                    success += 1;
                }
                tokio::time::sleep(self.settle_delay).await;
            }
        }

        if !aur.is_empty() {
            let helper = match ensure_aur_helper(self.runner).await {
                Ok(helper) => helper,
                Err(e) => {
                    ui::error(&format!("Cannot install AUR packages: {e}"));
                    return false;
                }
            };

            ui::info(&format!("\nInstalling {} AUR packages...", aur.len()));
            for package in aur {
                count += 1;
                if self
                    .install_one(package, PackageSource::Aur, Some(&helper), count, total)
                    .await
                {
                    success += 1;
                }
                tokio::time::sleep(self.settle_delay).await;
            }
        }

        println!("\n");
        if success == total {
            ui::success("✓ All packages installed");
        } else {
            ui::warn(&format!("✓ {success}/{total} packages installed"));
        }
        success == total
    }

    async fn install_one(
        &self,
        package: &str,
        source: PackageSource,
        helper: Option<&str>,
        count: usize,
        total: usize,
    ) -> bool {
        progress::render(count, total, package, source, "Installing...");

        if self.installer.is_installed(package).await {
            progress::render(count, total, package, source, "✓ Already installed");
            return true;
        }

        let ok = match source {
            PackageSource::Official => self.installer.install_official(package).await,
            PackageSource::Aur => {
                self.installer
                    .install_aur(package, helper.unwrap_or("paru"))
                    .await
            }
        };

        let status = if ok { "✓ Done" } else { "✗ Failed" };
        progress::render(count, total, package, source, status);
        ok
    }
}
