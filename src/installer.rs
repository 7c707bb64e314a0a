//! Retry-based package installation over pacman and an AUR helper.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use dialoguer::Confirm;
use duct::cmd;

use crate::progress;
use crate::runner::CommandRunner;
use crate::ui;

pub const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

const AUR_HELPERS: &[&str] = &["paru", "yay", "pikaur", "trizen"];
const PARU_BIN_REPO: &str = "https://aur.archlinux.org/paru-bin.git";

/// Where a package comes from. Determines the install command and the stage
/// label shown in the progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageSource {
    Official,
    Aur,
}

impl PackageSource {
    pub fn stage_label(&self) -> &'static str {
        match self {
            Self::Official => "Pacman",
            Self::Aur => "AUR",
        }
    }
}

pub struct Installer<'a> {
    runner: &'a dyn CommandRunner,
    retry_delay: Duration,
}

impl<'a> Installer<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self {
            runner,
            retry_delay: RETRY_DELAY,
        }
    }

    /// Override the fixed delay between attempts. Used by tests; the default
    /// matches the 2 s backoff for transient mirror failures.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Check whether `package` is already present in the local database.
    pub async fn is_installed(&self, package: &str) -> bool {
        let argv = to_argv(&["pacman", "-Q", package]);
        self.runner.run(&argv, false).await.success()
    }

    pub async fn install_official(&self, package: &str) -> bool {
        let argv = to_argv(&["sudo", "pacman", "-S", "--noconfirm", package]);
        self.attempt_loop(package, &argv).await
    }

    pub async fn install_aur(&self, package: &str, helper: &str) -> bool {
        let argv = to_argv(&[helper, "-S", "--noconfirm", package]);
        self.attempt_loop(package, &argv).await
    }

    /// Run the install command up to [`MAX_ATTEMPTS`] times with a fixed
    /// delay between attempts. Every non-zero exit is retried identically;
    /// distinguishing retryable failures is left to pacman's own output.
    async fn attempt_loop(&self, package: &str, argv: &[String]) -> bool {
        for attempt in 1..=MAX_ATTEMPTS {
            tracing::info!(package, attempt, max = MAX_ATTEMPTS, "install attempt");

            if self.runner.run(argv, false).await.success() {
                return true;
            }

            if attempt < MAX_ATTEMPTS {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        tracing::warn!(package, "giving up after {MAX_ATTEMPTS} attempts");
        false
    }
}

/// First AUR helper found on the PATH, if any.
pub fn detect_aur_helper() -> Option<&'static str> {
    AUR_HELPERS
        .iter()
        .copied()
        .find(|helper| which::which(helper).is_ok())
}

/// Return the name of a usable AUR helper, bootstrapping paru from the AUR
/// if none is installed yet.
pub async fn ensure_aur_helper(runner: &dyn CommandRunner) -> Result<String> {
    if let Some(helper) = detect_aur_helper() {
        return Ok(helper.to_string());
    }

    let build = Confirm::new()
        .with_prompt("No AUR helper found. Build paru from the AUR?")
        .default(true)
        .interact()?;
    if !build {
        bail!("no AUR helper available");
    }

    bootstrap_paru(runner).await?;
    Ok("paru".to_string())
}

/// Build and install `paru-bin` from the AUR: make sure git and base-devel
/// are present, clone the PKGBUILD into a scratch directory and run makepkg
/// there. The scratch directory is removed when it goes out of scope.
async fn bootstrap_paru(runner: &dyn CommandRunner) -> Result<()> {
    ui::info("Installing paru from the AUR...");

    for dep in ["git", "base-devel"] {
        if runner.run(&to_argv(&["pacman", "-Qi", dep]), false).await.success() {
            continue;
        }
        let install = to_argv(&["sudo", "pacman", "-S", "--noconfirm", "--needed", dep]);
        if !runner.run(&install, false).await.success() {
            bail!("could not install build dependency {dep}");
        }
    }

    let build_dir = tempfile::tempdir().context("creating build directory")?;
    let build_path = build_dir.path().to_string_lossy().to_string();

    let pb = progress::spinner("Cloning paru-bin".to_string());
    let cloned = runner
        .run(&to_argv(&["git", "clone", PARU_BIN_REPO, &build_path]), false)
        .await;
    pb.finish_and_clear();
    if !cloned.success() {
        bail!("failed to clone {PARU_BIN_REPO}");
    }

    cmd("makepkg", ["-si", "--noconfirm"])
        .dir(build_dir.path())
        .run()
        .context("building paru-bin with makepkg")?;

    if cmd("paru", ["--version"])
        .stdout_null()
        .stderr_null()
        .run()
        .is_err()
    {
        bail!("paru did not install correctly");
    }

    ui::success("✓ paru installed");
    Ok(())
}

fn to_argv(argv: &[&str]) -> Vec<String> {
    argv.iter().map(|s| s.to_string()).collect()
}
