use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Scratch environment for driving the built binary: a package list, a lock
/// file and a log directory, all inside one temporary directory.
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    pub fn lock_path(&self) -> PathBuf {
        self.temp_dir.path().join("archpkg.lock")
    }

    pub fn write_config(&self, contents: &str) -> Result<PathBuf> {
        let path = self.temp_dir.path().join("packages.json");
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Run the binary against this environment, feeding `stdin` and waiting
    /// for it to exit.
    pub fn run_with_stdin(&self, config: &str, stdin: &str) -> Result<Output> {
        let config_path = self.write_config(config)?;

        let mut child = Command::new(env!("CARGO_BIN_EXE_archpkg"))
            .arg("--config")
            .arg(&config_path)
            .arg("--lock-file")
            .arg(self.lock_path())
            .arg("--log-dir")
            .arg(self.temp_dir.path().join("logs"))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("spawning archpkg")?;

        // The child may exit before reading anything (fatal startup errors),
        // so a broken pipe here is not a test failure.
        let mut child_stdin = child.stdin.take().context("child stdin missing")?;
        let _ = child_stdin.write_all(stdin.as_bytes());
        drop(child_stdin);

        Ok(child.wait_with_output()?)
    }
}

pub fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}
