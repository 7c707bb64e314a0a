//! Child process execution with line-streamed output.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

use crate::ui;

/// Result of one external command invocation.
///
/// The runner never propagates faults: spawn errors, timeouts and package
/// manager lock contention are all folded into a non-zero exit code so
/// callers can treat every invocation uniformly.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    fn failure() -> Self {
        Self {
            code: 1,
            stdout: String::new(),
        }
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `argv` to completion. When `show_output` is set, stdout lines are
    /// echoed to the console as they arrive; they are buffered into the
    /// result either way.
    async fn run(&self, argv: &[String], show_output: bool) -> CommandOutput;
}

/// Runs commands on the host, refusing to spawn while pacman's own database
/// lock exists.
pub struct SystemRunner {
    pacman_lock: PathBuf,
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(pacman_lock: PathBuf, timeout: Duration) -> Self {
        Self {
            pacman_lock,
            timeout,
        }
    }

    fn pacman_locked(&self) -> bool {
        self.pacman_lock.exists()
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, argv: &[String], show_output: bool) -> CommandOutput {
        let Some((program, args)) = argv.split_first() else {
            return CommandOutput::failure();
        };

        if self.pacman_locked() {
            ui::warn("Pacman is already running!");
            ui::info(&format!(
                "Wait for it to finish or remove {}",
                self.pacman_lock.display()
            ));
            return CommandOutput {
                code: 1,
                stdout: "pacman database is locked".to_string(),
            };
        }

        tracing::debug!(command = %argv.join(" "), "running command");

        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                ui::error(&format!("Failed to run {program}: {e}"));
                return CommandOutput::failure();
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Both pipes are drained while the child runs; a child flooding
        // stderr must not stall behind a full pipe buffer.
        let waited = tokio::time::timeout(self.timeout, async {
            let mut collected = String::new();
            let mut error_text = String::new();

            let drain_stdout = async {
                if let Some(out) = stdout {
                    let mut lines = BufReader::new(out).lines();
                    while let Ok(Some(line)) = lines.next_line().await {
                        if show_output {
                            println!("{}", line.trim_end().blue());
                        }
                        collected.push_str(&line);
                        collected.push('\n');
                    }
                }
            };
            let drain_stderr = async {
                if let Some(mut err) = stderr {
                    let _ = err.read_to_string(&mut error_text).await;
                }
            };
            tokio::join!(drain_stdout, drain_stderr);

            (child.wait().await, collected, error_text)
        })
        .await;

        let (status, collected, error_text) = match waited {
            Ok(parts) => parts,
            Err(_) => {
                let _ = child.kill().await;
                ui::error(&format!(
                    "{program} timed out after {}s",
                    self.timeout.as_secs()
                ));
                return CommandOutput::failure();
            }
        };

        let status = match status {
            Ok(status) => status,
            Err(e) => {
                ui::error(&format!("Failed to wait for {program}: {e}"));
                return CommandOutput::failure();
            }
        };

        let code = status.code().unwrap_or(1);
        if code != 0 {
            ui::error(&format!("Error in {program}: {}", error_text.trim()));
        }

        CommandOutput {
            code,
            stdout: collected,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn args(argv: &[&str]) -> Vec<String> {
        argv.iter().map(|s| s.to_string()).collect()
    }

    fn runner_with_lock(dir: &tempfile::TempDir) -> SystemRunner {
        SystemRunner::new(dir.path().join("db.lck"), Duration::from_secs(10))
    }

    #[tokio::test]
    async fn reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let runner = runner_with_lock(&dir);

        let out = runner.run(&args(&["sh", "-c", "exit 3"]), false).await;
        assert_eq!(out.code, 3);
    }

    #[tokio::test]
    async fn buffers_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let runner = runner_with_lock(&dir);

        let out = runner.run(&args(&["sh", "-c", "echo hello"]), false).await;
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn stdout_is_returned_on_failure_too() {
        let dir = tempfile::tempdir().unwrap();
        let runner = runner_with_lock(&dir);

        let out = runner
            .run(&args(&["sh", "-c", "echo partial; exit 1"]), false)
            .await;
        assert_eq!(out.code, 1);
        assert_eq!(out.stdout.trim(), "partial");
    }

    #[tokio::test]
    async fn missing_binary_becomes_generic_failure() {
        let dir = tempfile::tempdir().unwrap();
        let runner = runner_with_lock(&dir);

        let out = runner.run(&args(&["archpkg-no-such-binary"]), false).await;
        assert_eq!(out.code, 1);
        assert!(out.stdout.is_empty());
    }

    #[tokio::test]
    async fn empty_argv_fails() {
        let dir = tempfile::tempdir().unwrap();
        let runner = runner_with_lock(&dir);

        assert_eq!(runner.run(&[], false).await.code, 1);
    }

    #[tokio::test]
    async fn pacman_lock_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let lock_path = dir.path().join("db.lck");
        std::fs::write(&lock_path, "").unwrap();

        let runner = SystemRunner::new(lock_path, Duration::from_secs(10));
        let out = runner.run(&args(&["sh", "-c", "echo ran"]), false).await;

        assert_eq!(out.code, 1);
        assert!(out.stdout.contains("locked"));
    }

    #[tokio::test]
    async fn stderr_flood_does_not_stall_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let runner = runner_with_lock(&dir);

        // Well past the 64 KiB pipe buffer.
        let script = "i=0; while [ $i -lt 5000 ]; do \
                      echo 'stderr noise line with enough padding to fill the pipe'; \
                      i=$((i+1)); done >&2; exit 2";

        let started = Instant::now();
        let out = runner.run(&args(&["sh", "-c", script]), false).await;

        assert_eq!(out.code, 2);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn timeout_kills_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemRunner::new(dir.path().join("db.lck"), Duration::from_millis(200));

        let started = Instant::now();
        let out = runner.run(&args(&["sleep", "30"]), false).await;

        assert_eq!(out.code, 1);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
