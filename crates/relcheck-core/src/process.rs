//! External process invocation behind an injectable capability trait.
//!
//! Everything relcheck runs (git, dependency installers, test suites) goes
//! through [`ProcessRunner`], so the resolver and orchestrator can be
//! exercised against a scripted stand-in without spawning anything.
//! Commands are argv vectors executed directly; no shell is involved.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::error::{RelcheckError, Result};

/// Captured outcome of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code (-1 when the process was terminated by a signal).
    pub exit_code: i32,

    /// Combined stdout and stderr, in best-effort emission order.
    pub output: String,
}

impl ProcessOutput {
    /// Whether the command exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Capability for running external tools.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `argv` with `cwd` as working directory, wait for completion, and
    /// capture its combined output. `Err` means the command could not be
    /// started at all; an unsuccessful exit is a normal `Ok` outcome.
    async fn execute(&self, argv: &[String], cwd: &Path) -> Result<ProcessOutput>;
}

/// Builds a git argv from subcommand arguments.
pub(crate) fn git_argv(args: &[&str]) -> Vec<String> {
    std::iter::once("git")
        .chain(args.iter().copied())
        .map(str::to_string)
        .collect()
}

/// [`ProcessRunner`] that spawns commands on the host.
///
/// Every output line is mirrored to the operator's console as it is
/// produced (stdout lines to stdout, stderr lines to stderr) while being
/// accumulated into the returned capture.
pub struct SystemProcessRunner;

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn execute(&self, argv: &[String], cwd: &Path) -> Result<ProcessOutput> {
        let (program, args) = argv.split_first().ok_or(RelcheckError::EmptyCommand)?;

        debug!(command = %argv.join(" "), cwd = %cwd.display(), "spawning");

        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child.stdout.take().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "child stdout not captured")
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "child stderr not captured")
        })?;

        let mut out_reader = BufReader::new(stdout);
        let mut err_reader = BufReader::new(stderr);

        // read_until appends across cancelled polls, so a line interrupted
        // by the other branch is finished on the next iteration.
        let mut combined = String::new();
        let mut out_buf: Vec<u8> = Vec::new();
        let mut err_buf: Vec<u8> = Vec::new();
        let mut out_open = true;
        let mut err_open = true;

        while out_open || err_open {
            tokio::select! {
                read = out_reader.read_until(b'\n', &mut out_buf), if out_open => {
                    let n = read?;
                    flush_line(&mut out_buf, false, &mut combined);
                    if n == 0 {
                        out_open = false;
                    }
                }
                read = err_reader.read_until(b'\n', &mut err_buf), if err_open => {
                    let n = read?;
                    flush_line(&mut err_buf, true, &mut combined);
                    if n == 0 {
                        err_open = false;
                    }
                }
            }
        }

        let status = child.wait().await?;
        let exit_code = status.code().unwrap_or(-1);

        Ok(ProcessOutput {
            exit_code,
            output: combined,
        })
    }
}

/// Echo a completed (or final partial) line and append it to the capture.
fn flush_line(buf: &mut Vec<u8>, to_stderr: bool, combined: &mut String) {
    if buf.is_empty() {
        return;
    }
    let line = String::from_utf8_lossy(buf);
    if to_stderr {
        eprint!("{line}");
    } else {
        print!("{line}");
    }
    combined.push_str(&line);
    buf.clear();
}
