//! Scripted process runner (testing only)
//!
//! Provides `ScriptedRunner`, a [`ProcessRunner`] that replays canned
//! outputs instead of spawning anything, so resolution and orchestration
//! logic can be tested without git or a network.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::process::{ProcessOutput, ProcessRunner};

// ---------------------------------------------------------------------------
// ScriptedRunner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Rule {
    prefix: Vec<String>,
    cwd_contains: Option<String>,
    exit_code: i32,
    output: String,
    fail_spawn: bool,
}

impl Rule {
    fn matches(&self, argv: &[String], cwd: &Path) -> bool {
        if argv.len() < self.prefix.len() || argv[..self.prefix.len()] != self.prefix[..] {
            return false;
        }
        match &self.cwd_contains {
            Some(needle) => cwd.to_string_lossy().contains(needle.as_str()),
            None => true,
        }
    }
}

/// In-memory [`ProcessRunner`] that replays scripted responses.
///
/// Rules match on an argv prefix (optionally narrowed to working
/// directories containing a substring); the first matching rule wins.
/// Unmatched commands succeed with empty output. Every invocation is
/// recorded for assertions.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to any command starting with `prefix`.
    pub fn on(mut self, prefix: &[&str], exit_code: i32, output: &str) -> Self {
        self.rules.push(Rule {
            prefix: to_owned(prefix),
            cwd_contains: None,
            exit_code,
            output: output.to_string(),
            fail_spawn: false,
        });
        self
    }

    /// Respond to commands starting with `prefix` whose working directory
    /// path contains `cwd_needle`. Sandbox directories embed the component
    /// name, so this addresses one component's commands.
    pub fn on_in(mut self, prefix: &[&str], cwd_needle: &str, exit_code: i32, output: &str) -> Self {
        self.rules.push(Rule {
            prefix: to_owned(prefix),
            cwd_contains: Some(cwd_needle.to_string()),
            exit_code,
            output: output.to_string(),
            fail_spawn: false,
        });
        self
    }

    /// Make any command starting with `prefix` fail to spawn.
    pub fn failing_spawn(mut self, prefix: &[&str]) -> Self {
        self.rules.push(Rule {
            prefix: to_owned(prefix),
            cwd_contains: None,
            exit_code: -1,
            output: String::new(),
            fail_spawn: true,
        });
        self
    }

    /// Every argv executed so far, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn execute(&self, argv: &[String], cwd: &Path) -> Result<ProcessOutput> {
        self.calls.lock().unwrap().push(argv.to_vec());

        for rule in &self.rules {
            if rule.matches(argv, cwd) {
                if rule.fail_spawn {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "scripted spawn failure",
                    )
                    .into());
                }
                return Ok(ProcessOutput {
                    exit_code: rule.exit_code,
                    output: rule.output.clone(),
                });
            }
        }

        Ok(ProcessOutput {
            exit_code: 0,
            output: String::new(),
        })
    }
}

fn to_owned(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
