//! Report artifacts: run directories, tabular and structured summaries,
//! and per-attempt log files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use crate::ansi::ansi_to_html;
use crate::attempt::{Attempt, ReportRecord, RunReport};
use crate::sandbox::fs_safe_name;

/// Directory key for runs invoked without a version filter.
const UNKNOWN_VERSION_KEY: &str = "unknown_version";

/// Destination directories for one run's artifacts.
///
/// `run_dir` is timestamped and never reused; `latest_dir` is a stable
/// per-filter location that always mirrors the newest run.
#[derive(Debug, Clone)]
pub struct RunDirs {
    pub run_dir: PathBuf,
    pub latest_dir: PathBuf,
}

impl RunDirs {
    /// Create `<root>/<key>/<timestamp>` and recreate `<root>/latest/<key>`,
    /// where `key` is the version filter (or a fixed placeholder when the
    /// filter is empty).
    pub fn prepare(output_root: &Path, version_filter: &str) -> Result<Self> {
        let key = dir_key(version_filter);
        let timestamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let run_dir = output_root.join(&key).join(timestamp);
        let latest_dir = output_root.join("latest").join(&key);

        fs::create_dir_all(&run_dir)
            .with_context(|| format!("create run directory {:?}", run_dir))?;
        if latest_dir.exists() {
            fs::remove_dir_all(&latest_dir)
                .with_context(|| format!("clear latest directory {:?}", latest_dir))?;
        }
        fs::create_dir_all(&latest_dir)
            .with_context(|| format!("create latest directory {:?}", latest_dir))?;

        Ok(Self {
            run_dir,
            latest_dir,
        })
    }
}

fn dir_key(version_filter: &str) -> String {
    if version_filter.is_empty() {
        UNKNOWN_VERSION_KEY.to_string()
    } else {
        fs_safe_name(version_filter)
    }
}

/// File stem shared by the markdown and HTML log artifacts of one attempt.
fn log_file_stem(tag: &str) -> String {
    format!("log{}", fs_safe_name(tag))
}

/// Render the tabular summary, one row per attempt in report order.
pub fn render_markdown(report: &RunReport) -> String {
    let mut md = String::from(
        "# Test Results\n\n| Component | Version | Status | Log |\n|-----------|---------|--------|-----|\n",
    );
    for attempt in &report.attempts {
        md.push_str(&render_row(attempt));
    }
    md
}

fn render_row(attempt: &Attempt) -> String {
    let component = format!("[{}]({})", attempt.component, attempt.repo);
    let (version, log) = match attempt.tag.as_deref() {
        Some(tag) if attempt.reached_execution() => (
            format!("[{}]({}/releases/tag/{})", tag, attempt.repo, tag),
            format!("[Log]({}.html)", log_file_stem(tag)),
        ),
        _ => ("-".to_string(), "-".to_string()),
    };
    format!(
        "| {} | {} | {} | {} |\n",
        component,
        version,
        attempt.status.label(),
        log
    )
}

/// Flatten a report into the records serialized as `report.json`.
pub fn records(report: &RunReport) -> Vec<ReportRecord> {
    report.attempts.iter().map(ReportRecord::from).collect()
}

/// Write every artifact for the run, then mirror them into the latest
/// directory. Rendering depends only on the report, so emitting the same
/// report twice produces identical files.
pub fn emit(report: &RunReport, dirs: &RunDirs) -> Result<()> {
    for attempt in &report.attempts {
        if !attempt.reached_execution() {
            continue;
        }
        let Some(tag) = attempt.tag.as_deref() else {
            continue;
        };
        let stem = log_file_stem(tag);
        let md_path = dirs.run_dir.join(format!("{stem}.md"));
        fs::write(&md_path, &attempt.log).with_context(|| format!("write {:?}", md_path))?;
        let html_path = dirs.run_dir.join(format!("{stem}.html"));
        fs::write(&html_path, ansi_to_html(&attempt.log))
            .with_context(|| format!("write {:?}", html_path))?;
    }

    let md_path = dirs.run_dir.join("report.md");
    fs::write(&md_path, render_markdown(report)).with_context(|| format!("write {:?}", md_path))?;

    let json = serde_json::to_string_pretty(&records(report)).context("serialize report records")?;
    let json_path = dirs.run_dir.join("report.json");
    fs::write(&json_path, json).with_context(|| format!("write {:?}", json_path))?;

    mirror_latest(dirs)
}

/// Copy every artifact of the run directory into the latest directory.
fn mirror_latest(dirs: &RunDirs) -> Result<()> {
    let entries = fs::read_dir(&dirs.run_dir)
        .with_context(|| format!("read run directory {:?}", dirs.run_dir))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read run directory {:?}", dirs.run_dir))?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let target = dirs.latest_dir.join(entry.file_name());
        fs::copy(entry.path(), &target)
            .with_context(|| format!("mirror {:?} to {:?}", entry.path(), target))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attempt::AttemptStatus;
    use serde_json::json;
    use uuid::Uuid;

    fn sample_report() -> RunReport {
        RunReport {
            run_id: Uuid::new_v4(),
            attempts: vec![
                Attempt::executed(
                    "lib-parser",
                    "1.2.3",
                    0,
                    "42 tests passed\n".to_string(),
                    "https://github.com/example/lib-parser",
                ),
                Attempt::skipped(
                    "lib-codec",
                    AttemptStatus::NoMatchingTag {
                        prefix: "9.9".to_string(),
                    },
                    "https://github.com/example/lib-codec",
                ),
            ],
            exit_status: 0,
            duration_ms: 10,
        }
    }

    #[test]
    fn test_markdown_render_is_stable() {
        let actual = render_markdown(&sample_report());
        let expected = "# Test Results\n\n\
            | Component | Version | Status | Log |\n\
            |-----------|---------|--------|-----|\n\
            | [lib-parser](https://github.com/example/lib-parser) | [1.2.3](https://github.com/example/lib-parser/releases/tag/1.2.3) | Passed | [Log](log1.2.3.html) |\n\
            | [lib-codec](https://github.com/example/lib-codec) | - | No matching tag for 9.9* | - |\n";
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_records_match_attempts() {
        let report = sample_report();
        let records = records(&report);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "lib-parser");
        assert_eq!(records[0].status, "Passed");
        assert_eq!(records[1].version, "-");
        assert_eq!(records[1].status, "No matching tag for 9.9*");

        let value = serde_json::to_value(&records).unwrap();
        assert_eq!(
            value[0],
            json!({
                "name": "lib-parser",
                "version": "1.2.3",
                "status": "Passed",
                "log": "42 tests passed\n",
                "repo": "https://github.com/example/lib-parser",
            })
        );
    }

    #[test]
    fn test_prepare_creates_both_directories() {
        let root = tempfile::tempdir().unwrap();
        let dirs = RunDirs::prepare(root.path(), "1.2").unwrap();
        assert!(dirs.run_dir.is_dir());
        assert!(dirs.latest_dir.is_dir());
        assert!(dirs.run_dir.starts_with(root.path().join("1.2")));
        assert_eq!(dirs.latest_dir, root.path().join("latest").join("1.2"));
    }

    #[test]
    fn test_prepare_without_filter_uses_placeholder_key() {
        let root = tempfile::tempdir().unwrap();
        let dirs = RunDirs::prepare(root.path(), "").unwrap();
        assert!(dirs.run_dir.starts_with(root.path().join("unknown_version")));
        assert_eq!(
            dirs.latest_dir,
            root.path().join("latest").join("unknown_version")
        );
    }

    #[test]
    fn test_prepare_clears_stale_latest() {
        let root = tempfile::tempdir().unwrap();
        let stale = root.path().join("latest").join("1.2");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("report.md"), "old").unwrap();

        let dirs = RunDirs::prepare(root.path(), "1.2").unwrap();
        assert!(dirs.latest_dir.is_dir());
        assert!(!dirs.latest_dir.join("report.md").exists());
    }

    #[test]
    fn test_emit_writes_and_mirrors_artifacts() {
        let root = tempfile::tempdir().unwrap();
        let dirs = RunDirs::prepare(root.path(), "1.2").unwrap();
        emit(&sample_report(), &dirs).unwrap();

        for dir in [&dirs.run_dir, &dirs.latest_dir] {
            assert!(dir.join("report.md").is_file());
            assert!(dir.join("report.json").is_file());
            assert!(dir.join("log1.2.3.md").is_file());
            assert!(dir.join("log1.2.3.html").is_file());
        }

        // Skipped attempts leave no log files behind.
        let names: Vec<String> = fs::read_dir(&dirs.run_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names.len(), 4);

        let log = fs::read_to_string(dirs.run_dir.join("log1.2.3.md")).unwrap();
        assert_eq!(log, "42 tests passed\n");
        let mirrored = fs::read_to_string(dirs.latest_dir.join("report.md")).unwrap();
        assert_eq!(mirrored, render_markdown(&sample_report()));
    }

    #[test]
    fn test_emit_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let dirs = RunDirs::prepare(root.path(), "1.2").unwrap();
        let report = sample_report();

        emit(&report, &dirs).unwrap();
        let first = fs::read_to_string(dirs.run_dir.join("report.json")).unwrap();
        emit(&report, &dirs).unwrap();
        let second = fs::read_to_string(dirs.run_dir.join("report.json")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_report_json_is_pretty_printed() {
        let root = tempfile::tempdir().unwrap();
        let dirs = RunDirs::prepare(root.path(), "1.2").unwrap();
        emit(&sample_report(), &dirs).unwrap();

        let raw = fs::read_to_string(dirs.run_dir.join("report.json")).unwrap();
        assert!(raw.starts_with("[\n  {"));
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1]["status"], "No matching tag for 9.9*");
    }
}
