//! Version-filter to release-tag resolution.
//!
//! Resolution never touches a sandbox: tags are enumerated from a
//! disposable history-only clone, newest first, using git's own version
//! ordering (`--sort=-v:refname`). Any failure to enumerate is folded
//! into a skip outcome so one unreachable repository cannot end the run.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::process::{git_argv, ProcessRunner};
use crate::registry::Component;
use crate::sandbox::fs_safe_name;

/// Policy for how many tags a version filter selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Only the newest tag matching `<prefix>.*`.
    SingleLatest,

    /// Every tag starting with `<prefix>`, newest first.
    AllMatching,
}

/// Outcome of resolving one component against a version filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Concrete tags to verify, in descending version order.
    Tags(Vec<String>),

    /// No tag matched the effective prefix (or the repository could not
    /// be reached to find out).
    NoMatchingTag { prefix: String },

    /// No filter and no component default; nothing to look for.
    NoVersion,
}

/// The prefix actually used for tag matching: the invoker's filter when
/// present, otherwise the component's default version.
fn effective_prefix(component: &Component, version_filter: &str) -> Option<String> {
    if !version_filter.is_empty() {
        return Some(version_filter.to_string());
    }
    match component.default_version.as_deref() {
        Some(default) if !default.is_empty() => Some(default.to_string()),
        _ => None,
    }
}

/// Resolve the tags to verify for one component.
pub async fn resolve(
    runner: &dyn ProcessRunner,
    component: &Component,
    version_filter: &str,
    mode: ResolutionMode,
) -> Resolution {
    let Some(prefix) = effective_prefix(component, version_filter) else {
        debug!(component = %component.name, "no version filter and no default");
        return Resolution::NoVersion;
    };

    let listing = match tempfile::Builder::new()
        .prefix(&format!("relcheck-tags-{}-", fs_safe_name(&component.name)))
        .tempdir()
    {
        Ok(dir) => dir,
        Err(err) => {
            warn!(component = %component.name, error = %err, "tag listing directory creation failed");
            return Resolution::NoMatchingTag { prefix };
        }
    };

    // History-only clone; tags are enumerable without a working tree.
    let clone = git_argv(&["clone", "--quiet", "--no-checkout", &component.repo, "."]);
    match runner.execute(&clone, listing.path()).await {
        Ok(out) if out.success() => {}
        Ok(out) => {
            warn!(
                component = %component.name,
                exit_code = out.exit_code,
                "clone for tag listing failed"
            );
            return Resolution::NoMatchingTag { prefix };
        }
        Err(err) => {
            warn!(component = %component.name, error = %err, "clone for tag listing failed");
            return Resolution::NoMatchingTag { prefix };
        }
    }

    let glob = match mode {
        ResolutionMode::SingleLatest => format!("{prefix}.*"),
        ResolutionMode::AllMatching => format!("{prefix}*"),
    };
    let list = git_argv(&["tag", "--list", &glob, "--sort=-v:refname"]);
    let listed = match runner.execute(&list, listing.path()).await {
        Ok(out) if out.success() => out.output,
        Ok(out) => {
            warn!(component = %component.name, exit_code = out.exit_code, "tag listing failed");
            return Resolution::NoMatchingTag { prefix };
        }
        Err(err) => {
            warn!(component = %component.name, error = %err, "tag listing failed");
            return Resolution::NoMatchingTag { prefix };
        }
    };

    let mut tags: Vec<String> = listed
        .lines()
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && tag.starts_with(prefix.as_str()))
        .map(str::to_string)
        .collect();

    if tags.is_empty() {
        return Resolution::NoMatchingTag { prefix };
    }
    if mode == ResolutionMode::SingleLatest {
        tags.truncate(1);
    }

    debug!(component = %component.name, count = tags.len(), "resolved tags");
    Resolution::Tags(tags)
}
