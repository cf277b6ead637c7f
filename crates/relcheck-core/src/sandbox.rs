//! Disposable per-attempt working directories.

use std::path::Path;

use tempfile::TempDir;

use crate::error::Result;

/// Isolated working directory for one (component, tag) attempt.
///
/// The directory is uniquely named under the system temp root and removed
/// when the sandbox is dropped, whether the attempt passed, failed, or
/// never finished setup. Attempts never share state through it.
#[derive(Debug)]
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    /// Create a fresh sandbox for the named component.
    pub fn create(component_name: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("relcheck-{}-", fs_safe_name(component_name)))
            .tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Restrict a name to filesystem-safe characters for use in paths.
pub(crate) fn fs_safe_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect()
}
