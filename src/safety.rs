//! Workspace safety checks.
//!
//! The apply pipeline only ever writes files inside the repository it was
//! pointed at, and never inside generated trees (node_modules, build
//! output). The forbidden set is derived from the same ignore list the
//! scanner uses, so discovery and the write guard cannot disagree.

use crate::config::ScanConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SafetyError {
    #[error("Path is outside workspace: {path} (workspace: {workspace})")]
    OutsideWorkspace { path: PathBuf, workspace: PathBuf },

    #[error("Path is in ignored directory: {path} (ignored: {ignored})")]
    IgnoredPath { path: PathBuf, ignored: String },

    #[error("Failed to canonicalize path: {0}")]
    Canonicalize(#[from] std::io::Error),
}

/// Guards rewrites against escaping the repository root.
#[derive(Debug, Clone)]
pub struct WorkspaceGuard {
    workspace_root: PathBuf,
    ignore_dirs: Vec<String>,
}

impl WorkspaceGuard {
    /// Create a guard rooted at `workspace_root`, refusing the scan
    /// config's ignored directory names anywhere under it.
    ///
    /// The root is canonicalized so symlinked checkouts resolve
    /// consistently.
    pub fn new(
        workspace_root: impl AsRef<Path>,
        scan: &ScanConfig,
    ) -> Result<Self, SafetyError> {
        Ok(Self {
            workspace_root: workspace_root.as_ref().canonicalize()?,
            ignore_dirs: scan.ignore_dirs.clone(),
        })
    }

    /// Check that `path` is safe to rewrite, resolving it relative to the
    /// workspace root. Returns the canonical absolute path.
    ///
    /// Canonicalization happens at validation time; callers that need
    /// stronger TOCTOU guarantees should call [`Self::revalidate`]
    /// immediately before writing.
    pub fn validate_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, SafetyError> {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        };
        let canonical = absolute.canonicalize()?;
        self.check_canonical(&canonical)?;
        Ok(canonical)
    }

    /// Re-run the checks on a previously validated path, closing the
    /// window between validation and write.
    pub fn revalidate(&self, path: &Path) -> Result<PathBuf, SafetyError> {
        let canonical = path.canonicalize()?;
        self.check_canonical(&canonical)?;
        Ok(canonical)
    }

    fn check_canonical(&self, canonical: &Path) -> Result<(), SafetyError> {
        let relative = canonical.strip_prefix(&self.workspace_root).map_err(|_| {
            SafetyError::OutsideWorkspace {
                path: canonical.to_path_buf(),
                workspace: self.workspace_root.clone(),
            }
        })?;

        // Any ignored directory name anywhere in the relative path blocks
        // the write, matching how discovery prunes the walk.
        for component in relative.components() {
            let name = component.as_os_str().to_string_lossy();
            if let Some(ignored) = self.ignore_dirs.iter().find(|d| d.as_str() == name) {
                return Err(SafetyError::IgnoredPath {
                    path: canonical.to_path_buf(),
                    ignored: ignored.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn guard_for(root: &Path) -> WorkspaceGuard {
        WorkspaceGuard::new(root, &ScanConfig::default()).unwrap()
    }

    #[test]
    fn accepts_source_inside_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("src/index.js");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, b"").unwrap();

        assert!(guard_for(dir.path()).validate_path(&file).is_ok());
    }

    #[test]
    fn accepts_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.js"), b"").unwrap();

        assert!(guard_for(dir.path()).validate_path("app.js").is_ok());
    }

    #[test]
    fn rejects_paths_outside_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = dir.path().join("workspace");
        fs::create_dir_all(&workspace).unwrap();
        let outside = dir.path().join("outside.js");
        fs::write(&outside, b"").unwrap();

        let result = guard_for(&workspace).validate_path(&outside);
        assert!(matches!(result, Err(SafetyError::OutsideWorkspace { .. })));
    }

    #[test]
    fn rejects_ignored_directories_at_any_depth() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("packages/app/node_modules/dep");
        fs::create_dir_all(&nested).unwrap();
        let file = nested.join("index.js");
        fs::write(&file, b"").unwrap();

        let result = guard_for(dir.path()).validate_path(&file);
        assert!(matches!(result, Err(SafetyError::IgnoredPath { .. })));
    }

    #[test]
    fn custom_ignore_list_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        let generated = dir.path().join("generated");
        fs::create_dir_all(&generated).unwrap();
        let file = generated.join("out.js");
        fs::write(&file, b"").unwrap();

        let scan = ScanConfig {
            ignore_dirs: vec!["generated".to_string()],
            ..ScanConfig::default()
        };
        let guard = WorkspaceGuard::new(dir.path(), &scan).unwrap();
        assert!(matches!(
            guard.validate_path(&file),
            Err(SafetyError::IgnoredPath { .. })
        ));
    }

    #[test]
    #[cfg(unix)]
    fn rejects_symlink_escape() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let workspace = dir.path().join("workspace");
        fs::create_dir_all(&workspace).unwrap();
        let outside = dir.path().join("outside.js");
        fs::write(&outside, b"").unwrap();
        let link = workspace.join("escape.js");
        symlink(&outside, &link).unwrap();

        let result = guard_for(&workspace).validate_path(&link);
        assert!(matches!(result, Err(SafetyError::OutsideWorkspace { .. })));
    }
}
