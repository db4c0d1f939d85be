//! Scratch directory owned by a single report job.

use std::path::Path;

use tempfile::TempDir;

use crate::error::RenderError;

/// Process-private scratch directory the rendered artifact lands in.
///
/// Created when the job is constructed and removed recursively when the
/// guard is dropped, on every exit path.
#[derive(Debug)]
pub struct WorkDir {
    inner: TempDir,
}

impl WorkDir {
    /// Creates a fresh directory under `root`, or under the system temp
    /// directory when `root` is `None`.
    pub fn new(root: Option<&Path>, job_id: &str) -> Result<Self, RenderError> {
        let prefix = format!("reportjob-{}-", job_id);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        let inner = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| RenderError::CreateWorkDir { source: e })?;

        Ok(Self { inner })
    }

    pub fn path(&self) -> &Path {
        self.inner.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_directory_exists_after_creation() {
        let workdir = WorkDir::new(None, "abc123").unwrap();
        assert!(workdir.path().is_dir());
    }

    #[test]
    fn test_directory_removed_on_drop() {
        let workdir = WorkDir::new(None, "abc123").unwrap();
        let path: PathBuf = workdir.path().to_path_buf();
        assert!(path.exists());

        drop(workdir);
        assert!(!path.exists());
    }

    #[test]
    fn test_directory_removed_even_with_contents() {
        let workdir = WorkDir::new(None, "abc123").unwrap();
        let path = workdir.path().to_path_buf();
        std::fs::write(path.join("leftover.pdf"), b"%PDF-").unwrap();

        drop(workdir);
        assert!(!path.exists());
    }

    #[test]
    fn test_custom_root_is_honored() {
        let root = tempfile::tempdir().unwrap();
        let workdir = WorkDir::new(Some(root.path()), "abc123").unwrap();
        assert_eq!(workdir.path().parent(), Some(root.path()));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let result = WorkDir::new(Some(Path::new("/nonexistent/work/root")), "abc123");
        assert!(matches!(result, Err(RenderError::CreateWorkDir { .. })));
    }
}
