//! Transient print artifacts
//!
//! OS print tooling that only accepts files gets the document through a
//! [`StagedDocument`]. The file is removed when the value is dropped, on
//! every exit path of a delivery.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{PrintError, PrintResult};

/// A document written to a uniquely named file in the staging directory
#[derive(Debug)]
pub struct StagedDocument {
    file: Option<NamedTempFile>,
}

impl StagedDocument {
    /// Write `data` to `ticket-<unix-millis>-<random>.bin` inside `dir`
    pub fn stage(dir: &Path, data: &[u8]) -> PrintResult<Self> {
        let staging_err = |source| PrintError::Staging {
            dir: dir.to_path_buf(),
            source,
        };

        let prefix = format!("ticket-{}-", chrono::Utc::now().timestamp_millis());
        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".bin")
            .tempfile_in(dir)
            .map_err(staging_err)?;

        file.write_all(data).map_err(staging_err)?;
        file.as_file().sync_all().map_err(staging_err)?;

        debug!(path = %file.path().display(), bytes = data.len(), "Staged print document");
        Ok(Self { file: Some(file) })
    }

    /// Path of the staged file
    pub fn path(&self) -> &Path {
        match &self.file {
            Some(file) => file.path(),
            None => Path::new(""),
        }
    }
}

impl Drop for StagedDocument {
    fn drop(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };
        let path = file.path().to_path_buf();
        match file.close() {
            Ok(()) => debug!(path = %path.display(), "Staged document removed"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove staged document"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_writes_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let data = b"\x1B\x40Gracias por su compra\n\x1D\x56\x00";

        let staged = StagedDocument::stage(dir.path(), data).unwrap();
        assert_eq!(std::fs::read(staged.path()).unwrap(), data);

        let name = staged.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("ticket-"));
        assert!(name.ends_with(".bin"));
    }

    #[test]
    fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedDocument::stage(dir.path(), b"data").unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());

        drop(staged);
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_names_unique_within_same_millisecond() {
        let dir = tempfile::tempdir().unwrap();
        let staged: Vec<_> = (0..64)
            .map(|_| StagedDocument::stage(dir.path(), b"x").unwrap())
            .collect();

        let mut paths: Vec<_> = staged.iter().map(|s| s.path().to_path_buf()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 64);
    }

    #[test]
    fn test_stage_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = StagedDocument::stage(&missing, b"x").unwrap_err();
        assert!(matches!(err, PrintError::Staging { .. }));
    }

    #[test]
    fn test_cleanup_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedDocument::stage(dir.path(), b"x").unwrap();

        // Someone else already removed it; drop must only log
        std::fs::remove_file(staged.path()).unwrap();
        drop(staged);
    }
}
