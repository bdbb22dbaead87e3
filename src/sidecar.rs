//! Persisted path reference
//!
//! The export phase copies the recipe into a snapshot that has no `.git`
//! directory. Before that happens it records the original working-copy path
//! in a small TOML file next to the exported recipe, so a later phase can
//! still find the branch. The record is written once and read at most once
//! per invocation.

use crate::error::{PackError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Current schema of the persisted record
pub const SCHEMA_VERSION: u32 = 1;

/// Default file name of the persisted record
pub const DEFAULT_FILE_NAME: &str = "__gitpath.toml";

/// The persisted record: one checked field plus its schema version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitPathRecord {
    pub schema: u32,
    pub source_path: PathBuf,
}

impl GitPathRecord {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        GitPathRecord {
            schema: SCHEMA_VERSION,
            source_path: source_path.into(),
        }
    }
}

/// Location of a persisted record on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathReference {
    path: PathBuf,
}

impl PathReference {
    /// Reference to `<dir>/<file_name>`
    pub fn in_dir(dir: impl AsRef<Path>, file_name: &str) -> Self {
        PathReference {
            path: dir.as_ref().join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write the record, refusing to replace an existing one
    pub fn persist(&self, source_path: impl Into<PathBuf>) -> Result<GitPathRecord> {
        let record = GitPathRecord::new(source_path);
        let contents = toml::to_string(&record)
            .map_err(|e| PackError::sidecar(format!("Cannot serialize record: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(PackError::SidecarExists {
                    path: self.path.clone(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        write_or_remove(&self.path, file, contents.as_bytes())?;

        tracing::debug!(
            sidecar = %self.path.display(),
            source = %record.source_path.display(),
            "persisted working copy path"
        );
        Ok(record)
    }

    /// Read and schema-check the record
    pub fn load(self) -> Result<GitPathRecord> {
        let contents = fs::read_to_string(&self.path)?;
        let record: GitPathRecord = toml::from_str(&contents).map_err(|e| {
            PackError::sidecar(format!("Malformed record '{}': {}", self.path.display(), e))
        })?;

        if record.schema != SCHEMA_VERSION {
            return Err(PackError::sidecar(format!(
                "Unsupported schema {} in '{}' (expected {})",
                record.schema,
                self.path.display(),
                SCHEMA_VERSION
            )));
        }

        tracing::debug!(
            sidecar = %self.path.display(),
            source = %record.source_path.display(),
            "loaded working copy path"
        );
        Ok(record)
    }
}

/// Write `contents`, removing `path` again if the write does not complete
fn write_or_remove<W: Write>(path: &Path, mut writer: W, contents: &[u8]) -> Result<()> {
    if let Err(e) = writer.write_all(contents).and_then(|_| writer.flush()) {
        drop(writer);
        if let Err(remove_err) = fs::remove_file(path) {
            tracing::warn!(
                sidecar = %path.display(),
                error = %remove_err,
                "could not remove partial record"
            );
        }
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::TempDir;

    // Accepts a few bytes, then fails like a full disk
    struct ShortWriter {
        written: usize,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written >= 4 {
                return Err(io::Error::new(io::ErrorKind::Other, "no space left"));
            }
            let n = buf.len().min(4 - self.written);
            self.written += n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_leaves_no_record() {
        let dir = TempDir::new().unwrap();
        let reference = PathReference::in_dir(dir.path(), DEFAULT_FILE_NAME);
        fs::write(reference.path(), "sche").unwrap();

        let result = write_or_remove(
            reference.path(),
            ShortWriter { written: 0 },
            b"schema = 1\nsource_path = \"/src\"\n",
        );

        assert!(matches!(result, Err(PackError::Io(_))));
        assert!(!reference.exists());

        reference.persist("/src").unwrap();
        assert_eq!(reference.load().unwrap().source_path, PathBuf::from("/src"));
    }

    #[test]
    fn test_persist_then_load() {
        let dir = TempDir::new().unwrap();
        let reference = PathReference::in_dir(dir.path(), DEFAULT_FILE_NAME);

        reference.persist("/work/hdps/VTKLoaderPlugin").unwrap();
        assert!(reference.exists());

        let record = reference.load().unwrap();
        assert_eq!(record.source_path, PathBuf::from("/work/hdps/VTKLoaderPlugin"));
        assert_eq!(record.schema, SCHEMA_VERSION);
    }

    #[test]
    fn test_persist_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let reference = PathReference::in_dir(dir.path(), DEFAULT_FILE_NAME);

        reference.persist("/first").unwrap();
        let second = reference.persist("/second");
        assert!(matches!(second, Err(PackError::SidecarExists { .. })));

        assert_eq!(reference.load().unwrap().source_path, PathBuf::from("/first"));
    }

    #[test]
    fn test_persist_creates_export_dir() {
        let dir = TempDir::new().unwrap();
        let export = dir.path().join("export").join("nested");
        let reference = PathReference::in_dir(&export, DEFAULT_FILE_NAME);

        reference.persist("/src").unwrap();
        assert!(export.join(DEFAULT_FILE_NAME).is_file());
    }

    #[test]
    fn test_load_rejects_unknown_schema() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEFAULT_FILE_NAME),
            "schema = 7\nsource_path = \"/src\"\n",
        )
        .unwrap();

        let result = PathReference::in_dir(dir.path(), DEFAULT_FILE_NAME).load();
        match result {
            Err(PackError::Sidecar(msg)) => assert!(msg.contains("Unsupported schema 7")),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_rejects_bare_string() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DEFAULT_FILE_NAME), "/just/a/path").unwrap();

        let result = PathReference::in_dir(dir.path(), DEFAULT_FILE_NAME).load();
        assert!(matches!(result, Err(PackError::Sidecar(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = PathReference::in_dir(dir.path(), DEFAULT_FILE_NAME).load();
        assert!(matches!(result, Err(PackError::Io(_))));
    }
}
