use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::ResolvedFile;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Refusing to write outside the output directory: {0}")]
    UnsafePath(String),
    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One file put on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    /// Copy of the previous content, when one was made
    pub backup: Option<PathBuf>,
}

/// Outcome of writing a batch; failures do not stop the batch.
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<WrittenFile>,
    pub failed: Vec<(String, WriteError)>,
}

/// Writes resolved files below an output root
#[derive(Debug, Clone)]
pub struct FileWriter {
    root: PathBuf,
    backups: bool,
}

impl FileWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            backups: false,
        }
    }

    /// Keep `<file>.backup` copies of files that get overwritten
    pub fn with_backups(mut self, enabled: bool) -> Self {
        self.backups = enabled;
        self
    }

    /// Joins a relative path onto the root. Absolute paths and `..` are rejected.
    pub fn target_path(&self, relative: &str) -> Result<PathBuf, WriteError> {
        let unsafe_path = || WriteError::UnsafePath(relative.to_string());
        let path = Path::new(relative);

        if relative.trim().is_empty() || relative.starts_with('\\') {
            return Err(unsafe_path());
        }

        for component in path.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => return Err(unsafe_path()),
            }
        }

        Ok(self.root.join(path))
    }

    pub fn write_file(&self, file: &ResolvedFile) -> Result<WrittenFile, WriteError> {
        let target = self.target_path(&file.path)?;
        let io_error = |source: std::io::Error| WriteError::Io {
            path: target.clone(),
            source,
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let backup = if self.backups && target.is_file() {
            let mut name = target.clone().into_os_string();
            name.push(".backup");
            let backup = PathBuf::from(name);
            fs::copy(&target, &backup).map_err(io_error)?;
            debug!("Backed up {:?} to {:?}", target, backup);
            Some(backup)
        } else {
            None
        };

        fs::write(&target, &file.content).map_err(io_error)?;

        Ok(WrittenFile {
            path: target,
            backup,
        })
    }

    pub fn write_all(&self, files: &[ResolvedFile]) -> WriteReport {
        let mut report = WriteReport::default();

        for file in files {
            match self.write_file(file) {
                Ok(written) => report.written.push(written),
                Err(e) => {
                    warn!("{}", e);
                    report.failed.push((file.path.clone(), e));
                }
            }
        }

        report
    }
}
