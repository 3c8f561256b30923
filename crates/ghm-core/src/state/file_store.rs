//! File-based state store.
//!
//! Reads/writes the JSON documents in a state directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Document, DocumentKind, StateStore, parse_document, render_document};
use crate::errors::StateError;

/// [`StateStore`] backed by one JSON file per document.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Store documents in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The state directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a document's file.
    pub fn path(&self, kind: DocumentKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }
}

impl StateStore for FileStateStore {
    fn read(&self, kind: DocumentKind) -> Result<Option<Document>, StateError> {
        let path = self.path(kind);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StateError::ReadFile {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };
        parse_document(&path.display().to_string(), &content).map(Some)
    }

    fn write(&self, kind: DocumentKind, document: &Document) -> Result<(), StateError> {
        let path = self.path(kind);
        let shown = path.display().to_string();
        let write_err = |source| StateError::WriteFile {
            path: shown.clone(),
            source,
        };

        let rendered = render_document(&shown, document)?;
        if !self.dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.dir).map_err(write_err)?;
        }

        // Replace via rename so a failed write leaves the previous document intact.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, rendered).map_err(write_err)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(e));
        }
        tracing::debug!(path = %shown, entries = document.len(), "wrote document");
        Ok(())
    }
}
