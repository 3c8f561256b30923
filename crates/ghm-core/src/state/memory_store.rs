//! In-memory state store for testing.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Document, DocumentKind, StateStore, parse_document, render_document};
use crate::errors::StateError;

/// In-memory [`StateStore`] that keeps rendered JSON text per document.
///
/// Content goes through the same render/parse path as the file store, so
/// corrupt documents can be simulated with [`MemoryStateStore::with_raw`].
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    raw: Mutex<HashMap<DocumentKind, String>>,
    fail_writes: bool,
    writes: AtomicUsize,
}

impl MemoryStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document.
    #[must_use]
    pub fn with_document(self, kind: DocumentKind, document: &Document) -> Self {
        let rendered = render_document(kind.file_name(), document).unwrap_or_default();
        self.with_raw(kind, rendered)
    }

    /// Seed a document with raw text, which need not be valid JSON.
    #[must_use]
    pub fn with_raw(self, kind: DocumentKind, raw: impl Into<String>) -> Self {
        self.raw
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(kind, raw.into());
        self
    }

    /// Make every write fail as if the disk were full.
    #[must_use]
    pub fn with_write_failure(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Raw text of a document, if present.
    pub fn raw(&self, kind: DocumentKind) -> Option<String> {
        self.raw
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&kind)
            .cloned()
    }

    /// Parsed content of a document, if present and valid.
    pub fn document(&self, kind: DocumentKind) -> Option<Document> {
        self.raw(kind)
            .and_then(|raw| parse_document(kind.file_name(), &raw).ok())
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl StateStore for MemoryStateStore {
    fn read(&self, kind: DocumentKind) -> Result<Option<Document>, StateError> {
        self.raw(kind)
            .map(|raw| parse_document(kind.file_name(), &raw))
            .transpose()
    }

    fn write(&self, kind: DocumentKind, document: &Document) -> Result<(), StateError> {
        if self.fail_writes {
            return Err(StateError::WriteFile {
                path: kind.file_name().to_string(),
                source: std::io::Error::other("no space left on device"),
            });
        }
        let rendered = render_document(kind.file_name(), document)?;
        self.raw
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(kind, rendered);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
