//! Persisted state documents.
//!
//! The tool keeps three flat JSON documents side by side in a state
//! directory: configuration (`cconfig.json`), the local secrets cache
//! (`secrets.json`), and published workflows (`workflows.json`). Every
//! operation re-reads a document, mutates it in memory, and rewrites it
//! whole. Nothing locks the files; concurrent invocations race and the
//! last writer wins.

mod file_store;
mod memory_store;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub use file_store::FileStateStore;
pub use memory_store::MemoryStateStore;

use crate::errors::StateError;
use crate::ios_eprintln;
use crate::iostreams::IOStreams;

/// A flat string-to-string document.
pub type Document = BTreeMap<String, String>;

/// The three documents the tool persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Configuration key-value pairs (`cconfig.json`).
    Config,
    /// Locally cached secret values (`secrets.json`).
    Secrets,
    /// Workflow file contents keyed by file name (`workflows.json`).
    Workflows,
}

impl DocumentKind {
    /// All document kinds.
    pub const ALL: [Self; 3] = [Self::Config, Self::Secrets, Self::Workflows];

    /// File name of the document inside the state directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Config => "cconfig.json",
            Self::Secrets => "secrets.json",
            Self::Workflows => "workflows.json",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Storage backend for documents.
pub trait StateStore: Send + Sync + fmt::Debug {
    /// Read a document. Returns `None` when it has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing data cannot be read or parsed.
    fn read(&self, kind: DocumentKind) -> Result<Option<Document>, StateError>;

    /// Replace a document with the given content.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn write(&self, kind: DocumentKind, document: &Document) -> Result<(), StateError>;
}

/// Outcome of removing a key from a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The key existed and the document was rewritten without it.
    Removed,
    /// The key was absent; nothing was written.
    NotFound,
}

/// Load/save/upsert/remove operations over a [`StateStore`], reporting
/// recoverable problems to the user.
#[derive(Debug, Clone, Copy)]
pub struct Documents<'a> {
    store: &'a dyn StateStore,
    io: &'a IOStreams,
}

impl<'a> Documents<'a> {
    /// Wrap a store, reporting warnings on the given streams.
    pub fn new(store: &'a dyn StateStore, io: &'a IOStreams) -> Self {
        Self { store, io }
    }

    /// Load a document.
    ///
    /// A missing document is empty. An unreadable or malformed document is
    /// also treated as empty after a warning; the next save overwrites it.
    pub fn load(&self, kind: DocumentKind) -> Document {
        match self.store.read(kind) {
            Ok(document) => document.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(document = %kind, error = %err, "treating document as empty");
                let cs = self.io.color_scheme();
                let action = if err.is_corrupt() {
                    "it will be overwritten on the next save"
                } else {
                    "treating it as empty"
                };
                ios_eprintln!(self.io, "{} {err}; {action}", cs.warning_icon());
                Document::new()
            }
        }
    }

    /// Replace a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written; the change is lost.
    pub fn save(&self, kind: DocumentKind, document: &Document) -> Result<(), StateError> {
        self.store.write(kind, document)
    }

    /// Set `key` to `value` in a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn upsert(&self, kind: DocumentKind, key: &str, value: &str) -> Result<(), StateError> {
        let mut document = self.load(kind);
        document.insert(key.to_string(), value.to_string());
        self.save(kind, &document)
    }

    /// Remove `key` from a document, reporting when it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn remove(&self, kind: DocumentKind, key: &str) -> Result<RemoveOutcome, StateError> {
        let mut document = self.load(kind);
        if document.remove(key).is_none() {
            let cs = self.io.color_scheme();
            ios_eprintln!(
                self.io,
                "{} {} not found in {kind}",
                cs.warning_icon(),
                cs.bold(key),
            );
            return Ok(RemoveOutcome::NotFound);
        }
        self.save(kind, &document)?;
        Ok(RemoveOutcome::Removed)
    }
}

/// Parse document content read from `path`.
///
/// Whitespace-only content is an empty document.
pub(crate) fn parse_document(path: &str, content: &str) -> Result<Document, StateError> {
    if content.trim().is_empty() {
        return Ok(Document::new());
    }
    serde_json::from_str(content).map_err(|e| StateError::Parse {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Serialize a document as pretty JSON with four-space indentation.
pub(crate) fn render_document(path: &str, document: &Document) -> Result<String, StateError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document
        .serialize(&mut ser)
        .map_err(|e| StateError::Serialize {
            path: path.to_string(),
            message: e.to_string(),
        })?;
    buf.push(b'\n');
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
