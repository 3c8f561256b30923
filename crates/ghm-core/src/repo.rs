//! Repository reference parsing.

use std::fmt;

/// A GitHub repository identified by owner and name, optionally on a non-default host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    owner: String,
    name: String,
    host: Option<String>,
}

impl Repo {
    /// Create a new repo on the default host.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            host: None,
        }
    }

    /// Parse a "OWNER/REPO" or "HOST/OWNER/REPO" string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string cannot be parsed as a repository reference.
    pub fn from_full_name(nwo: &str) -> Result<Self, RepoParseError> {
        let parts: Vec<&str> = nwo.trim().split('/').collect();
        if parts.iter().any(|p| p.is_empty() || p.trim() != *p) {
            return Err(RepoParseError::InvalidFormat(nwo.to_string()));
        }
        if let Some(segment) = parts.iter().find(|p| matches!(**p, "." | "..")) {
            return Err(RepoParseError::ReservedName((*segment).to_string()));
        }
        match parts.as_slice() {
            [owner, name] => Ok(Self::new(*owner, *name)),
            [host, owner, name] => Ok(Self {
                owner: (*owner).to_string(),
                name: (*name).to_string(),
                host: Some(host.to_lowercase()),
            }),
            _ => Err(RepoParseError::InvalidFormat(nwo.to_string())),
        }
    }

    /// Repository owner (user or organization).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Explicit hostname, if one was given.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Directory name a clone of this repository lands in (the last path segment).
    pub fn clone_dir_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.host {
            Some(host) => write!(f, "{host}/{}/{}", self.owner, self.name),
            None => write!(f, "{}/{}", self.owner, self.name),
        }
    }
}

impl std::str::FromStr for Repo {
    type Err = RepoParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_full_name(s)
    }
}

/// Errors from parsing repository references.
#[derive(Debug, thiserror::Error)]
pub enum RepoParseError {
    /// String does not match expected format.
    #[error("expected OWNER/REPO or HOST/OWNER/REPO format, got {0:?}")]
    InvalidFormat(String),
    /// A path segment is `.` or `..`.
    #[error("{0:?} is not a valid owner or repository name")]
    ReservedName(String),
}
