//! Common-password index
//!
//! Handles loading and querying the list of known-weak passwords.

use std::collections::HashSet;
use std::path::Path;

use crate::error::ResourceError;

const BUILTIN_COMMON_PASSWORDS: &str = include_str!("../assets/common-passwords.txt");

/// Set of known-weak passwords. Membership is case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct CommonPasswords {
    set: HashSet<String>,
}

impl CommonPasswords {
    /// Index built from the bundled list.
    pub fn builtin() -> Self {
        Self::from_list(BUILTIN_COMMON_PASSWORDS)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the index from newline-delimited content, skipping blanks and `#` comments.
    pub fn from_list(content: &str) -> Self {
        Self {
            set: parse_list(content).map(str::to_string).collect(),
        }
    }

    /// Loads the index from a file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read (including non UTF-8 content)
    /// - File has no entries
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ResourceError> {
        let content = read_list_file(path.as_ref())?;
        let index = Self::from_list(&content);

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Common-password list loaded: {} entries from {:?}",
            index.len(),
            path.as_ref()
        );

        Ok(index)
    }

    /// Like [`CommonPasswords::load`], but a failure yields an empty index.
    /// The error is handed back so the caller can report it.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> (Self, Option<ResourceError>) {
        match Self::load(path) {
            Ok(index) => (index, None),
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Common-password list unavailable, continuing without it: {}", e);
                (Self::empty(), Some(e))
            }
        }
    }

    pub fn contains(&self, password: &str) -> bool {
        self.set.contains(password)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

/// Trimmed, non-empty, non-comment lines.
pub(crate) fn parse_list(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
}

/// Reads a list file; an entry-less file counts as an error.
pub(crate) fn read_list_file(path: &Path) -> Result<String, ResourceError> {
    if !path.exists() {
        return Err(ResourceError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ResourceError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    if parse_list(&content).next().is_none() {
        return Err(ResourceError::EmptyFile(path.to_path_buf()));
    }

    Ok(content)
}
