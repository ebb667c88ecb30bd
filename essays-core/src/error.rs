//! Catalog error types.

use std::path::PathBuf;

/// Errors raised while loading, validating or querying an essay catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Catalog is not valid TOML or does not match the expected shape.
    #[error("Invalid catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Catalog author at position {0} has an empty name")]
    EmptyAuthor(usize),

    #[error("Author '{0}' is listed more than once")]
    DuplicateAuthor(String),

    #[error("Essay at position {index} of author '{author}' has an empty title")]
    EmptyTitle { author: String, index: usize },

    #[error("Essay '{title}' by '{author}' has no file")]
    EmptyFile { author: String, title: String },

    #[error("Essay '{title}' is listed more than once for author '{author}'")]
    DuplicateTitle { author: String, title: String },

    #[error("Essay '{title}' by '{author}' has an invalid link '{link}': {reason}")]
    InvalidLink {
        author: String,
        title: String,
        link: String,
        reason: String,
    },

    #[error("No author '{0}' in catalog")]
    UnknownAuthor(String),

    #[error("No essay titled '{title}' by '{author}'")]
    UnknownTitle { author: String, title: String },

    #[error("Essay index {index} out of range for '{author}' ({len} essays)")]
    IndexOutOfRange {
        author: String,
        index: usize,
        len: usize,
    },
}
