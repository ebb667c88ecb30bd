//! Per-run context: the document being read and what it is.

use crate::document::Document;

/// Descriptive data for the essay being read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EssayMeta {
    pub title: String,
    pub author: Option<String>,
    /// Source URL, opened by the open-link command.
    pub link: Option<String>,
}

/// Everything one program run reads from; shared read-only.
#[derive(Debug, Clone)]
pub struct Session {
    pub document: Document,
    pub essay: EssayMeta,
}

impl Session {
    pub fn new(document: Document, essay: EssayMeta) -> Self {
        Self { document, essay }
    }

    pub fn link(&self) -> Option<&str> {
        self.essay.link.as_deref()
    }
}
