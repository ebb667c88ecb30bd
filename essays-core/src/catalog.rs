//! Essay catalog: authors and their essays, loaded from a TOML index.
//!
//! Raw records are deserialized first and then validated into strongly typed
//! [`EssayRecord`]s, so lookups never deal with missing or malformed fields.

use crate::error::CatalogError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    authors: Vec<RawAuthor>,
}

#[derive(Debug, Deserialize)]
struct RawAuthor {
    name: String,
    #[serde(default)]
    essays: Vec<RawEssay>,
}

#[derive(Debug, Deserialize)]
struct RawEssay {
    title: String,
    file: String,
    #[serde(default)]
    link: Option<String>,
}

/// One essay: where its text lives and where it was published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EssayRecord {
    pub title: String,
    /// Relative to the catalog root unless absolute.
    pub file: PathBuf,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub essays: Vec<EssayRecord>,
}

/// Validated catalog. Essay files resolve against `root`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    root: PathBuf,
    authors: Vec<Author>,
}

impl Catalog {
    /// Parse and validate catalog TOML; `root` is the base for relative essay files.
    pub fn from_toml(s: &str, root: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let raw: RawCatalog = toml::from_str(s)?;
        let authors = validate(raw)?;
        Ok(Self {
            root: root.into(),
            authors,
        })
    }

    /// Load from file path. Essay files resolve against the file's directory.
    pub fn load_path(path: &Path) -> Result<Self, CatalogError> {
        let s = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let root = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        Self::from_toml(&s, root)
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    /// Case-insensitive author lookup.
    pub fn author(&self, name: &str) -> Result<&Author, CatalogError> {
        self.authors
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CatalogError::UnknownAuthor(name.to_string()))
    }

    /// Essay by author and title, both case-insensitive.
    pub fn find(&self, author: &str, title: &str) -> Result<&EssayRecord, CatalogError> {
        let a = self.author(author)?;
        a.essays
            .iter()
            .find(|e| e.title.eq_ignore_ascii_case(title))
            .ok_or_else(|| CatalogError::UnknownTitle {
                author: a.name.clone(),
                title: title.to_string(),
            })
    }

    /// Essay by author and 0-based position in the catalog.
    pub fn nth(&self, author: &str, index: usize) -> Result<&EssayRecord, CatalogError> {
        let a = self.author(author)?;
        a.essays.get(index).ok_or_else(|| CatalogError::IndexOutOfRange {
            author: a.name.clone(),
            index,
            len: a.essays.len(),
        })
    }

    pub fn resolve_path(&self, record: &EssayRecord) -> PathBuf {
        self.root.join(&record.file)
    }
}

fn validate(raw: RawCatalog) -> Result<Vec<Author>, CatalogError> {
    let mut seen_authors = HashSet::new();
    let mut authors = Vec::with_capacity(raw.authors.len());
    for (i, ra) in raw.authors.into_iter().enumerate() {
        let name = ra.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::EmptyAuthor(i));
        }
        if !seen_authors.insert(name.to_lowercase()) {
            return Err(CatalogError::DuplicateAuthor(name));
        }

        let mut seen_titles = HashSet::new();
        let mut essays = Vec::with_capacity(ra.essays.len());
        for (j, re) in ra.essays.into_iter().enumerate() {
            let title = re.title.trim().to_string();
            if title.is_empty() {
                return Err(CatalogError::EmptyTitle {
                    author: name.clone(),
                    index: j,
                });
            }
            if re.file.trim().is_empty() {
                return Err(CatalogError::EmptyFile {
                    author: name.clone(),
                    title,
                });
            }
            if !seen_titles.insert(title.to_lowercase()) {
                return Err(CatalogError::DuplicateTitle {
                    author: name.clone(),
                    title,
                });
            }
            let link = match re.link.filter(|l| !l.trim().is_empty()) {
                Some(link) => Some(validate_link(&name, &title, link)?),
                None => None,
            };
            essays.push(EssayRecord {
                title,
                file: PathBuf::from(re.file.trim()),
                link,
            });
        }
        authors.push(Author { name, essays });
    }
    Ok(authors)
}

fn validate_link(author: &str, title: &str, link: String) -> Result<String, CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidLink {
        author: author.to_string(),
        title: title.to_string(),
        link: link.clone(),
        reason,
    };
    let url = url::Url::parse(link.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}
