//! Resolve what to read (a file, or a catalog entry) and load it into a session.

use crate::args::Cli;
use anyhow::{Context, Result};
use essays_core::{Catalog, Document, EssayMeta, Session};
use std::path::Path;

pub const USAGE: &str = "nothing to read: pass --file <path>, or --catalog <path> --author <name> [--title <title> | --index <n>]";

pub fn load_session(cli: &Cli) -> Result<Session> {
    if let Some(path) = &cli.file {
        let document = read_document(path)?;
        let essay = EssayMeta {
            title: path.display().to_string(),
            author: None,
            link: None,
        };
        return Ok(Session::new(document, essay));
    }

    let (Some(catalog_path), Some(author)) = (&cli.catalog, &cli.author) else {
        anyhow::bail!(USAGE);
    };
    let catalog = Catalog::load_path(catalog_path)?;
    let record = match (&cli.title, cli.index) {
        (Some(title), _) => catalog.find(author, title)?,
        (None, Some(index)) => catalog.nth(author, index)?,
        (None, None) => catalog.nth(author, 0)?,
    };
    let document = read_document(&catalog.resolve_path(record))?;
    let essay = EssayMeta {
        title: record.title.clone(),
        author: Some(catalog.author(author)?.name.clone()),
        link: record.link.clone(),
    };
    Ok(Session::new(document, essay))
}

fn read_document(path: &Path) -> Result<Document> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read essay {}", path.display()))?;
    Ok(Document::load(&bytes))
}
