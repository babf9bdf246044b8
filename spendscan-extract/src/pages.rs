//! Discover statement page images and recover statement id + page number
//! from filenames of the form `<statement_id>_page_<n>.jpg`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// One page image plus the identity recovered from its filename.
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    pub path: PathBuf,
    /// Source document identifier, commonly `YYYY-MM-DD`.
    pub statement_id: String,
    /// 1-based page number within the statement.
    pub page: u32,
}

/// List page images in `dir`, sorted by filename so pages stay in
/// document order. Stems without the `_page_<n>` suffix fall back to the
/// whole stem as statement id, page 1.
pub fn discover_pages(dir: impl AsRef<Path>) -> Result<Vec<PageImage>> {
    let dir = dir.as_ref();
    let re = Regex::new(r"^(?P<id>.+)_page_(?P<page>\d+)$")?;

    let entries =
        fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;

    let mut pages = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !is_image(&path) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let (statement_id, page) = split_stem(&re, stem);
        pages.push(PageImage { path, statement_id, page });
    }

    pages.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(pages)
}

fn split_stem(re: &Regex, stem: &str) -> (String, u32) {
    match re.captures(stem) {
        Some(caps) => (caps["id"].to_string(), caps["page"].parse().unwrap_or(1)),
        None => (stem.to_string(), 1),
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
