//! Where topic text comes from, and who summarizes it.
//!
//! The extraction core never touches these: it takes a string. The traits
//! exist so the topic workflow in `report` can be driven by a local corpus,
//! a test double or a network client alike.

use std::path::{Path, PathBuf};

use thiserror::Error;
use timeline_types::SummaryRecord;
use walkdir::WalkDir;

use crate::types::DateContextMap;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("page not found: {0}")]
    NotFound(String),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("summarizer failed: {0}")]
    Summarize(String),
}

/// Topic name → page identifier.
pub trait PageResolver {
    fn resolve(&self, topic: &str) -> Result<String, SourceError>;
}

/// Page identifier → plain text.
pub trait TextSource {
    fn fetch(&self, page: &str) -> Result<String, SourceError>;
}

/// Extracted dates → one-line event summaries.
pub trait Summarizer {
    fn summarize(&self, topic: &str, dates: &DateContextMap)
    -> Result<Vec<SummaryRecord>, SourceError>;
}

// ── Local corpus ─────────────────────────────────────────────────────

/// A directory tree of `.txt` files, one page per file, named by stem.
#[derive(Debug, Clone)]
pub struct CorpusDir {
    root: PathBuf,
    /// (stem, path), sorted by stem.
    pages: Vec<(String, PathBuf)>,
}

impl CorpusDir {
    pub fn open(root: &Path) -> Result<Self, SourceError> {
        if !root.is_dir() {
            return Err(SourceError::Fetch(format!(
                "corpus directory {} does not exist",
                root.display()
            )));
        }

        let mut pages: Vec<(String, PathBuf)> = WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("txt"))
            .filter_map(|e| {
                let stem = e.path().file_stem()?.to_str()?.to_string();
                Some((stem, e.into_path()))
            })
            .collect();
        pages.sort();

        tracing::debug!(root = %root.display(), pages = pages.len(), "corpus scanned");
        Ok(CorpusDir {
            root: root.to_path_buf(),
            pages,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn page_names(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|(stem, _)| stem.as_str())
    }
}

/// Case-folded with separators dropped: "New_York", "new york" and
/// "New-York" all compare equal.
fn fold_title(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

impl PageResolver for CorpusDir {
    fn resolve(&self, topic: &str) -> Result<String, SourceError> {
        let wanted = fold_title(topic);
        if wanted.is_empty() {
            return Err(SourceError::NotFound(topic.to_string()));
        }

        let exact = self.pages.iter().find(|(stem, _)| fold_title(stem) == wanted);
        let partial = || {
            self.pages
                .iter()
                .find(|(stem, _)| fold_title(stem).contains(&wanted))
        };

        match exact.or_else(partial) {
            Some((stem, _)) => Ok(stem.clone()),
            None => Err(SourceError::NotFound(topic.to_string())),
        }
    }
}

impl TextSource for CorpusDir {
    fn fetch(&self, page: &str) -> Result<String, SourceError> {
        let (_, path) = self
            .pages
            .iter()
            .find(|(stem, _)| stem == page)
            .ok_or_else(|| SourceError::NotFound(page.to_string()))?;
        std::fs::read_to_string(path)
            .map_err(|e| SourceError::Fetch(format!("{}: {e}", path.display())))
    }
}
