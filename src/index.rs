use std::cmp::Reverse;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::util::Result;

/// The normalized, persisted record for one article.
///
/// Entries are replaced wholesale when an update is accepted, never
/// mutated field by field.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ArticleEntry {
  pub title: String,
  /// Identity key; no two entries in the index share a link.
  pub link: String,
  /// Relative reference to the stored content file ("pages/<slug>").
  pub content: String,
  /// Update/publish time of the article, epoch milliseconds.
  pub published: i64,
  /// Wall-clock time this entry was last written into the index,
  /// epoch milliseconds.
  pub fetched: i64,
  pub author: Option<String>,
  #[serde(default)]
  pub summary: String,
}

/// The persisted article collection, the single source of truth
/// across harvest runs. Sorted newest first after every run.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ArticleIndex {
  entries: Vec<ArticleEntry>,
}

impl ArticleIndex {
  /// Load the previous snapshot. An absent file starts a fresh index;
  /// a corrupt one is discarded with a warning.
  pub fn load(path: &Path) -> Self {
    let Ok(bytes) = std::fs::read(path) else {
      return Self::default();
    };

    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
      warn!("failed to parse {}: {e}; starting a new index", path.display());
      Self::default()
    })
  }

  /// Persist the snapshot, replacing the previous one atomically via
  /// a temp file and rename.
  pub fn save(&self, path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(&self.entries)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
  }

  pub fn get_mut(&mut self, link: &str) -> Option<&mut ArticleEntry> {
    self.entries.iter_mut().find(|e| e.link == link)
  }

  pub fn push(&mut self, entry: ArticleEntry) {
    self.entries.push(entry);
  }

  pub fn sort_newest_first(&mut self) {
    self.entries.sort_by_key(|e| Reverse(e.published));
  }

  pub fn entries(&self) -> &[ArticleEntry] {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
