use chrono::{Local, LocalResult, TimeZone};
use serde::Serialize;
use tokio::sync::OnceCell;
use url::Url;

use crate::{
  client::{Client, ClientConfig},
  index::ArticleEntry,
  util::Result,
};

/// Configuration for a [`Reader`].
#[derive(Clone, Debug)]
pub struct ReaderConfig {
  /// Base URL prepended to all fetches: the index lives at
  /// `<base>/metadata.json` and article bodies at `<base>/pages/<slug>`.
  pub base: Url,
}

/// Read-side access to a published archive.
///
/// The index is fetched lazily on first use and cached for the
/// lifetime of the reader; an archive republished afterwards is not
/// picked up. There is no invalidation path.
pub struct Reader {
  base: Url,
  client: Client,
  index: OnceCell<Vec<ArticleEntry>>,
}

/// An article entry with timestamps rendered for display.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ArticleView {
  pub title: String,
  pub link: String,
  pub content: String,
  pub published: String,
  pub fetched: String,
  pub author: Option<String>,
  pub summary: String,
}

impl ArticleView {
  fn from_entry(entry: &ArticleEntry) -> Self {
    Self {
      title: entry.title.clone(),
      link: entry.link.clone(),
      content: entry.content.clone(),
      published: format_millis(entry.published),
      fetched: format_millis(entry.fetched),
      author: entry.author.clone(),
      summary: entry.summary.clone(),
    }
  }
}

impl Reader {
  pub fn new(config: ReaderConfig) -> Result<Self> {
    let mut base = config.base;
    // joining relative references requires a trailing slash
    if !base.path().ends_with('/') {
      base.set_path(&format!("{}/", base.path()));
    }

    Ok(Self {
      base,
      client: ClientConfig::default().build()?,
      index: OnceCell::new(),
    })
  }

  /// List all archived articles, newest first.
  pub async fn list_articles(&self) -> Result<Vec<ArticleView>> {
    let entries = self
      .index
      .get_or_try_init(|| self.fetch_index())
      .await?;
    Ok(entries.iter().map(ArticleView::from_entry).collect())
  }

  /// Fetch the raw body of an article by its `content` reference.
  pub async fn get_content(&self, reference: &str) -> Result<String> {
    let url = self.base.join(reference)?;
    let resp = self.client.get(&url).await?.error_for_status()?;
    Ok(resp.text())
  }

  async fn fetch_index(&self) -> Result<Vec<ArticleEntry>> {
    let url = self.base.join("metadata.json")?;
    let resp = self.client.get(&url).await?.error_for_status()?;
    Ok(serde_json::from_slice(resp.body())?)
  }
}

fn format_millis(millis: i64) -> String {
  match Local.timestamp_millis_opt(millis) {
    LocalResult::Single(date) => date.format("%Y-%m-%d %H:%M:%S").to_string(),
    _ => millis.to_string(),
  }
}
