pub mod date;

use lazy_static::lazy_static;
use regex::Regex;

pub const USER_AGENT: &str =
  concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("Feed configuration not found: {}", .0.display())]
  ConfigMissing(std::path::PathBuf),

  #[error("IO error")]
  Io(#[from] std::io::Error),

  #[error("JSON error")]
  Json(#[from] serde_json::Error),

  #[error("Invalid URL {0}")]
  InvalidUrl(#[from] url::ParseError),

  #[error("Feed parsing error {0:?}")]
  FeedParse(&'static str),

  #[error("Reqwest client error {0:?}")]
  Reqwest(#[from] reqwest::Error),

  #[error("HTTP status error {0} (url: {1})")]
  HttpStatus(reqwest::StatusCode, url::Url),
}

lazy_static! {
  static ref SCHEME: Regex = Regex::new(r"^https?://").unwrap();
  static ref NON_WORD: Regex = Regex::new(r"[^\w\s-]").unwrap();
  static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Derive the content file name for an article link. Distinct links
/// can slugify identically, in which case the later article body
/// overwrites the earlier file.
pub fn slugify(link: &str) -> String {
  let slug = SCHEME.replace(link, "");
  let slug = NON_WORD.replace_all(&slug, "-");
  let slug = WHITESPACE.replace_all(&slug, "-");
  slug.to_lowercase()
}
