use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
  client::Client,
  feed::Feed,
  util::{Error, Result},
};

/// One row of the feed configuration list.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FeedSource {
  /// Display label for the feed
  pub name: String,
  /// Feed endpoint
  pub url: Url,
}

/// The full feed configuration, a JSON array of sources.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(transparent)]
pub struct FeedList {
  pub sources: Vec<FeedSource>,
}

impl FeedList {
  /// A missing configuration file is fatal; there is nothing to
  /// harvest without one.
  pub fn load_from_file(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Err(Error::ConfigMissing(path.to_path_buf()));
    }

    let f = std::fs::File::open(path)?;
    let feed_list = serde_json::from_reader(f)?;
    Ok(feed_list)
  }
}

impl FeedSource {
  pub async fn fetch_feed(&self, client: &Client) -> Result<Feed> {
    let resp = client.get(&self.url).await?.error_for_status()?;
    Feed::from_xml_content(resp.body())
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn parses_feed_list_json() {
    let json = r#"[
      {"name": "Example", "url": "http://blog.example/feed.xml"},
      {"name": "Atom", "url": "http://atom.example/feed.atom"}
    ]"#;

    let list: FeedList = serde_json::from_str(json).unwrap();
    assert_eq!(list.sources.len(), 2);
    assert_eq!(list.sources[0].name, "Example");
    assert_eq!(list.sources[1].url.as_str(), "http://atom.example/feed.atom");
  }

  #[test]
  fn missing_file_is_a_config_error() {
    let path = Path::new("/nonexistent/feed.json");
    let err = FeedList::load_from_file(path).unwrap_err();
    assert!(matches!(err, Error::ConfigMissing(_)));
  }
}
