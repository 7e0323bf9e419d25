use chrono::{DateTime, FixedOffset};

use crate::util::{self, Result};

/// A parsed feed document, either RSS 2.0 or Atom 1.0.
#[derive(Clone, Debug)]
pub enum Feed {
  Rss(rss::Channel),
  Atom(atom_syndication::Feed),
}

impl Feed {
  pub fn from_rss_content(content: &[u8]) -> Result<Self> {
    let cursor = std::io::Cursor::new(content);
    let channel = rss::Channel::read_from(cursor)
      .map_err(|_| util::Error::FeedParse("invalid rss document"))?;
    Ok(Feed::Rss(channel))
  }

  pub fn from_atom_content(content: &[u8]) -> Result<Self> {
    let cursor = std::io::Cursor::new(content);
    let feed = atom_syndication::Feed::read_from(cursor)
      .map_err(|_| util::Error::FeedParse("invalid atom document"))?;
    Ok(Feed::Atom(feed))
  }

  pub fn from_xml_content(content: &[u8]) -> Result<Self> {
    Feed::from_rss_content(content)
      .or_else(|_| Feed::from_atom_content(content))
  }

  pub fn title(&self) -> &str {
    match self {
      Feed::Rss(channel) => &channel.title,
      Feed::Atom(feed) => feed.title.as_str(),
    }
  }

  pub fn take_posts(&mut self) -> Vec<Post> {
    match self {
      Feed::Rss(channel) => {
        let posts = channel.items.split_off(0);
        posts.into_iter().map(Post::Rss).collect()
      }
      Feed::Atom(feed) => {
        let posts = feed.entries.split_off(0);
        posts.into_iter().map(Post::Atom).collect()
      }
    }
  }
}

/// One article as it appears in a feed, before normalization into the
/// index.
#[derive(Clone, Debug)]
pub enum Post {
  Rss(rss::Item),
  Atom(atom_syndication::Entry),
}

impl Post {
  pub fn link(&self) -> Option<&str> {
    match self {
      Post::Rss(item) => item.link.as_deref(),
      Post::Atom(entry) => entry.links.first().map(|l| l.href.as_str()),
    }
  }

  pub fn title(&self) -> Option<&str> {
    match self {
      Post::Rss(item) => item.title.as_deref(),
      Post::Atom(entry) => Some(&entry.title.value),
    }
  }

  pub fn author(&self) -> Option<&str> {
    match self {
      Post::Rss(item) => item.author.as_deref(),
      Post::Atom(entry) => entry.authors.first().map(|a| a.name.as_str()),
    }
  }

  pub fn summary(&self) -> Option<&str> {
    match self {
      Post::Rss(_) => None,
      Post::Atom(entry) => entry.summary.as_ref().map(|s| s.value.as_str()),
    }
  }

  /// The article body, picking the richest field present:
  /// `content:encoded` before `description` for RSS, `content` before
  /// `summary` for Atom.
  pub fn body(&self) -> Option<&str> {
    match self {
      Post::Rss(item) => item.content.as_deref().or(item.description.as_deref()),
      Post::Atom(entry) => entry
        .content
        .as_ref()
        .and_then(|c| c.value.as_deref())
        .or_else(|| entry.summary.as_ref().map(|s| s.value.as_str())),
    }
  }

  /// Update time of the post, falling back to the publication date.
  pub fn updated(&self) -> Option<DateTime<FixedOffset>> {
    match self {
      Post::Rss(item) => {
        item.pub_date.as_ref().and_then(|s| util::date::parse_date(s))
      }
      Post::Atom(entry) => Some(entry.updated),
    }
  }
}
