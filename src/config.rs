//! Widget configuration, loadable from TOML. Every field has the default the
//! widget ships with, so an empty file is a valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    #[default]
    User,
    List,
    Likes,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeDisplay {
    #[default]
    Relative,
    Absolute,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub feed: FeedKind,
    pub screen_name: String,
    pub list: Option<String>,
    pub count: usize,
    pub show_mentions: bool,
    pub show_replies: bool,
    pub show_retweets: bool,
    /// Fixed number of statuses to request, replacing the filter-based sizing.
    pub scan_override: Option<usize>,
    /// Link handles to their profile page instead of the follow intent.
    pub bypass_intent: bool,
    /// Language tag of the hosting page, e.g. `en-GB`.
    pub language: String,
    pub bearer_token: Option<String>,
    pub header: HeaderConfig,
    pub tweet: TweetConfig,
    pub footer: FooterConfig,
    pub cache: CacheConfig,
    pub http: HttpConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            feed: FeedKind::User,
            screen_name: String::new(),
            list: None,
            count: 3,
            show_mentions: false,
            show_replies: false,
            show_retweets: true,
            scan_override: None,
            bypass_intent: false,
            language: "en-GB".into(),
            bearer_token: None,
            header: HeaderConfig::default(),
            tweet: TweetConfig::default(),
            footer: FooterConfig::default(),
            cache: CacheConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub display: bool,
    pub user: bool,
    /// Show the display name rather than the handle.
    pub real_name: bool,
    pub bio: bool,
    pub location: bool,
    pub web: bool,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            display: true,
            user: true,
            real_name: true,
            bio: true,
            location: true,
            web: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TweetConfig {
    pub name: bool,
    pub user_separator: String,
    pub created: bool,
    pub time_display: TimeDisplay,
    pub source: bool,
    pub location: bool,
    pub reply_link: bool,
    pub retweet_count: bool,
    pub actions: bool,
    /// Turn `@mentions` and `#hashtags` into links.
    pub links: bool,
}

impl Default for TweetConfig {
    fn default() -> Self {
        Self {
            name: true,
            user_separator: " ".into(),
            created: true,
            time_display: TimeDisplay::Relative,
            source: true,
            location: true,
            reply_link: true,
            retweet_count: true,
            actions: true,
            links: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FooterConfig {
    pub follow_link: bool,
    pub follow_user: bool,
    pub follow_count: bool,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            follow_link: true,
            follow_user: true,
            follow_count: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 900,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    pub api_base: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.twitter.com/1.1".into(),
            user_agent: "TweetDisplayBack/4.0".into(),
            timeout_secs: 30,
        }
    }
}

/// The visibility rules consumed by [`crate::filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    pub show_mentions: bool,
    pub show_replies: bool,
    pub show_retweets: bool,
    pub count: usize,
    pub feed: FeedKind,
}

impl FilterConfig {
    pub fn shows_everything(&self) -> bool {
        self.show_mentions && self.show_replies && self.show_retweets
    }

    /// Number of hidden categories.
    pub fn active_filters(&self) -> usize {
        [self.show_mentions, self.show_replies, self.show_retweets]
            .iter()
            .filter(|shown| !**shown)
            .count()
    }
}

impl WidgetConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WidgetError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| WidgetError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, WidgetError> {
        toml::from_str(raw).map_err(|e| WidgetError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), WidgetError> {
        if self.screen_name.trim().is_empty() {
            return Err(WidgetError::Config("a screen name is required".into()));
        }
        if self.feed == FeedKind::List && self.list_slug().is_none() {
            return Err(WidgetError::Config("a list name is required for list feeds".into()));
        }
        Ok(())
    }

    pub fn filter(&self) -> FilterConfig {
        FilterConfig {
            show_mentions: self.show_mentions,
            show_replies: self.show_replies,
            show_retweets: self.show_retweets,
            count: self.count,
            feed: self.feed,
        }
    }

    pub fn list_slug(&self) -> Option<String> {
        self.list
            .as_deref()
            .map(crate::profile::to_slug)
            .filter(|slug| !slug.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}
