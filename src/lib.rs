//! Fetch a Twitter timeline, filter it by mention/reply/retweet visibility and
//! turn it into display-ready HTML fragments, caching raw API responses.
//!
//! ```no_run
//! # async fn demo() -> Result<(), tweet_display::WidgetError> {
//! use tweet_display::{HttpFetcher, MemoryCache, TweetDisplay, WidgetConfig};
//!
//! let config = WidgetConfig::load("widget.toml")?;
//! let fetcher = HttpFetcher::from_config(&config)?;
//! let cache = MemoryCache::new();
//! let rendered = TweetDisplay::builder()
//!     .fetcher(&fetcher)
//!     .cache(&cache)
//!     .config(&config)
//!     .module_id(1)
//!     .build()
//!     .render()
//!     .await;
//! # Ok(()) }
//! ```

mod cache;
mod config;
mod error;
mod fetch;
mod filter;
mod format;
mod html;
mod linkify;
mod profile;
mod tweet;
mod widget;

pub use cache::{Cache, CacheKey, CacheKind, FileCache, MemoryCache};
pub use config::{
    CacheConfig, FeedKind, FilterConfig, FooterConfig, HeaderConfig, HttpConfig, TimeDisplay,
    TweetConfig, WidgetConfig,
};
pub use error::{ErrorSet, WidgetError, UNABLE_TO_LOAD};
pub use fetch::{decode_profile, decode_timeline, feed_url, profile_url, scan_count, Fetcher, HttpFetcher};
pub use filter::{select, Classification};
pub use format::{format_tweet, relative_time, DisplayRecord, RenderContext};
pub use profile::{build_footer, build_header, to_slug, Footer, Header};
pub use tweet::{Entities, HashtagEntity, MediaEntity, MentionEntity, Place, Profile, Tweet, UrlEntity, User};
pub use widget::{Rendered, TweetDisplay};
