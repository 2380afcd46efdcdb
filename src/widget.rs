use serde::Serialize;
use time::OffsetDateTime;
use typed_builder::TypedBuilder;

use crate::cache::{Cache, CacheKey, CacheKind};
use crate::config::WidgetConfig;
use crate::error::{ErrorSet, WidgetError};
use crate::fetch::{self, Fetcher};
use crate::filter;
use crate::format::{format_tweet, DisplayRecord, RenderContext};
use crate::profile::{build_footer, build_header, Footer, Header};
use crate::tweet::{Profile, Tweet};

/// Outcome of one render. When `error` is set everything else is empty and
/// the messages are shown instead of the feed.
#[derive(Debug, Default, Serialize)]
pub struct Rendered {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
    pub footer: Footer,
    pub tweets: Vec<DisplayRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSet>,
}

impl Rendered {
    fn failed(err: WidgetError) -> Self {
        tracing::warn!(error = %err, "render aborted");
        Self {
            error: Some(err.into()),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// One widget instance. `module_id` namespaces its cache entries.
#[derive(TypedBuilder)]
pub struct TweetDisplay<'a> {
    fetcher: &'a dyn Fetcher,

    cache: &'a dyn Cache,

    config: &'a WidgetConfig,

    #[builder(default)]
    module_id: u64,
}

impl<'a> TweetDisplay<'a> {
    pub async fn render(&self) -> Rendered {
        self.render_at(OffsetDateTime::now_utc()).await
    }

    /// Render with a fixed clock for relative timestamps.
    pub async fn render_at(&self, now: OffsetDateTime) -> Rendered {
        let ctx = RenderContext {
            config: self.config,
            now,
        };
        match self.compile(&ctx).await {
            Ok(rendered) => rendered,
            Err(e) => Rendered::failed(e),
        }
    }

    async fn compile(&self, ctx: &RenderContext<'_>) -> Result<Rendered, WidgetError> {
        self.config.validate()?;

        let header = if self.config.header.display {
            let profile = self.load_profile().await?;
            Some(build_header(&profile, self.config))
        } else {
            None
        };
        let footer = build_footer(self.config, self.module_id);

        let timeline = self.load_timeline().await?;
        let selected = filter::select(&timeline, &self.config.filter());
        tracing::debug!(
            fetched = timeline.len(),
            shown = selected.len(),
            module_id = self.module_id,
            "timeline filtered"
        );
        let tweets = selected
            .into_iter()
            .map(|tweet| format_tweet(tweet, ctx))
            .collect();

        Ok(Rendered {
            header,
            footer,
            tweets,
            error: None,
        })
    }

    pub async fn load_profile(&self) -> Result<Profile, WidgetError> {
        self.cached_or_fetch(
            CacheKind::User,
            &fetch::profile_url(self.config),
            fetch::decode_profile,
        )
        .await
    }

    pub async fn load_timeline(&self) -> Result<Vec<Tweet>, WidgetError> {
        self.cached_or_fetch(
            CacheKind::Tweet,
            &fetch::feed_url(self.config),
            fetch::decode_timeline,
        )
        .await
    }

    /// Serve `kind` from the cache when possible, otherwise fetch it and store
    /// the raw body once it decodes cleanly.
    async fn cached_or_fetch<T>(
        &self,
        kind: CacheKind,
        url: &str,
        decode: fn(&str) -> Result<T, WidgetError>,
    ) -> Result<T, WidgetError> {
        let key = CacheKey::new(self.module_id, kind);
        let caching = self.config.cache.enabled;

        if caching {
            match self.cache.get(&key) {
                Ok(Some(raw)) => {
                    tracing::debug!(%key, "cache hit");
                    return decode(&raw);
                }
                Ok(None) => tracing::debug!(%key, "cache miss"),
                Err(e) => tracing::warn!(%key, error = %e, "cache read failed"),
            }
        }

        let raw = self.fetcher.get(url).await?;
        let value = decode(&raw)?;

        if caching {
            if let Err(e) = self.cache.put(&key, &raw, self.config.cache.ttl()) {
                tracing::warn!(%key, error = %e, "cache write failed");
            }
        }
        Ok(value)
    }
}
