use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use typed_builder::TypedBuilder;

use crate::config::{FeedKind, WidgetConfig};
use crate::error::WidgetError;
use crate::tweet::{Profile, Tweet};

/// Issues a GET against the API and hands back the raw response body.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, WidgetError>;
}

#[derive(TypedBuilder)]
pub struct HttpFetcher {
    client: Client,

    #[builder(setter(into))]
    bearer_token: String,

    #[builder(setter(into), default = "TweetDisplayBack/4.0".to_owned())]
    user_agent: String,
}

impl HttpFetcher {
    /// Build a fetcher with the timeout and user agent from `config`.
    pub fn from_config(config: &WidgetConfig) -> Result<Self, WidgetError> {
        let bearer_token = config
            .bearer_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| WidgetError::Config("a bearer token is required".into()))?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| WidgetError::Transport(e.to_string()))?;

        Ok(Self::builder()
            .client(client)
            .bearer_token(bearer_token)
            .user_agent(config.http.user_agent.clone())
            .build())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<String, WidgetError> {
        tracing::debug!(url, "requesting");
        // Error statuses still carry an `errors` body, so the status is not checked here
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.bearer_token))
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| WidgetError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WidgetError::Transport(e.to_string()))?;
        tracing::debug!(url, %status, bytes = body.len(), "response received");
        Ok(body)
    }
}

/// Number of statuses to ask the timeline endpoint for. Filtering thins the
/// timeline out, so more are requested the more categories are hidden.
pub fn scan_count(config: &WidgetConfig) -> usize {
    if let Some(n) = config.scan_override {
        return n;
    }
    let multiplier = match config.filter().active_filters() {
        0 => 1,
        1 => 3,
        2 => 4,
        _ => 5,
    };
    config.count.saturating_mul(multiplier)
}

/// URL of the configured feed.
pub fn feed_url(config: &WidgetConfig) -> String {
    let base = config.http.api_base.trim_end_matches('/');
    let name = urlencoding::encode(&config.screen_name);
    match config.feed {
        FeedKind::List => {
            let slug = config.list_slug().unwrap_or_default();
            let include_rts = if config.show_retweets { "&include_rts=1" } else { "" };
            format!(
                "{}/lists/statuses.json?slug={}&owner_screen_name={}&count={}&include_entities=1{}",
                base,
                urlencoding::encode(&slug),
                name,
                config.count,
                include_rts
            )
        }
        FeedKind::Likes => format!(
            "{}/favorites/list.json?count={}&screen_name={}&include_entities=1",
            base, config.count, name
        ),
        FeedKind::User => format!(
            "{}/statuses/user_timeline.json?count={}&screen_name={}&include_entities=1",
            base,
            scan_count(config),
            name
        ),
    }
}

pub fn profile_url(config: &WidgetConfig) -> String {
    format!(
        "{}/users/show.json?screen_name={}",
        config.http.api_base.trim_end_matches('/'),
        urlencoding::encode(&config.screen_name)
    )
}

#[derive(Deserialize)]
struct ApiErrors {
    errors: Vec<ApiErrorMessage>,
}

#[derive(Deserialize)]
struct ApiErrorMessage {
    #[serde(default)]
    message: String,
}

/// Pulls the `errors[].message` list out of an error payload, if it is one.
fn api_errors(value: &Value) -> Option<Vec<String>> {
    value.get("errors")?;
    let parsed = ApiErrors::deserialize(value).ok()?;
    Some(parsed.errors.into_iter().map(|e| e.message).collect())
}

fn parse_value(raw: &str) -> Result<Value, WidgetError> {
    if raw.trim().is_empty() {
        return Err(WidgetError::Malformed("empty body".into()));
    }
    serde_json::from_str(raw).map_err(|e| WidgetError::Malformed(e.to_string()))
}

/// Decode a feed response body into statuses.
pub fn decode_timeline(raw: &str) -> Result<Vec<Tweet>, WidgetError> {
    let value = parse_value(raw)?;
    if let Some(messages) = api_errors(&value) {
        return Err(WidgetError::Api(messages));
    }
    match value {
        Value::Null => Err(WidgetError::NoData),
        Value::Array(_) => {
            Vec::<Tweet>::deserialize(value).map_err(|e| WidgetError::Malformed(e.to_string()))
        }
        other => Err(WidgetError::Malformed(format!(
            "expected an array of statuses, got {}",
            kind_of(&other)
        ))),
    }
}

/// Decode a `users/show.json` response body.
pub fn decode_profile(raw: &str) -> Result<Profile, WidgetError> {
    let value = parse_value(raw)?;
    if let Some(messages) = api_errors(&value) {
        return Err(WidgetError::Api(messages));
    }
    match value {
        Value::Object(_) => {
            Profile::deserialize(value).map_err(|e| WidgetError::Malformed(e.to_string()))
        }
        other => Err(WidgetError::Malformed(format!(
            "expected a user object, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(feed: FeedKind) -> WidgetConfig {
        WidgetConfig {
            feed,
            screen_name: "rustlang".into(),
            list: Some("Core Team".into()),
            ..Default::default()
        }
    }

    #[test]
    fn user_timeline_is_oversized_per_active_filter() {
        let mut config = config(FeedKind::User);
        // mentions and replies hidden by default
        assert_eq!(scan_count(&config), 12);

        config.show_retweets = false;
        assert_eq!(scan_count(&config), 15);

        config.show_mentions = true;
        config.show_replies = true;
        assert_eq!(scan_count(&config), 9);

        config.show_retweets = true;
        assert_eq!(scan_count(&config), 3);

        config.scan_override = Some(50);
        assert_eq!(scan_count(&config), 50);
    }

    #[test]
    fn scan_count_saturates_on_huge_counts() {
        let mut config = config(FeedKind::User);
        config.count = usize::MAX;
        assert_eq!(scan_count(&config), usize::MAX);
    }

    #[test]
    fn builds_feed_urls() {
        assert_eq!(
            feed_url(&config(FeedKind::User)),
            "https://api.twitter.com/1.1/statuses/user_timeline.json?count=12&screen_name=rustlang&include_entities=1"
        );
        assert_eq!(
            feed_url(&config(FeedKind::Likes)),
            "https://api.twitter.com/1.1/favorites/list.json?count=3&screen_name=rustlang&include_entities=1"
        );
        assert_eq!(
            feed_url(&config(FeedKind::List)),
            "https://api.twitter.com/1.1/lists/statuses.json?slug=core-team&owner_screen_name=rustlang&count=3&include_entities=1&include_rts=1"
        );
        assert_eq!(
            profile_url(&config(FeedKind::User)),
            "https://api.twitter.com/1.1/users/show.json?screen_name=rustlang"
        );
    }

    #[test]
    fn collects_every_api_error_message() {
        let raw = r#"{"errors": [{"code": 88, "message": "Rate limit exceeded"}, {"message": "Try later"}]}"#;
        match decode_timeline(raw) {
            Err(WidgetError::Api(messages)) => {
                assert_eq!(messages, vec!["Rate limit exceeded", "Try later"])
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(decode_profile(raw), Err(WidgetError::Api(_))));
    }

    #[test]
    fn rejects_unexpected_shapes() {
        assert!(matches!(decode_timeline(""), Err(WidgetError::Malformed(_))));
        assert!(matches!(decode_timeline("{}"), Err(WidgetError::Malformed(_))));
        assert!(matches!(decode_timeline("null"), Err(WidgetError::NoData)));
        assert!(matches!(decode_profile("[]"), Err(WidgetError::Malformed(_))));
        assert!(matches!(decode_timeline("[]"), Ok(v) if v.is_empty()));
    }
}
