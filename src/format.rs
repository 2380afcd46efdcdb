use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::config::{TimeDisplay, WidgetConfig};
use crate::html;
use crate::linkify;
use crate::tweet::Tweet;

const NEW_TAB: [(&str, &str); 2] = [("target", "_blank"), ("rel", "nofollow")];

/// `Wed Oct 10 20:19:24 +0000 2018`
static API_TIME_FORMAT: &[FormatItem<'_>] = format_description!(
    "[weekday repr:short] [month repr:short] [day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute] [year]"
);
/// `Wednesday, 10 October 2018`
static DATE_FORMAT: &[FormatItem<'_>] =
    format_description!("[weekday], [day] [month repr:long] [year]");

/// Everything one render needs besides the statuses themselves. Holding the
/// clock here keeps formatting a pure function of its inputs.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub config: &'a WidgetConfig,
    pub now: OffsetDateTime,
}

/// A status ready for display. Disabled parts are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub avatar: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<String>,
}

pub fn parse_api_time(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, API_TIME_FORMAT).ok()
}

pub fn absolute_date(at: OffsetDateTime) -> String {
    at.format(DATE_FORMAT).unwrap_or_default()
}

fn plural(n: i64, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {}", one)
    } else {
        format!("{} {}", n, many)
    }
}

/// Human "time ago" text. Anything older than about four weeks gets the date.
pub fn relative_time(at: OffsetDateTime, now: OffsetDateTime) -> String {
    let seconds = (now - at).whole_seconds().max(0) as f64;

    let minutes = (seconds / 60.0).round();
    if minutes == 0.0 {
        return "Less than a minute ago".into();
    }
    if minutes < 60.0 {
        return format!("{} ago", plural(minutes as i64, "minute", "minutes"));
    }
    let hours = (minutes / 60.0).round();
    if hours < 24.0 {
        return format!("{} ago", plural(hours as i64, "hour", "hours"));
    }
    let days = (hours / 24.0).round();
    if days < 7.0 {
        return format!("{} ago", plural(days as i64, "day", "days"));
    }
    let weeks = (days / 7.0).round();
    if weeks <= 4.0 {
        return format!("{} ago", plural(weeks as i64, "week", "weeks"));
    }
    absolute_date(at)
}

fn display_time(tweet: &Tweet, ctx: &RenderContext<'_>) -> String {
    let Some(at) = parse_api_time(&tweet.created_at) else {
        tracing::debug!(id = %tweet.id_str, created_at = %tweet.created_at, "unparseable timestamp");
        return tweet.created_at.clone();
    };
    match ctx.config.tweet.time_display {
        TimeDisplay::Relative => relative_time(at, ctx.now),
        TimeDisplay::Absolute => absolute_date(at),
    }
}

/// Byline link for `screen_name` followed by the configured separator.
pub fn byline(screen_name: &str, config: &WidgetConfig) -> String {
    let mut user = html::link(
        &linkify::user_url(screen_name, config.bypass_intent),
        screen_name,
        &[("rel", "nofollow")],
    );
    user.push_str(&config.tweet.user_separator);
    user
}

/// Time, source, location, reply target and retweet count. Always taken from
/// the outer status except the count, which belongs to the shown one.
fn metadata(tweet: &Tweet, ctx: &RenderContext<'_>) -> Option<String> {
    let cfg = &ctx.config.tweet;
    let mut line = String::new();
    let mut leading = false;

    if tweet.is_retweet() {
        line.push_str("Retweeted ");
    }

    if cfg.created {
        line.push_str(&html::link(
            &format!(
                "https://twitter.com/{}/status/{}",
                tweet.user.screen_name, tweet.id_str
            ),
            &display_time(tweet, ctx),
            &NEW_TAB,
        ));
        leading = true;
    }

    if cfg.source && !tweet.source.is_empty() {
        line.push_str(&format!(" via {}", tweet.source));
        leading = true;
    }

    if let Some(place) = tweet.place_name().filter(|_| cfg.location) {
        let map = format!(
            "https://maps.google.com/maps?q={}",
            utf8_percent_encode(place, NON_ALPHANUMERIC)
        );
        line.push_str(&format!(" from {}", html::link(&map, place, &NEW_TAB)));
        leading = true;
    }

    if let Some((name, status)) = tweet.reply_target().filter(|_| cfg.reply_link) {
        let target = format!("https://twitter.com/{}/status/{}", name, status);
        line.push_str(&format!(
            " in reply to {}",
            html::link(&target, name, &[("rel", "nofollow")])
        ));
        leading = true;
    }

    let retweets = tweet.shown().retweet_count;
    if cfg.retweet_count && retweets >= 1 {
        if leading {
            line.push_str(" &bull; ");
        }
        line.push_str(&plural(retweets as i64, "retweet", "retweets"));
    }

    let line = line.trim();
    (!line.is_empty()).then(|| line.to_owned())
}

fn actions(tweet: &Tweet) -> String {
    let id = &tweet.id_str;
    [
        (
            "reply",
            "Reply",
            format!("https://twitter.com/intent/tweet?in_reply_to={}", id),
        ),
        (
            "retweet",
            "Retweet",
            format!("https://twitter.com/intent/retweet?tweet_id={}", id),
        ),
        (
            "like",
            "Like",
            format!("https://twitter.com/intent/like?tweet_id={}", id),
        ),
    ]
    .into_iter()
    .map(|(class, title, href)| {
        format!(
            "<span class=\"TDB-action TDB-{}\">{}</span>",
            class,
            html::link(&href, "", &[("title", title), ("rel", "nofollow")])
        )
    })
    .collect()
}

/// Render one status.
pub fn format_tweet(tweet: &Tweet, ctx: &RenderContext<'_>) -> DisplayRecord {
    let config = ctx.config;
    let shown = tweet.shown();
    let author = shown.user.screen_name.as_str();

    let mut text = linkify::link_urls(&shown.text, &shown.entities.urls);
    text = linkify::link_media(&text, &shown.entities.media);
    if config.tweet.links {
        text = linkify::link_mentions(&text, &shown.entities.user_mentions, config.bypass_intent);
        text = linkify::link_hashtags(&text, &shown.entities.hashtags);
    }

    DisplayRecord {
        user: config.tweet.name.then(|| byline(author, config)),
        avatar: html::image(&shown.user.profile_image_url_https, author, &[("width", "32")]),
        text,
        created: metadata(tweet, ctx),
        actions: config.tweet.actions.then(|| actions(tweet)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn tweet(json: serde_json::Value) -> Tweet {
        serde_json::from_value(json).unwrap()
    }

    fn plain() -> Tweet {
        tweet(serde_json::json!({
            "id_str": "1050118621198921728",
            "created_at": "Wed Oct 10 20:19:24 +0000 2018",
            "text": "hello #rust from @Ferris",
            "source": "web",
            "user": {"screen_name": "rustlang", "profile_image_url_https": "https://pbs/r_normal.jpg"},
            "retweet_count": 0,
            "entities": {
                "hashtags": [{"text": "rust"}],
                "user_mentions": [{"screen_name": "ferris"}]
            }
        }))
    }

    fn ctx(config: &WidgetConfig) -> RenderContext<'_> {
        RenderContext {
            config,
            now: datetime!(2018-10-10 20:49:24 UTC),
        }
    }

    #[test]
    fn parses_api_timestamps() {
        assert_eq!(
            parse_api_time("Wed Oct 10 20:19:24 +0000 2018"),
            Some(datetime!(2018-10-10 20:19:24 UTC))
        );
        assert_eq!(parse_api_time("yesterday"), None);
    }

    #[test]
    fn relative_time_buckets() {
        let now = datetime!(2018-10-31 12:00:00 UTC);
        let ago = |secs: i64| relative_time(now - time::Duration::seconds(secs), now);
        assert_eq!(ago(10), "Less than a minute ago");
        assert_eq!(ago(60), "1 minute ago");
        assert_eq!(ago(45 * 60), "45 minutes ago");
        assert_eq!(ago(3 * 3600), "3 hours ago");
        assert_eq!(ago(2 * 86400), "2 days ago");
        assert_eq!(ago(14 * 86400), "2 weeks ago");
        assert_eq!(ago(60 * 86400), "Saturday, 01 September 2018");
        assert_eq!(ago(-300), "Less than a minute ago");
    }

    #[test]
    fn full_record_for_plain_status() {
        let config = WidgetConfig::default();
        let record = format_tweet(&plain(), &ctx(&config));

        assert_eq!(
            record.user.as_deref(),
            Some(r#"<a href="https://twitter.com/intent/user?screen_name=rustlang" rel="nofollow">rustlang</a> "#)
        );
        assert_eq!(
            record.avatar,
            r#"<img src="https://pbs/r_normal.jpg" alt="rustlang" width="32" />"#
        );
        assert!(record.text.contains(r#">#rust</a>"#));
        assert!(record.text.contains(r#" class="userlink" rel="nofollow">@ferris</a>"#));
        assert_eq!(
            record.created.as_deref(),
            Some(r#"<a href="https://twitter.com/rustlang/status/1050118621198921728" target="_blank" rel="nofollow">30 minutes ago</a> via web"#)
        );
        let actions = record.actions.unwrap();
        assert!(actions.contains("intent/tweet?in_reply_to=1050118621198921728"));
        assert!(actions.contains("intent/retweet?tweet_id=1050118621198921728"));
        assert!(actions.contains("intent/like?tweet_id=1050118621198921728"));
        assert!(actions.contains(r#"title="Like""#));
    }

    #[test]
    fn disabled_fields_are_omitted() {
        let mut config = WidgetConfig::default();
        config.tweet.name = false;
        config.tweet.actions = false;
        config.tweet.created = false;
        config.tweet.source = false;
        config.tweet.links = false;
        let record = format_tweet(&plain(), &ctx(&config));

        assert_eq!(record.user, None);
        assert_eq!(record.actions, None);
        assert_eq!(record.created, None);
        assert_eq!(record.text, "hello #rust from @Ferris");

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("user").is_none());
        assert!(json.get("actions").is_none());
    }

    #[test]
    fn bullet_only_between_leading_segment_and_count() {
        let mut status = plain();
        status.retweet_count = 3;
        let mut config = WidgetConfig::default();
        let line = format_tweet(&status, &ctx(&config)).created.unwrap();
        assert!(line.ends_with(" via web &bull; 3 retweets"));

        config.tweet.created = false;
        config.tweet.source = false;
        let line = format_tweet(&status, &ctx(&config)).created.unwrap();
        assert_eq!(line, "3 retweets");

        config.tweet.retweet_count = false;
        config.tweet.source = true;
        let line = format_tweet(&status, &ctx(&config)).created.unwrap();
        assert_eq!(line, "via web");
    }

    #[test]
    fn reply_and_location_segments() {
        let mut status = plain();
        status.in_reply_to_screen_name = Some("ferris".into());
        status.in_reply_to_status_id_str = Some("42".into());
        status.place = Some(crate::tweet::Place {
            full_name: Some("Berlin, Germany".into()),
        });
        let mut config = WidgetConfig::default();
        config.tweet.created = false;
        config.tweet.source = false;

        let line = format_tweet(&status, &ctx(&config)).created.unwrap();
        assert_eq!(
            line,
            concat!(
                r#"from <a href="https://maps.google.com/maps?q=Berlin%2C%20Germany" target="_blank" rel="nofollow">Berlin, Germany</a>"#,
                r#" in reply to <a href="https://twitter.com/ferris/status/42" rel="nofollow">ferris</a>"#
            )
        );

        config.tweet.location = false;
        config.tweet.reply_link = false;
        status.retweeted_status = Some(Box::new(plain()));
        assert_eq!(
            format_tweet(&status, &ctx(&config)).created.as_deref(),
            Some("Retweeted")
        );
    }

    #[test]
    fn formatting_is_idempotent() {
        let config = WidgetConfig::default();
        let status = plain();
        assert_eq!(
            format_tweet(&status, &ctx(&config)),
            format_tweet(&status, &ctx(&config))
        );
    }
}
