use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::{FeedKind, WidgetConfig};
use crate::html;
use crate::linkify;
use crate::tweet::Profile;

/// Account details shown above the feed. Disabled parts are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Header {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Footer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_me: Option<String>,
}

/// Convert a list name as typed by a person into the slug used in list URLs.
pub fn to_slug(list: &str) -> String {
    static UNWANTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z'A-Z0-9/_|+ -]").unwrap());
    static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[/_|+ -']+").unwrap());

    let clean = UNWANTED.replace_all(list, "");
    let clean = clean.trim_matches('-').to_lowercase();
    SEPARATORS.replace_all(&clean, "-").into_owned()
}

pub fn build_header(profile: &Profile, config: &WidgetConfig) -> Header {
    let header = &config.header;
    let screen_name = config.screen_name.as_str();

    let user = header.user.then(|| {
        let shown = if header.real_name && !profile.name.is_empty() {
            profile.name.as_str()
        } else {
            screen_name
        };
        let mut user = html::link(
            &linkify::user_url(screen_name, config.bypass_intent),
            shown,
            &[("rel", "nofollow")],
        );
        user.push_str(&config.tweet.user_separator);
        if let (FeedKind::List, Some(slug), Some(list)) =
            (config.feed, config.list_slug(), config.list.as_deref())
        {
            user.push_str(&html::link(
                &format!("https://twitter.com/{}/{}", screen_name, slug),
                &format!("List: {}", list),
                &[("rel", "nofollow")],
            ));
        }
        user
    });

    let web = profile
        .url
        .as_deref()
        .filter(|url| header.web && !url.is_empty())
        .map(|url| html::link(url, url, &[("rel", "nofollow"), ("target", "_blank")]));

    // `_normal` avatars are 48px; `_bigger` is the 73px variant
    let avatar = profile
        .profile_image_url_https
        .replace("normal.jpg", "bigger.jpg");

    Header {
        user,
        bio: profile.description.clone().filter(|_| header.bio),
        location: profile.location.clone().filter(|_| header.location),
        web,
        avatar: (!avatar.is_empty()).then(|| html::image(&avatar, screen_name, &[])),
    }
}

/// Follow button for user and likes feeds.
pub fn build_footer(config: &WidgetConfig, module_id: u64) -> Footer {
    if !config.footer.follow_link || config.feed == FeedKind::List {
        return Footer::default();
    }

    let lang: String = config.language.chars().take(2).collect();
    let query = [
        ("screen_name", config.screen_name.clone()),
        ("lang", lang),
        ("show_screen_name", config.footer.follow_user.to_string()),
        ("show_count", config.footer.follow_count.to_string()),
    ]
    .iter()
    .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
    .collect::<Vec<_>>()
    .join("&");

    let iframe = html::iframe(
        &format!("https://platform.twitter.com/widgets/follow_button.html?{}", query),
        &format!("follow-user-{}", module_id),
        &[
            ("allowtransparency", "true"),
            ("frameborder", "0"),
            ("scrolling", "no"),
            ("style", "width: 300px; height: 20px;"),
        ],
    );

    Footer {
        follow_me: Some(format!(
            "<div class=\"TDB-footer-follow-link\">{}</div>",
            iframe
        )),
    }
}
