//! Turns the entities attached to a status into links inside its text.
//!
//! Substitution is substring based, not offset based. A mention or hashtag
//! whose text also appears inside an earlier link label gets linked there
//! too; well-formed API payloads do not produce that overlap.

use std::collections::HashSet;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use regex::{NoExpand, Regex};

use crate::html;
use crate::tweet::{HashtagEntity, MediaEntity, MentionEntity, UrlEntity};

const NEW_TAB: [(&str, &str); 2] = [("target", "_blank"), ("rel", "nofollow")];

/// Profile page of `screen_name`, or the follow intent for it.
pub fn user_url(screen_name: &str, bypass_intent: bool) -> String {
    if bypass_intent {
        format!("https://twitter.com/{}", screen_name)
    } else {
        format!("https://twitter.com/intent/user?screen_name={}", screen_name)
    }
}

fn replace_ignore_case(text: &str, needle: &str, replacement: &str) -> String {
    let pattern = format!("(?i){}", regex::escape(needle));
    match Regex::new(&pattern) {
        Ok(re) => re.replace_all(text, NoExpand(replacement)).into_owned(),
        Err(_) => text.to_owned(),
    }
}

/// Entity lists repeat a token once per occurrence; each token only needs one pass.
fn unique_ci<'a>(tokens: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    tokens
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .collect()
}

/// Short URLs repeat once per occurrence too; relinking one would nest anchors.
fn unique_by_url<'a, T>(entities: &'a [T], url: impl Fn(&T) -> &str) -> Vec<&'a T> {
    let mut seen = HashSet::new();
    entities
        .iter()
        .filter(|e| !url(*e).is_empty() && seen.insert(url(*e).to_owned()))
        .collect()
}

pub fn link_urls(text: &str, urls: &[UrlEntity]) -> String {
    let mut text = text.to_owned();
    for url in unique_by_url(urls, |u| &u.url) {
        let label = url.display_url.as_deref().unwrap_or(&url.url);
        let href = if url.url.starts_with("http") {
            url.url.clone()
        } else {
            format!("http://{}", url.url)
        };
        text = text.replace(&url.url, &html::link(&href, label, &NEW_TAB));
    }
    text
}

pub fn link_media(text: &str, media: &[MediaEntity]) -> String {
    let mut text = text.to_owned();
    for item in unique_by_url(media, |m| &m.url) {
        let label = item.display_url.as_deref().unwrap_or(&item.url);
        let href = item.media_url_https.as_deref().unwrap_or(&item.url);
        text = text.replace(&item.url, &html::link(href, label, &NEW_TAB));
    }
    text
}

pub fn link_mentions(text: &str, mentions: &[MentionEntity], bypass_intent: bool) -> String {
    let mut text = text.to_owned();
    for name in unique_ci(mentions.iter().map(|m| m.screen_name.as_str())) {
        let token = format!("@{}", name);
        let anchor = html::link(
            &user_url(name, bypass_intent),
            &token,
            &[("class", "userlink"), ("rel", "nofollow")],
        );
        text = replace_ignore_case(&text, &token, &anchor);
    }
    text
}

pub fn link_hashtags(text: &str, hashtags: &[HashtagEntity]) -> String {
    let mut text = text.to_owned();
    for tag in unique_ci(hashtags.iter().map(|h| h.text.as_str())) {
        let token = format!("#{}", tag);
        let href = format!(
            "https://twitter.com/search?q=%23{}",
            utf8_percent_encode(tag, NON_ALPHANUMERIC)
        );
        let anchor = html::link(
            &href,
            &token,
            &[("class", "hashlink"), ("rel", "nofollow"), ("target", "_blank")],
        );
        text = replace_ignore_case(&text, &token, &anchor);
    }
    text
}
