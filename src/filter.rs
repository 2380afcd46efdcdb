use crate::config::{FeedKind, FilterConfig};
use crate::tweet::Tweet;

/// How a status relates to other accounts, as far as visibility rules care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_retweet: bool,
    pub is_reply: bool,
    /// Any `@mention` entity at all, including the one being replied to.
    pub has_mentions: bool,
    pub is_mention: bool,
}

impl Classification {
    pub fn of(tweet: &Tweet) -> Self {
        let mentions = &tweet.entities.user_mentions;
        let is_reply = tweet.in_reply_to_user_id.is_some();
        let has_mentions = !mentions.is_empty();
        // The reply target sits in slot 0; anything in slot 1 is an extra mention
        let is_reply_only = is_reply && mentions.get(1).is_none();

        Self {
            is_retweet: tweet.is_retweet(),
            is_reply,
            has_mentions,
            is_mention: has_mentions && !is_reply_only,
        }
    }
}

fn is_visible(class: Classification, config: &FilterConfig) -> bool {
    let retweet_shown = class.is_retweet && config.show_retweets;

    if !config.show_retweets && !class.is_retweet {
        return true;
    }
    if !config.show_mentions && !config.show_replies {
        return !class.has_mentions || retweet_shown;
    }
    if !config.show_mentions && (!class.is_mention || retweet_shown) {
        return true;
    }
    if !config.show_replies && !class.is_reply {
        return true;
    }
    config.shows_everything()
}

/// Select up to `config.count` statuses, in timeline order.
pub fn select<'a>(tweets: &'a [Tweet], config: &FilterConfig) -> Vec<&'a Tweet> {
    let unfiltered = config.shows_everything() || config.feed != FeedKind::User;

    tweets
        .iter()
        .filter(|tweet| unfiltered || is_visible(Classification::of(tweet), config))
        .take(config.count)
        .collect()
}
