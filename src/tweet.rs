use serde::{Deserialize, Serialize};

/// One status as delivered by the v1.1 REST API. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tweet {
    pub id_str: String,
    pub created_at: String,
    #[serde(alias = "full_text")]
    pub text: String,
    #[serde(default)]
    pub source: String,
    pub user: User,
    #[serde(default)]
    pub in_reply_to_user_id: Option<u64>,
    #[serde(default)]
    pub in_reply_to_screen_name: Option<String>,
    #[serde(default)]
    pub in_reply_to_status_id_str: Option<String>,
    #[serde(default)]
    pub place: Option<Place>,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub entities: Entities,
    #[serde(default)]
    pub retweeted_status: Option<Box<Tweet>>,
}

impl Tweet {
    pub fn is_retweet(&self) -> bool {
        self.retweeted_status.is_some()
    }

    /// The status whose author, text and entities are shown: the wrapped
    /// status for retweets, `self` otherwise.
    pub fn shown(&self) -> &Tweet {
        self.retweeted_status.as_deref().unwrap_or(self)
    }

    /// Location name, if the status was geotagged with a named place.
    pub fn place_name(&self) -> Option<&str> {
        self.place
            .as_ref()
            .and_then(|p| p.full_name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// `(screen_name, status_id)` of the status this one answers, when both are known.
    pub fn reply_target(&self) -> Option<(&str, &str)> {
        match (
            self.in_reply_to_screen_name.as_deref(),
            self.in_reply_to_status_id_str.as_deref(),
        ) {
            (Some(name), Some(id)) if !name.is_empty() && !id.is_empty() => Some((name, id)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub screen_name: String,
    #[serde(default)]
    pub profile_image_url_https: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Entities {
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
    #[serde(default)]
    pub user_mentions: Vec<MentionEntity>,
    #[serde(default)]
    pub hashtags: Vec<HashtagEntity>,
    #[serde(default)]
    pub media: Vec<MediaEntity>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UrlEntity {
    pub url: String,
    #[serde(default)]
    pub display_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaEntity {
    pub url: String,
    #[serde(default)]
    pub display_url: Option<String>,
    #[serde(default)]
    pub media_url_https: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MentionEntity {
    pub screen_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HashtagEntity {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Place {
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Account metadata from `users/show.json`, used for the widget header.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    pub screen_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub profile_image_url_https: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_retweet_with_nested_status() {
        let raw = r#"{
            "id_str": "20",
            "created_at": "Wed Oct 10 20:19:24 +0000 2018",
            "text": "RT @orig: hello",
            "source": "web",
            "user": {"screen_name": "wrapper", "profile_image_url_https": "https://a/w_normal.jpg"},
            "in_reply_to_user_id": null,
            "retweet_count": 4,
            "entities": {"urls": [], "user_mentions": [{"screen_name": "orig"}], "hashtags": []},
            "retweeted_status": {
                "id_str": "10",
                "created_at": "Wed Oct 10 19:00:00 +0000 2018",
                "full_text": "hello",
                "user": {"screen_name": "orig", "profile_image_url_https": "https://a/o_normal.jpg"},
                "retweet_count": 4
            }
        }"#;

        let tweet: Tweet = serde_json::from_str(raw).unwrap();
        assert!(tweet.is_retweet());
        assert_eq!(tweet.shown().user.screen_name, "orig");
        assert_eq!(tweet.shown().text, "hello");
        assert!(tweet.shown().entities.media.is_empty());
    }

    #[test]
    fn reply_target_requires_name_and_id() {
        let mut tweet: Tweet = serde_json::from_str(
            r#"{"id_str": "1", "created_at": "", "text": "", "user": {"screen_name": "a"},
                "in_reply_to_screen_name": "b"}"#,
        )
        .unwrap();
        assert_eq!(tweet.reply_target(), None);

        tweet.in_reply_to_status_id_str = Some("99".into());
        assert_eq!(tweet.reply_target(), Some(("b", "99")));
    }
}
