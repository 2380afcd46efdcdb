use serde::Serialize;
use thiserror::Error;

/// Shown whenever the upstream could not be reached or returned nothing usable.
pub const UNABLE_TO_LOAD: &str = "Unable to load the Twitter feed, please try again later.";

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("unable to send request: {0}")]
    Transport(String),
    #[error("twitter reported {} error(s)", .0.len())]
    Api(Vec<String>),
    #[error("unexpected response shape: {0}")]
    Malformed(String),
    #[error("no data returned")]
    NoData,
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("cache failure: {0}")]
    Cache(#[from] std::io::Error),
}

/// The renderable form of a failed render: zero or more messages to show
/// in place of the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorSet {
    pub messages: Vec<String>,
}

impl ErrorSet {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }
}

impl From<WidgetError> for ErrorSet {
    fn from(err: WidgetError) -> Self {
        match err {
            WidgetError::Api(messages) => Self { messages },
            // Degraded fallback: the caller shows an empty error block
            WidgetError::Malformed(_) => Self::default(),
            WidgetError::Transport(_) | WidgetError::NoData | WidgetError::Cache(_) => {
                Self::message(UNABLE_TO_LOAD)
            }
            WidgetError::Config(reason) => Self::message(reason),
        }
    }
}
