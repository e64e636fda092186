use thiserror::Error;

/// Errors raised while retrieving or loading the event feed
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeedError {
    /// The payload does not have the `{ events: { date: [event] } }` shape
    #[error("Malformed feed: {0}")]
    MalformedFeed(String),

    /// Transport level failure talking to the feed host
    #[error("Feed request failed: {0}")]
    Request(String),

    /// Feed host did not answer in time
    #[error("Feed request timed out after {0}s")]
    Timeout(u64),

    /// Feed host answered with a non-success status
    #[error("Feed returned HTTP {status}")]
    Http { status: u16 },
}

impl FeedError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        FeedError::MalformedFeed(detail.into())
    }

    /// Short message suitable for an "unable to load" screen
    pub fn user_message(&self) -> &'static str {
        match self {
            FeedError::MalformedFeed(_) => "Unable to load events: the feed returned unexpected data.",
            FeedError::Request(_) | FeedError::Http { .. } => {
                "Failed to load events data. Please try again later."
            }
            FeedError::Timeout(_) => "The events feed is not responding. Please try again later.",
        }
    }

    /// Multi-line diagnostic text with the underlying detail
    pub fn diagnostics(&self) -> String {
        match self {
            FeedError::MalformedFeed(detail) => {
                format!("Malformed Feed\nError: {}\nSuggestion: The provider changed its format or returned an error page", detail)
            }
            FeedError::Request(detail) => {
                format!("Request Failed\nError: {}\nSuggestion: Check the feed URL and your connection", detail)
            }
            FeedError::Timeout(secs) => {
                format!("Request Timeout\nTimeout: {} seconds\nSuggestion: Feed host is slow or offline", secs)
            }
            FeedError::Http { status } => {
                format!("Server Error\nStatus: {}\nSuggestion: Try again later", status)
            }
        }
    }
}

/// Errors raised when a slug cannot be decoded
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlugError {
    #[error("Invalid event URL format: {0:?}")]
    InvalidSlugFormat(String),

    #[error("Invalid timestamp in URL: {0:?}")]
    InvalidTimestamp(String),
}

impl SlugError {
    pub fn user_message(&self) -> &'static str {
        match self {
            SlugError::InvalidSlugFormat(_) => "Invalid event link.",
            SlugError::InvalidTimestamp(_) => "Invalid event link: the timestamp is not valid.",
        }
    }
}

/// Errors raised when a slug cannot be resolved to an event
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No events found with timestamp {timestamp}")]
    NoMatch { timestamp: i64 },

    #[error(transparent)]
    Slug(#[from] SlugError),
}

impl ResolveError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ResolveError::NoMatch { .. } => "Event not found.",
            ResolveError::Slug(err) => err.user_message(),
        }
    }
}
