//! Feed retrieval and the live store handle.
//!
//! The core never does I/O; this module fetches the feed, builds a fresh
//! [`EventStore`] and swaps it into a [`StoreHandle`] that readers share.

use crate::config::AppConfig;
use crate::errors::FeedError;
use crate::store::EventStore;
use reqwest::Client;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct FeedClient {
    url: String,
    timeout_secs: u64,
    client: Client,
}

impl FeedClient {
    pub fn new(url: impl Into<String>, user_agent: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            url: url.into(),
            timeout_secs,
            client,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.feed_url.clone(),
            &config.user_agent,
            config.request_timeout_secs,
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the feed and build a store from it. No retries.
    pub async fn fetch(&self) -> Result<EventStore, FeedError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Http {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| self.map_request_error(e))?;
        EventStore::from_json_str(&body)
    }

    fn map_request_error(&self, err: reqwest::Error) -> FeedError {
        if err.is_timeout() {
            FeedError::Timeout(self.timeout_secs)
        } else {
            FeedError::Request(err.to_string())
        }
    }
}

/// What readers currently see
#[derive(Debug, Clone)]
pub enum FeedState {
    Loading,
    Ready(Arc<EventStore>),
    Failed(FeedError),
}

/// Shared, swap-on-refresh reference to the current store.
///
/// Readers take an `Arc` snapshot and keep using it even if a refresh lands
/// meanwhile; stores are never mutated in place.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    state: Arc<RwLock<FeedState>>,
}

impl Default for StoreHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreHandle {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(FeedState::Loading)),
        }
    }

    pub fn state(&self) -> FeedState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Current store, or the error/loading state that replaced it
    pub fn snapshot(&self) -> Option<Arc<EventStore>> {
        match self.state() {
            FeedState::Ready(store) => Some(store),
            FeedState::Loading | FeedState::Failed(_) => None,
        }
    }

    /// Swap in the outcome of a fetch. A failure supersedes any previous store.
    pub fn apply_fetch(
        &self,
        result: Result<EventStore, FeedError>,
    ) -> Result<Arc<EventStore>, FeedError> {
        let (next, outcome) = match result {
            Ok(store) => {
                info!(
                    dates = store.dates_sorted().len(),
                    events = store.len(),
                    "event store refreshed"
                );
                let store = Arc::new(store);
                (FeedState::Ready(store.clone()), Ok(store))
            }
            Err(err) => {
                warn!(error = %err, "event feed refresh failed");
                (FeedState::Failed(err.clone()), Err(err))
            }
        };

        *self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = next;
        outcome
    }

    pub async fn refresh(&self, client: &FeedClient) -> Result<Arc<EventStore>, FeedError> {
        info!(url = client.url(), "fetching event feed");
        let result = client.fetch().await;
        self.apply_fetch(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;

    fn one_event_store(ts: i64) -> EventStore {
        EventStore::from_days(vec![(
            "2025-05-01",
            vec![Event::new(ts, "Soccer", "EPL", "Arsenal vs Chelsea", vec![])],
        )])
    }

    #[test]
    fn test_new_handle_is_loading() {
        let handle = StoreHandle::new();
        assert!(matches!(handle.state(), FeedState::Loading));
        assert!(handle.snapshot().is_none());
    }

    #[test]
    fn test_apply_fetch_swaps_store() {
        let handle = StoreHandle::new();
        handle.apply_fetch(Ok(one_event_store(1))).unwrap();
        let first = handle.snapshot().unwrap();

        handle.apply_fetch(Ok(one_event_store(2))).unwrap();
        let second = handle.snapshot().unwrap();

        // old snapshot is untouched by the swap
        assert_eq!(first.events_with_timestamp(1).len(), 1);
        assert_eq!(second.events_with_timestamp(2).len(), 1);
        assert!(second.events_with_timestamp(1).is_empty());
    }

    #[test]
    fn test_failure_supersedes_store() {
        let handle = StoreHandle::new();
        handle.apply_fetch(Ok(one_event_store(1))).unwrap();
        let err = handle
            .apply_fetch(Err(FeedError::Http { status: 502 }))
            .unwrap_err();
        assert_eq!(err, FeedError::Http { status: 502 });
        assert!(handle.snapshot().is_none());
        assert!(matches!(handle.state(), FeedState::Failed(FeedError::Http { status: 502 })));
    }

    #[test]
    fn test_client_from_config() {
        let config = AppConfig::default();
        let client = FeedClient::from_config(&config);
        assert_eq!(client.url(), crate::config::DEFAULT_FEED_URL);
    }
}
