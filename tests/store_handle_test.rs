use grandstand_lib::feed::{FeedState, StoreHandle};
use grandstand_lib::filter::apply;
use grandstand_lib::{EventStore, FeedError, FilterCriteria};

fn feed_with(matchup: &str) -> EventStore {
    let body = format!(
        r#"{{ "events": {{ "2025-05-01": [ {{ "unix_timestamp": 1746090000, "sport": "Soccer", "tournament": "EPL", "match": "{}", "channels": [] }} ] }} }}"#,
        matchup
    );
    EventStore::from_json_str(&body).unwrap()
}

#[tokio::test]
async fn test_readers_keep_snapshot_across_refresh() {
    let handle = StoreHandle::new();
    handle.apply_fetch(Ok(feed_with("Arsenal vs Chelsea"))).unwrap();

    let reader = {
        let handle = handle.clone();
        tokio::spawn(async move {
            let snapshot = handle.snapshot().unwrap();
            tokio::task::yield_now().await;
            let events = apply(&snapshot, &FilterCriteria::for_date("2025-05-01"));
            events[0].matchup.clone()
        })
    };

    handle.apply_fetch(Ok(feed_with("Liverpool vs Everton"))).unwrap();
    let seen = reader.await.unwrap();
    assert!(seen == "Arsenal vs Chelsea" || seen == "Liverpool vs Everton");

    let current = handle.snapshot().unwrap();
    assert_eq!(current.events_on("2025-05-01")[0].matchup, "Liverpool vs Everton");
}

#[tokio::test]
async fn test_concurrent_readers_share_one_store() {
    let handle = StoreHandle::new();
    handle.apply_fetch(Ok(feed_with("Arsenal vs Chelsea"))).unwrap();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            let store = handle.snapshot().unwrap();
            apply(&store, &FilterCriteria::for_date("2025-05-01")).len()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), 1);
    }
}

#[test]
fn test_malformed_refresh_replaces_store_with_error() {
    let handle = StoreHandle::new();
    handle.apply_fetch(Ok(feed_with("Arsenal vs Chelsea"))).unwrap();

    let result = handle.apply_fetch(EventStore::from_json_str(r#"{ "events": [] }"#));
    assert!(matches!(result, Err(FeedError::MalformedFeed(_))));
    assert!(handle.snapshot().is_none());
    match handle.state() {
        FeedState::Failed(err) => {
            assert!(err.user_message().starts_with("Unable to load events"))
        }
        other => panic!("unexpected state {:?}", other),
    }
}
