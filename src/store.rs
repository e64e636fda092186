//! Read-only index over one fetch of the event feed.

use crate::errors::FeedError;
use crate::models::Event;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// Events grouped by calendar date (`YYYY-MM-DD`).
///
/// Built once per feed fetch and never mutated afterwards. Store order is
/// feed order: date buckets as the feed lists them, then events within a date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventStore {
    days: Vec<(String, Vec<Event>)>,
}

impl EventStore {
    /// Build a store from a parsed feed payload.
    pub fn build(raw: &Value) -> Result<Self, FeedError> {
        let root = raw
            .as_object()
            .ok_or_else(|| FeedError::malformed("top-level value is not an object"))?;
        let events = root
            .get("events")
            .ok_or_else(|| FeedError::malformed("missing `events` mapping"))?;
        let events = events
            .as_object()
            .ok_or_else(|| FeedError::malformed("`events` is not an object"))?;

        let mut days = Vec::with_capacity(events.len());
        for (date, list) in events {
            let list = list
                .as_array()
                .ok_or_else(|| FeedError::malformed(format!("events for {} are not a list", date)))?;

            let mut parsed = Vec::with_capacity(list.len());
            for (idx, entry) in list.iter().enumerate() {
                let event = Event::deserialize(entry).map_err(|e| {
                    FeedError::malformed(format!("event {} on {}: {}", idx, date, e))
                })?;
                parsed.push(event);
            }
            days.push((date.clone(), parsed));
        }

        Ok(Self { days })
    }

    pub fn from_json_str(body: &str) -> Result<Self, FeedError> {
        let raw: Value =
            serde_json::from_str(body).map_err(|e| FeedError::malformed(e.to_string()))?;
        Self::build(&raw)
    }

    /// Build from already-typed data. Later entries for a repeated date are appended.
    pub fn from_days<I, D>(days: I) -> Self
    where
        I: IntoIterator<Item = (D, Vec<Event>)>,
        D: Into<String>,
    {
        let mut store = Self::default();
        for (date, events) in days {
            let date = date.into();
            match store.days.iter_mut().find(|(d, _)| *d == date) {
                Some((_, bucket)) => bucket.extend(events),
                None => store.days.push((date, events)),
            }
        }
        store
    }

    pub fn dates_sorted(&self) -> Vec<&str> {
        let mut dates: Vec<&str> = self.days.iter().map(|(d, _)| d.as_str()).collect();
        dates.sort_unstable();
        dates
    }

    pub fn sports_sorted(&self) -> Vec<&str> {
        let sports: BTreeSet<&str> = self
            .days
            .iter()
            .flat_map(|(_, events)| events)
            .map(|e| e.sport.as_str())
            .collect();
        sports.into_iter().collect()
    }

    pub fn events_on(&self, date: &str) -> &[Event] {
        self.days
            .iter()
            .find(|(d, _)| d == date)
            .map(|(_, events)| events.as_slice())
            .unwrap_or(&[])
    }

    /// Every event starting at `timestamp`, regardless of which date bucket holds it.
    pub fn events_with_timestamp(&self, timestamp: i64) -> Vec<&Event> {
        self.days
            .iter()
            .flat_map(|(_, events)| events)
            .filter(|e| e.timestamp == timestamp)
            .collect()
    }

    /// `(date, event)` pairs in store order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Event)> {
        self.days
            .iter()
            .flat_map(|(date, events)| events.iter().map(move |e| (date.as_str(), e)))
    }

    pub fn len(&self) -> usize {
        self.days.iter().map(|(_, events)| events.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
