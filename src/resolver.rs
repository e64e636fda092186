//! Maps a decoded slug back to the event it was generated from.
//!
//! Slugs only carry a timestamp and normalized sport/match text, so concurrent
//! events starting at the same instant are told apart with a symmetric
//! substring-overlap score:
//!
//! * forward: every slug token longer than two characters found inside the
//!   event text (`"{match} {tournament} {sport}"`, lowercase) adds its length;
//! * backward: every whitespace term of the event text longer than two
//!   characters found inside the slug text adds its length.
//!
//! The highest score wins, ties and all-zero scores go to the first candidate
//! in store order. A resolution only fails when no event has the timestamp.

use crate::errors::ResolveError;
use crate::models::Event;
use crate::slug;
use crate::store::EventStore;
use tracing::debug;

const MIN_TERM_LEN: usize = 3;

fn join_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<&str>>()
        .join("-")
}

fn score_against<S: AsRef<str>>(event: &Event, tokens: &[S], slug_text: &str) -> usize {
    let event_text =
        format!("{} {} {}", event.matchup, event.tournament, event.sport).to_lowercase();

    let forward: usize = tokens
        .iter()
        .map(|t| t.as_ref())
        .filter(|t: &&str| t.chars().count() >= MIN_TERM_LEN && event_text.contains(*t))
        .map(|t| t.chars().count())
        .sum();

    let backward: usize = event_text
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TERM_LEN && slug_text.contains(*t))
        .map(|t| t.chars().count())
        .sum();

    forward + backward
}

/// Pick the event at `timestamp` that best matches `tokens`.
pub fn resolve<'a, S: AsRef<str>>(
    store: &'a EventStore,
    timestamp: i64,
    tokens: &[S],
) -> Result<&'a Event, ResolveError> {
    let candidates = store.events_with_timestamp(timestamp);

    let first = match candidates.as_slice() {
        [] => return Err(ResolveError::NoMatch { timestamp }),
        [only] => return Ok(*only),
        [first, ..] => *first,
    };

    let slug_text = join_tokens(tokens);

    let mut best = first;
    let mut best_score = 0;
    for &candidate in &candidates {
        let s = score_against(candidate, tokens, &slug_text);
        debug!(timestamp, matchup = %candidate.matchup, score = s, "scored candidate");
        // strict comparison keeps the earliest candidate on ties
        if s > best_score {
            best_score = s;
            best = candidate;
        }
    }

    debug!(
        timestamp,
        candidates = candidates.len(),
        best_score,
        matchup = %best.matchup,
        "resolved slug"
    );
    Ok(best)
}

/// Decode `slug` and resolve it against `store`.
pub fn resolve_slug<'a>(store: &'a EventStore, slug: &str) -> Result<&'a Event, ResolveError> {
    let decoded = slug::decode(slug)?;
    resolve(store, decoded.timestamp, &decoded.tokens)
}
