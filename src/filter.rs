//! Date / sport / free-text filtering for event listings.

use crate::models::Event;
use crate::store::EventStore;
use std::fmt;
use tracing::debug;

pub const ALL_SPORTS: &str = "All";

/// Sport selection. `All` disables the sport filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SportFilter {
    #[default]
    All,
    Named(String),
}

impl SportFilter {
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value == ALL_SPORTS {
            SportFilter::All
        } else {
            SportFilter::Named(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SportFilter::All => ALL_SPORTS,
            SportFilter::Named(name) => name,
        }
    }

    /// Sport names are canonical tokens here, so matching is exact and case-sensitive.
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            SportFilter::All => true,
            SportFilter::Named(name) => event.sport == *name,
        }
    }
}

impl fmt::Display for SportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub date: String,
    pub sport: SportFilter,
    pub search_term: String,
}

impl FilterCriteria {
    /// Every sport, no search, on `date`
    pub fn for_date(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            sport: SportFilter::All,
            search_term: String::new(),
        }
    }

    pub fn with_sport(mut self, sport: SportFilter) -> Self {
        self.sport = sport;
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    /// Location path for these criteria: `/events/<date>[/<sport>[/<search>]]`.
    ///
    /// A search without a sport keeps the `All` segment so the path stays positional.
    pub fn to_path(&self) -> String {
        let mut path = format!("/events/{}", urlencoding::encode(&self.date));
        match (&self.sport, self.search_term.is_empty()) {
            (SportFilter::All, true) => {}
            (sport, true) => {
                path.push('/');
                path.push_str(&urlencoding::encode(sport.as_str()));
            }
            (sport, false) => {
                path.push('/');
                path.push_str(&urlencoding::encode(sport.as_str()));
                path.push('/');
                path.push_str(&urlencoding::encode(&self.search_term));
            }
        }
        path
    }

    /// Parse a location path. `/` maps to `default_date` with no filters.
    pub fn from_path(path: &str, default_date: &str) -> Option<Self> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let decode = |s: &str| urlencoding::decode(s).ok().map(|c| c.into_owned());

        match segments.as_slice() {
            [] => Some(Self::for_date(default_date)),
            ["events", rest @ ..] if rest.len() <= 3 => {
                let date = match rest.first() {
                    Some(d) => decode(*d)?,
                    None => default_date.to_string(),
                };
                let sport = match rest.get(1) {
                    Some(s) => SportFilter::parse(&decode(*s)?),
                    None => SportFilter::All,
                };
                let search_term = match rest.get(2) {
                    Some(q) => decode(*q)?,
                    None => String::new(),
                };
                Some(Self {
                    date,
                    sport,
                    search_term,
                })
            }
            _ => None,
        }
    }

    fn matches_search(&self, event: &Event) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        event.matchup.to_lowercase().contains(&needle)
            || event.tournament.to_lowercase().contains(&needle)
            || event.sport.to_lowercase().contains(&needle)
    }
}

/// Events on `criteria.date` passing the sport and search filters, ordered by
/// start time. Events starting together keep their feed order.
pub fn apply<'a>(store: &'a EventStore, criteria: &FilterCriteria) -> Vec<&'a Event> {
    let day = store.events_on(&criteria.date);
    let mut events: Vec<&Event> = day
        .iter()
        .filter(|e| criteria.sport.matches(e))
        .filter(|e| criteria.matches_search(e))
        .collect();
    events.sort_by_key(|e| e.timestamp);

    debug!(
        date = %criteria.date,
        sport = %criteria.sport,
        search = %criteria.search_term,
        total = day.len(),
        kept = events.len(),
        "filtered events"
    );
    events
}

/// Sport picker entries: `All` followed by every sport in the store.
pub fn sport_options(store: &EventStore) -> Vec<String> {
    std::iter::once(ALL_SPORTS)
        .chain(store.sports_sorted())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> EventStore {
        EventStore::from_days(vec![
            (
                "2025-05-01",
                vec![
                    Event::new(300, "Cricket", "IPL", "Mumbai Indians vs Delhi Capitals", vec![]),
                    Event::new(100, "Soccer", "EPL", "Arsenal vs Chelsea", vec![]),
                    Event::new(200, "Cricket", "County", "Surrey vs Kent", vec![]),
                    Event::new(100, "Basketball", "NBA", "Lakers vs Celtics", vec![]),
                ],
            ),
            (
                "2025-05-02",
                vec![Event::new(400, "Cricket", "IPL", "Kings vs Royals", vec![])],
            ),
        ])
    }

    #[test]
    fn test_all_sorted_and_stable() {
        let store = store();
        let got = apply(&store, &FilterCriteria::for_date("2025-05-01"));
        let names: Vec<&str> = got.iter().map(|e| e.matchup.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Arsenal vs Chelsea",
                "Lakers vs Celtics",
                "Surrey vs Kent",
                "Mumbai Indians vs Delhi Capitals"
            ]
        );
    }

    #[test]
    fn test_sport_filter_is_case_sensitive() {
        let store = store();
        let crit = FilterCriteria::for_date("2025-05-01")
            .with_sport(SportFilter::Named("Cricket".into()));
        assert_eq!(apply(&store, &crit).len(), 2);

        let crit = FilterCriteria::for_date("2025-05-01")
            .with_sport(SportFilter::Named("cricket".into()));
        assert!(apply(&store, &crit).is_empty());
    }

    #[test]
    fn test_search_matches_any_field_case_insensitively() {
        let store = store();
        let by_tournament = FilterCriteria::for_date("2025-05-01").with_search("ipl");
        let got = apply(&store, &by_tournament);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].tournament, "IPL");

        let by_sport = FilterCriteria::for_date("2025-05-01").with_search("BASKET");
        assert_eq!(apply(&store, &by_sport).len(), 1);

        let by_match = FilterCriteria::for_date("2025-05-01").with_search("kent");
        assert_eq!(apply(&store, &by_match)[0].matchup, "Surrey vs Kent");
    }

    #[test]
    fn test_missing_date_is_empty() {
        assert!(apply(&store(), &FilterCriteria::for_date("2030-01-01")).is_empty());
    }

    #[test]
    fn test_sport_options() {
        assert_eq!(
            sport_options(&store()),
            vec!["All", "Basketball", "Cricket", "Soccer"]
        );
    }

    #[test]
    fn test_to_path() {
        let base = FilterCriteria::for_date("2025-05-01");
        assert_eq!(base.to_path(), "/events/2025-05-01");
        assert_eq!(
            base.clone().with_sport(SportFilter::Named("Cricket".into())).to_path(),
            "/events/2025-05-01/Cricket"
        );
        assert_eq!(
            base.clone().with_search("ipl").to_path(),
            "/events/2025-05-01/All/ipl"
        );
        assert_eq!(
            base.with_sport(SportFilter::Named("Ice Hockey".into()))
                .with_search("nhl cup")
                .to_path(),
            "/events/2025-05-01/Ice%20Hockey/nhl%20cup"
        );
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            FilterCriteria::from_path("/", "2025-05-01"),
            Some(FilterCriteria::for_date("2025-05-01"))
        );
        let crit = FilterCriteria::from_path("/events/2025-05-02/Ice%20Hockey/nhl", "x").unwrap();
        assert_eq!(crit.date, "2025-05-02");
        assert_eq!(crit.sport, SportFilter::Named("Ice Hockey".into()));
        assert_eq!(crit.search_term, "nhl");

        let crit = FilterCriteria::from_path("/events/2025-05-02/All/ipl", "x").unwrap();
        assert_eq!(crit.sport, SportFilter::All);

        assert!(FilterCriteria::from_path("/event/some-slug-1", "x").is_none());
        assert!(FilterCriteria::from_path("/events/a/b/c/d", "x").is_none());
    }

    #[test]
    fn test_path_round_trip() {
        let crit = FilterCriteria::for_date("2025-05-01")
            .with_sport(SportFilter::Named("Motor Sport".into()))
            .with_search("grand prix/sprint");
        assert_eq!(FilterCriteria::from_path(&crit.to_path(), "x"), Some(crit));
    }
}
