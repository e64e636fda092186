use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A single broadcast event.
///
/// `channels` keeps the provider's opaque channel tokens; use
/// [`crate::channel::describe`] to get display names out of them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Event {
    #[serde(rename = "unix_timestamp", deserialize_with = "deserialize_timestamp")]
    pub timestamp: i64,
    pub sport: String,
    #[serde(default)]
    pub tournament: String,
    #[serde(rename = "match")]
    pub matchup: String,
    #[serde(default)]
    pub channels: Vec<String>,
}

impl Event {
    pub fn new(
        timestamp: i64,
        sport: impl Into<String>,
        tournament: impl Into<String>,
        matchup: impl Into<String>,
        channels: Vec<String>,
    ) -> Self {
        Self {
            timestamp,
            sport: sport.into(),
            tournament: tournament.into(),
            matchup: matchup.into(),
            channels,
        }
    }

    /// Start instant in UTC, `None` if the timestamp is out of chrono's range
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.timestamp, 0).single()
    }

    pub fn slug(&self) -> crate::slug::Slug {
        crate::slug::encode(self)
    }

    /// Channels other than `current`, in feed order
    pub fn other_channels<'a>(&'a self, current: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.channels
            .iter()
            .map(String::as_str)
            .filter(move |c| *c != current)
    }
}

// Providers are inconsistent about numeric types; accept ints, integral
// floats and digit strings. Negative values are rejected: slugs cannot carry a sign.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct TimestampVisitor;

    impl<'de> Visitor<'de> for TimestampVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative unix timestamp as integer or numeric string")
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom(format!("negative timestamp {}", v)));
            }
            Ok(v)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            i64::try_from(v).map_err(|_| E::custom("timestamp out of range"))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.fract() == 0.0 && v >= 0.0 && v <= i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::custom("timestamp is not a non-negative whole number"))
            }
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let ts = v
                .trim()
                .parse::<i64>()
                .map_err(|_| E::custom(format!("invalid timestamp string {:?}", v)))?;
            self.visit_i64(ts)
        }
    }

    deserializer.deserialize_any(TimestampVisitor)
}
