use once_cell::sync::Lazy;
use regex::Regex;

static CHANNEL_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"/channel/(.+?)\[").unwrap());
static CHANNEL_COUNTRY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.+?)\]").unwrap());

/// Display metadata embedded in a channel token like `.../channel/ESPN[US]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDescriptor {
    pub name: String,
    /// `None` when the token carries no `[...]` section at all
    pub country: Option<String>,
}

/// Never fails: tokens without the `/channel/<name>[` pattern are shown as-is.
pub fn describe(channel: &str) -> ChannelDescriptor {
    let name = CHANNEL_NAME
        .captures(channel)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| channel.to_string());
    let country = CHANNEL_COUNTRY
        .captures(channel)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    ChannelDescriptor { name, country }
}

/// First few channels of an event plus how many were left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPreview {
    pub shown: Vec<ChannelDescriptor>,
    pub remaining: usize,
}

pub fn preview<S: AsRef<str>>(channels: &[S], limit: usize) -> ChannelPreview {
    let shown: Vec<ChannelDescriptor> = channels
        .iter()
        .take(limit)
        .map(|c| describe(c.as_ref()))
        .collect();
    ChannelPreview {
        remaining: channels.len() - shown.len(),
        shown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_full_pattern() {
        let d = describe("https://x/channel/ESPN[US]extra");
        assert_eq!(d.name, "ESPN");
        assert_eq!(d.country.as_deref(), Some("US"));
    }

    #[test]
    fn test_describe_plain_url() {
        let d = describe("https://x/plain");
        assert_eq!(d.name, "https://x/plain");
        assert_eq!(d.country, None);
    }

    #[test]
    fn test_describe_country_without_channel_segment() {
        let d = describe("https://x/live/Sky[UK]");
        assert_eq!(d.name, "https://x/live/Sky[UK]");
        assert_eq!(d.country.as_deref(), Some("UK"));
    }

    #[test]
    fn test_describe_name_with_spaces_and_first_bracket() {
        let d = describe("https://topembed.pw/channel/Sky Sports Main Event[UK][HD]");
        assert_eq!(d.name, "Sky Sports Main Event");
        assert_eq!(d.country.as_deref(), Some("UK"));
    }

    #[test]
    fn test_describe_empty_brackets_are_not_a_country() {
        // `.+?` needs at least one character, so `[]` is skipped
        let d = describe("https://x/channel/Foo[]");
        assert_eq!(d.name, "Foo");
        assert_eq!(d.country, None);
    }

    #[test]
    fn test_preview() {
        let channels = vec![
            "https://x/channel/A[US]",
            "https://x/channel/B[UK]",
            "https://x/channel/C[IN]",
            "https://x/channel/D[FR]",
            "https://x/channel/E[DE]",
        ];
        let p = preview(&channels, 3);
        assert_eq!(p.shown.len(), 3);
        assert_eq!(p.shown[2].name, "C");
        assert_eq!(p.remaining, 2);

        let p = preview(&channels[..2], 3);
        assert_eq!(p.remaining, 0);
    }
}
