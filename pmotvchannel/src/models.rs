//! Data models for the channel API
//!
//! Wire types mirror the JSON returned by `GET {api}/channel/{tenant}/streams`;
//! [`ChannelConfig`] and [`PlaybackSource`] are the resolved, read-only values
//! handed to the rest of the application.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Wire Models
// ============================================================================

/// Envelope returned by the streams endpoint
///
/// `data` is absent when the tenant is unknown or the backend failed.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StreamsResponse {
    #[serde(default)]
    pub data: Option<StreamsData>,
}

/// Payload of a successful streams response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamsData {
    pub channel: ChannelInfo,
    /// Live stream manifest location
    #[serde(default)]
    pub url: Option<String>,
    /// Background image, also used as the player poster
    #[serde(default)]
    pub background: Option<String>,
}

/// Channel identity as returned by the API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChannelInfo {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_social_links")]
    pub social_links: BTreeMap<String, String>,
}

/// Accepts a map, `null`, or the empty array some backends emit for an empty map.
/// Only non-blank string values are kept.
fn deserialize_social_links<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawLinks {
        Map(BTreeMap<String, serde_json::Value>),
        List(Vec<serde_json::Value>),
    }

    Ok(match Option::<RawLinks>::deserialize(deserializer)? {
        Some(RawLinks::Map(map)) => map
            .into_iter()
            .filter_map(|(network, link)| match link {
                serde_json::Value::String(l) if !l.trim().is_empty() => Some((network, l)),
                _ => None,
            })
            .collect(),
        Some(RawLinks::List(_)) | None => BTreeMap::new(),
    })
}

// ============================================================================
// Resolved Models
// ============================================================================

/// Resolved channel metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub name: String,
    pub social_links: BTreeMap<String, String>,
    pub background_image_url: Option<String>,
}

impl ChannelConfig {
    /// Channel shown when the API could not be reached
    pub fn fallback(default_name: impl Into<String>) -> Self {
        Self {
            name: default_name.into(),
            social_links: BTreeMap::new(),
            background_image_url: None,
        }
    }

    /// CSS declaration used to paint the background behind the player
    pub fn background_style(&self) -> Option<String> {
        self.background_image_url.as_ref().map(|url| {
            format!(
                "background-image: url('{}'); background-size: cover; background-position: center;",
                url
            )
        })
    }
}

/// Where to play from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSource {
    pub stream_url: String,
    pub poster_image_url: Option<String>,
}

impl PlaybackSource {
    pub fn new(stream_url: impl Into<String>) -> Self {
        Self {
            stream_url: stream_url.into(),
            poster_image_url: None,
        }
    }

    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster_image_url = Some(poster.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_payload() {
        let response: StreamsResponse = serde_json::from_value(json!({
            "data": {
                "channel": {
                    "name": "Acme TV",
                    "social_links": {"facebook": "https://fb/acme", "x": null}
                },
                "url": "https://cdn/stream.m3u8",
                "background": "https://cdn/bg.jpg"
            }
        }))
        .unwrap();

        let data = response.data.unwrap();
        assert_eq!(data.channel.name, "Acme TV");
        assert_eq!(data.channel.social_links.len(), 1);
        assert_eq!(data.channel.social_links["facebook"], "https://fb/acme");
        assert_eq!(data.url.as_deref(), Some("https://cdn/stream.m3u8"));
        assert_eq!(data.background.as_deref(), Some("https://cdn/bg.jpg"));
    }

    #[test]
    fn test_social_links_variants() {
        for links in [json!(null), json!([]), json!({})] {
            let info: ChannelInfo =
                serde_json::from_value(json!({"name": "n", "social_links": links})).unwrap();
            assert!(info.social_links.is_empty());
        }

        let info: ChannelInfo = serde_json::from_value(json!({"name": "n"})).unwrap();
        assert!(info.social_links.is_empty());
    }

    #[test]
    fn test_social_links_skip_non_string_values() {
        let info: ChannelInfo = serde_json::from_value(json!({
            "name": "Acme TV",
            "social_links": {
                "youtube": "https://yt/acme",
                "followers": 12,
                "verified": true,
                "extra": {"url": "https://x"},
                "blank": "  "
            }
        }))
        .unwrap();

        assert_eq!(info.social_links.len(), 1);
        assert_eq!(info.social_links["youtube"], "https://yt/acme");
    }

    #[test]
    fn test_missing_data_envelope() {
        let response: StreamsResponse =
            serde_json::from_value(json!({"message": "tenant not found"})).unwrap();
        assert!(response.data.is_none());
    }

    #[test]
    fn test_background_style() {
        let mut channel = ChannelConfig::fallback("Channel");
        assert_eq!(channel.background_style(), None);

        channel.background_image_url = Some("https://cdn/bg.jpg".into());
        assert_eq!(
            channel.background_style().unwrap(),
            "background-image: url('https://cdn/bg.jpg'); background-size: cover; background-position: center;"
        );
    }
}
