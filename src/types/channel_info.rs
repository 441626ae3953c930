use serde::{Deserialize, Deserializer, Serialize};

/// Metadata about a channel as reported by the backend.
///
/// Every field is optional; the backend may know nothing beyond a title, and
/// the session itself fabricates a title-only value when lookup fails.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Channel id (typically `UC...`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Channel description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Thumbnail/avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    /// Subscriber count, kept as the backend's decimal string.
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub subscriber_count: Option<String>,

    /// Video count, kept as the backend's decimal string.
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub video_count: Option<String>,
}

impl ChannelInfo {
    /// Creates a new empty ChannelInfo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ChannelInfo that only carries a title.
    pub fn with_title<S: Into<String>>(title: S) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// Search results report counts as JSON numbers; channel lookups as strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    Ok(match Option::<Count>::deserialize(deserializer)? {
        None => None,
        Some(Count::Text(s)) => Some(s),
        Some(Count::Unsigned(n)) => Some(n.to_string()),
        Some(Count::Signed(n)) => Some(n.to_string()),
        Some(Count::Float(n)) => Some(n.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_deserialization() {
        let json = serde_json::json!({
            "id": "UC123",
            "title": "Some Creator",
            "description": "Videos about things",
            "thumbnail": "https://img.example/a.jpg",
            "subscriber_count": "12345",
            "video_count": "67"
        });
        let info: ChannelInfo = serde_json::from_value(json).unwrap();
        assert_eq!(info.id.as_deref(), Some("UC123"));
        assert_eq!(info.title.as_deref(), Some("Some Creator"));
        assert_eq!(info.subscriber_count.as_deref(), Some("12345"));
        assert_eq!(info.video_count.as_deref(), Some("67"));
    }

    #[test]
    fn numeric_counts_become_strings() {
        let json = serde_json::json!({"title": "x", "subscriber_count": 1200, "video_count": 0});
        let info: ChannelInfo = serde_json::from_value(json).unwrap();
        assert_eq!(info.subscriber_count.as_deref(), Some("1200"));
        assert_eq!(info.video_count.as_deref(), Some("0"));
    }

    #[test]
    fn missing_and_null_fields() {
        let info: ChannelInfo =
            serde_json::from_value(serde_json::json!({"subscriber_count": null})).unwrap();
        assert!(info.is_empty());
    }

    #[test]
    fn title_only_serialization() {
        let info = ChannelInfo::with_title("@SomeCreator");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json, serde_json::json!({"title": "@SomeCreator"}));
        assert!(!info.is_empty());
    }
}
