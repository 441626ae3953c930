//! Channel reference resolution.
//!
//! Users type whatever they have at hand: a handle such as `@SomeCreator`, a
//! bare channel id, or a full channel URL.  [`resolve_channel_identifier`]
//! turns that into the short form the backend's channel lookup expects.

use std::fmt;

use url::Url;

/// Path prefixes that are followed by a channel id, custom name, or user name.
const ID_PREFIXES: &[&str] = &["channel", "c", "user"];

/// Canonical short form of a channel: a handle, an id, or a trimmed non-URL input.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelIdentifier(String);

impl ChannelIdentifier {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identifier is a handle (`@name`).
    pub fn is_handle(&self) -> bool {
        self.0.starts_with('@')
    }

    /// Consumes the identifier, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ChannelIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolves a raw channel reference into a [`ChannelIdentifier`].
///
/// - Blank input resolves to `None`.
/// - Input that does not start with `http://` or `https://` (any case) is
///   returned trimmed but otherwise unchanged.
/// - A URL that fails to parse falls back to the trimmed input.
/// - `https://host/@handle/...` resolves to `@handle`.
/// - `https://host/{channel,c,user}/<id>/...` resolves to `<id>`.
/// - Every other URL shape resolves to `None`.
///
/// Resolution is total and idempotent: feeding a resolved identifier back in
/// returns it unchanged.
///
/// ```
/// # use channelchat::resolve_channel_identifier;
/// let id = resolve_channel_identifier("https://www.youtube.com/@NeetCode").unwrap();
/// assert_eq!(id.as_str(), "@NeetCode");
/// assert!(resolve_channel_identifier("https://www.youtube.com/watch?v=1").is_none());
/// ```
pub fn resolve_channel_identifier(raw: &str) -> Option<ChannelIdentifier> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !looks_like_http_url(trimmed) {
        return Some(ChannelIdentifier(trimmed.to_string()));
    }
    let url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(_) => return Some(ChannelIdentifier(trimmed.to_string())),
    };
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    match segments.as_slice() {
        [] => None,
        [first, ..] if first.starts_with('@') => Some(ChannelIdentifier(first.to_string())),
        [prefix, id, ..] if ID_PREFIXES.contains(prefix) => {
            Some(ChannelIdentifier(id.to_string()))
        }
        _ => None,
    }
}

fn looks_like_http_url(input: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        input
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(raw: &str) -> Option<String> {
        resolve_channel_identifier(raw).map(ChannelIdentifier::into_inner)
    }

    #[test]
    fn blank_input() {
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("   \t\n"), None);
    }

    #[test]
    fn non_urls_are_trimmed_and_kept() {
        assert_eq!(resolve("@SomeCreator"), Some("@SomeCreator".to_string()));
        assert_eq!(resolve("  UC123  "), Some("UC123".to_string()));
        assert_eq!(resolve("some creator"), Some("some creator".to_string()));
        assert_eq!(
            resolve("www.youtube.com/@handle"),
            Some("www.youtube.com/@handle".to_string())
        );
    }

    #[test]
    fn handle_urls() {
        assert_eq!(resolve("https://x.com/@handle"), Some("@handle".to_string()));
        assert_eq!(
            resolve("https://www.youtube.com/@NeetCode/videos"),
            Some("@NeetCode".to_string())
        );
        assert_eq!(
            resolve("HTTPS://www.youtube.com/@Loud"),
            Some("@Loud".to_string())
        );
    }

    #[test]
    fn prefixed_urls() {
        assert_eq!(
            resolve("https://x.com/channel/UC123"),
            Some("UC123".to_string())
        );
        assert_eq!(resolve("http://x.com/c/custom"), Some("custom".to_string()));
        assert_eq!(
            resolve("https://x.com/user/legacy/"),
            Some("legacy".to_string())
        );
        assert_eq!(
            resolve("https://x.com//channel//UC9?feature=share"),
            Some("UC9".to_string())
        );
    }

    #[test]
    fn unrecognized_urls() {
        assert_eq!(resolve("https://x.com/"), None);
        assert_eq!(resolve("https://x.com"), None);
        assert_eq!(resolve("https://x.com/watch?v=1"), None);
        assert_eq!(resolve("https://x.com/channel"), None);
        assert_eq!(resolve("https://x.com/playlist/abc"), None);
    }

    #[test]
    fn unparseable_url_falls_back_to_input() {
        assert_eq!(resolve("https://"), Some("https://".to_string()));
        assert_eq!(resolve(" http://[::1 "), Some("http://[::1".to_string()));
    }

    #[test]
    fn idempotent() {
        for raw in [
            "@SomeCreator",
            " UC123 ",
            "https://x.com/@handle",
            "https://x.com/channel/UC123",
            "https://x.com/c/custom/featured",
        ] {
            let once = resolve_channel_identifier(raw).unwrap();
            let twice = resolve_channel_identifier(once.as_str()).unwrap();
            assert_eq!(once, twice, "input {raw:?}");
        }
    }

    #[test]
    fn identifier_accessors() {
        let id = resolve_channel_identifier("https://x.com/@handle").unwrap();
        assert!(id.is_handle());
        assert_eq!(id.to_string(), "@handle");
        let id = resolve_channel_identifier("UC123").unwrap();
        assert!(!id.is_handle());
    }
}
