//! Segment joining for URL-derived filenames.

/// Splits `url` on `/`, drops the first two segments (scheme and the empty
/// segment of `//`), and joins the rest with `-`.
///
/// Returns `None` if the URL has fewer than two segments.
pub fn joined_segments(url: &str) -> Option<String> {
    let segments: Vec<&str> = url.split('/').collect();
    if segments.len() < 2 {
        return None;
    }
    Some(segments[2..].join("-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        assert_eq!(
            joined_segments("https://example.com/a/b/feed.xml").as_deref(),
            Some("example.com-a-b-feed.xml")
        );
        assert_eq!(
            joined_segments("http://127.0.0.1:8080/rss").as_deref(),
            Some("127.0.0.1:8080-rss")
        );
    }

    #[test]
    fn host_only() {
        assert_eq!(joined_segments("https://example.com").as_deref(), Some("example.com"));
    }

    #[test]
    fn too_few_segments() {
        assert_eq!(joined_segments("nouri"), None);
        assert_eq!(joined_segments(""), None);
    }
}
