//! # Video-identifier extraction
//!
//! Interview records may store a full watch URL, a short link, an embed URL,
//! or an already-bare identifier. An ordered list of matchers is applied and
//! the first structural match wins; the patterns do not overlap in practice.

use once_cell::sync::Lazy;
use regex::Regex;

static MATCHERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Full watch URL: https://www.youtube.com/watch?v=<id>
        Regex::new(r"[?&]v=([A-Za-z0-9_-]{11})").unwrap(),
        // Short link: https://youtu.be/<id>
        Regex::new(r"youtu\.be/([A-Za-z0-9_-]{11})").unwrap(),
        // Embed URL: https://www.youtube.com/embed/<id>
        Regex::new(r"/embed/([A-Za-z0-9_-]{11})").unwrap(),
        // Already a bare identifier
        Regex::new(r"^([A-Za-z0-9_-]{11})$").unwrap(),
    ]
});

/// Extracts the embed identifier from an arbitrary external-video reference.
/// Returns `None` when nothing matches; callers fall back to the document's
/// own store-assigned identifier (degraded, not fatal).
pub fn extract_video_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    MATCHERS.iter().find_map(|matcher| {
        matcher
            .captures(trimmed)
            .and_then(|captures| captures.get(1))
            .map(|id| id.as_str().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "xsP7EURF1-c";

    #[test]
    fn all_supported_forms_agree() {
        let forms = [
            format!("https://www.youtube.com/watch?v={ID}"),
            format!("https://www.youtube.com/watch?t=42&v={ID}"),
            format!("https://youtu.be/{ID}"),
            format!("https://www.youtube.com/embed/{ID}"),
            ID.to_string(),
        ];
        for form in &forms {
            assert_eq!(extract_video_id(form).as_deref(), Some(ID), "form: {form}");
        }
    }

    #[test]
    fn garbage_yields_none() {
        assert_eq!(extract_video_id("https://example.com/clip"), None);
        assert_eq!(extract_video_id("not-a-video"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(extract_video_id(&format!("  {ID}\n")).as_deref(), Some(ID));
    }
}
