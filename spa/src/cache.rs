//! `ETag` generation and conditional-request handling.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hash the content into a quoted `ETag`, e.g. `"9f86d08a"`.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Whether the client's `If-None-Match` matches the current `ETag`.
///
/// Handles comma-separated lists and the `*` wildcard.
pub fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client| {
        client
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etag_is_stable_per_content() {
        assert_eq!(generate_etag(b"same"), generate_etag(b"same"));
        assert_ne!(generate_etag(b"a"), generate_etag(b"b"));
        assert!(generate_etag(b"x").starts_with('"'));
    }

    #[test]
    fn if_none_match_variants() {
        let etag = generate_etag(b"body");

        assert!(etag_matches(Some(&etag), &etag));
        assert!(etag_matches(Some(&format!("\"other\", {etag}")), &etag));
        assert!(etag_matches(Some("*"), &etag));
        assert!(!etag_matches(Some("\"other\""), &etag));
        assert!(!etag_matches(None, &etag));
    }
}
