//! Field normalization for header names and values.

/// Header names that are stored under a different key.
const KEY_RENAMES: &[(&str, &str)] = &[("addresszip", "zip")];

/// Canonical key for a raw header token: trimmed, lower-cased, renamed.
pub fn normalize_key(raw: &str) -> String {
    let key = raw.trim().to_lowercase();
    KEY_RENAMES
        .iter()
        .find(|(from, _)| *from == key)
        .map(|(_, to)| to.to_string())
        .unwrap_or(key)
}

/// Canonical value of a field: surrounding whitespace removed.
pub fn normalize_value(raw: &str) -> &str {
    raw.trim()
}

/// Canonical website value. Empty means absent.
pub fn normalize_website(raw: &str) -> Option<String> {
    let value = normalize_value(raw);
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Name"), "name");
        assert_eq!(normalize_key(" addressZip "), "zip");
        assert_eq!(normalize_key("ADDRESSZIP"), "zip");
        assert_eq!(normalize_key("Website"), "website");
        assert_eq!(normalize_key("zip"), "zip");
    }

    #[test]
    fn test_normalize_website() {
        assert_eq!(normalize_website("   "), None);
        assert_eq!(normalize_website(""), None);
        assert_eq!(
            normalize_website(" http://group.com "),
            Some("http://group.com".to_string())
        );
    }
}
