//! Content-derived document identity.

use sha2::{Digest, Sha256};

/// Hash the parts, in order and without separator, into a lowercase hex sha256 digest.
pub fn identity_hash<S: AsRef<str>>(parts: &[S]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            identity_hash(&["hello", " world"]),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
        assert_eq!(
            identity_hash::<&str>(&[]),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_concatenation_without_separator() {
        assert_eq!(
            identity_hash(&["group", "78229"]),
            identity_hash(&["group78229"])
        );
        assert_ne!(
            identity_hash(&["group", "78229"]),
            identity_hash(&["78229", "group"])
        );
    }

    #[test]
    fn test_deterministic() {
        let first = identity_hash(&["yawoen group".to_string(), "30078".to_string()]);
        let second = identity_hash(&["yawoen group", "30078"]);

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
