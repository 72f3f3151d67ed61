/// Random, collision-resistant string for names and other free-text fields
pub fn random_string() -> String {
    format!("random-string-{}", uuid::Uuid::new_v4())
}

/// Random resource key.
///
/// Keys only allow `[a-zA-Z0-9_-]`, which a hyphenated UUID satisfies.
pub fn random_key() -> String {
    format!("random-key-{}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_values_are_unique() {
        assert_ne!(random_string(), random_string());
        assert_ne!(random_key(), random_key());
    }

    #[test]
    fn test_random_key_charset() {
        let key = random_key();
        assert!(key.starts_with("random-key-"));
        assert!(
            key.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }
}
