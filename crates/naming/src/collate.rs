use caseless::Caseless;
use unicode_normalization::UnicodeNormalization;

/// Map input characters into their collated form, which ignores casing and
/// is unicode-normalized. Used for case-insensitive uniqueness checks (e.g.
/// entity field-name collisions) so that two names differing only by case or
/// normalization form are treated as the same identifier.
pub fn collate<I>(i: I) -> impl Iterator<Item = char>
where
    I: Iterator<Item = char>,
{
    i.nfd().default_case_fold().nfkc()
}

/// Collate a whole string into an owned, comparable key.
pub fn collate_key(s: &str) -> String {
    collate(s.chars()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collate_key_ignores_case() {
        assert_eq!(collate_key("UserID"), collate_key("userid"));
        assert_eq!(collate_key("api_key"), collate_key("API_KEY"));
    }

    #[test]
    fn collate_key_distinguishes_different_names() {
        assert_ne!(collate_key("UserID"), collate_key("UserName"));
    }
}
