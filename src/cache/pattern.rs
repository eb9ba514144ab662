//! Glob Pattern Module
//!
//! Shell-style key matching where `*` matches any run of characters
//! (including none). Every other character matches itself.

/// Returns true if `key` matches `pattern`.
///
/// Runs in O(pattern * key) worst case using the usual backtrack-to-last-star
/// scan over the decoded chars of both strings.
pub fn glob_match(pattern: &str, key: &str) -> bool {
    if pattern == "*" {
        return true;
    }

    let pat: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = key.chars().collect();

    let (mut p, mut t) = (0usize, 0usize);
    // Position of the last `*` seen and the text index it was tried against
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pat.len() && pat[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if p < pat.len() && pat[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((star_p, star_t)) = star {
            // Let the last star swallow one more character
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }

    pat[p..].iter().all(|c| *c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_pattern() {
        assert!(glob_match("prop_*", "prop_123"));
        assert!(glob_match("prop_*", "prop_"));
        assert!(!glob_match("prop_*", "mls_prop_1"));
    }

    #[test]
    fn test_suffix_and_infix_patterns() {
        assert!(glob_match("*:austin", "search:austin"));
        assert!(glob_match("search:*:tx", "search:austin:tx"));
        assert!(!glob_match("search:*:tx", "search:austin:ca"));
        assert!(glob_match("a*b*c", "aXXbYYc"));
        assert!(!glob_match("a*b*c", "aXXcYYb"));
    }

    #[test]
    fn test_literal_pattern() {
        assert!(glob_match("exact", "exact"));
        assert!(!glob_match("exact", "exactly"));
        assert!(!glob_match("", "x"));
        assert!(glob_match("", ""));
    }

    #[test]
    fn test_star_only_and_repeated_stars() {
        assert!(glob_match("*", ""));
        assert!(glob_match("**", "anything"));
        assert!(glob_match("a**", "a"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(glob_match("price.min*", "price.min=100"));
        assert!(!glob_match("price.min*", "priceXmin=100"));
        assert!(glob_match("{\"a\":1}*", "{\"a\":1}:x"));
    }
}
