//! `*`/`?` glob matching for `CacheStore::keys_matching` (spec §4.1).
//!
//! Translates the glob into an anchored regex rather than hand-rolling a
//! matcher, the same approach the pack's tag/pattern invalidation code uses
//! for its `InvalidationEvent::Pattern` variant.

use regex::Regex;

pub fn glob_to_regex(pattern: &str) -> Regex {
    let mut out = String::with_capacity(pattern.len() + 2);
    out.push('^');
    for c in pattern.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            _ => {
                if matches!(
                    c,
                    '.' | '+' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '\\'
                ) {
                    out.push('\\');
                }
                out.push(c);
            }
        }
    }
    out.push('$');
    Regex::new(&out).expect("glob-derived pattern is always valid regex")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_matches_any_suffix() {
        let re = glob_to_regex("hot:odds:*");
        assert!(re.is_match("hot:odds:123"));
        assert!(!re.is_match("hot:match:123"));
    }

    #[test]
    fn test_question_mark_matches_single_char() {
        let re = glob_to_regex("odds:?");
        assert!(re.is_match("odds:1"));
        assert!(!re.is_match("odds:12"));
    }

    #[test]
    fn test_literal_dot_is_escaped() {
        let re = glob_to_regex("a.b*");
        assert!(re.is_match("a.bcd"));
        assert!(!re.is_match("axbcd"));
    }
}
