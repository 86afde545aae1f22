// tests/matcher_properties.rs

use proptest::prelude::*;

use testbench::exec::ReadyMatcher;

proptest! {
    #[test]
    fn literal_matches_wherever_the_needle_appears(
        prefix in "[ -~]{0,40}",
        needle in "[ -~]{1,20}",
        suffix in "[ -~]{0,40}",
    ) {
        let line = format!("{prefix}{needle}{suffix}");
        prop_assert!(ReadyMatcher::literal(needle.clone()).is_match(&line));
    }

    #[test]
    fn escaped_regex_agrees_with_literal(
        needle in "[ -~]{1,20}",
        line in "[ -~]{0,60}",
    ) {
        let literal = ReadyMatcher::literal(needle.clone());
        let pattern = ReadyMatcher::regex(&regex::escape(&needle)).unwrap();
        prop_assert_eq!(literal.is_match(&line), pattern.is_match(&line));
    }
}
