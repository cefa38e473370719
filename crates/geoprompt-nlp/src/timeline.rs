// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::intent::Location;
use regex::Regex;
use std::sync::OnceLock;

/// Parses a free-form time context into a signed year (negative is BCE).
///
/// Accepts bare years with an optional era ("1066", "100 BCE", "50 AD"),
/// ordinal centuries ("3rd century", "1st century BC") which map to the
/// century midpoint, and decades ("1960s"). Anything else yields 0, which
/// sorts unparsable entries alongside year zero.
pub fn parse_year(context: &str) -> i32 {
    let text = context.trim().to_lowercase();
    if text.is_empty() {
        return 0;
    }

    static CENTURY_RE: OnceLock<Regex> = OnceLock::new();
    let century_re = CENTURY_RE.get_or_init(|| {
        Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)?\s+century\b(?:\s+(bce|bc|ce|ad)\b)?").unwrap()
    });
    if let Some(caps) = century_re.captures(&text) {
        let n: i32 = caps[1].parse().unwrap_or(0);
        if n == 0 {
            return 0;
        }
        let midpoint = (n - 1) * 100 + 50;
        return match caps.get(2).map(|m| m.as_str()) {
            Some("bce") | Some("bc") => -midpoint,
            _ => midpoint,
        };
    }

    static YEAR_RE: OnceLock<Regex> = OnceLock::new();
    let year_re = YEAR_RE.get_or_init(|| {
        Regex::new(r"\b(\d{1,4})(s)?\b(?:\s*(bce|b\.c\.e\.|bc|b\.c\.|ce|c\.e\.|ad|a\.d\.))?").unwrap()
    });
    if let Some(caps) = year_re.captures(&text) {
        let year: i32 = caps[1].parse().unwrap_or(0);
        return match caps.get(3).map(|m| m.as_str().replace('.', "")) {
            Some(era) if era == "bce" || era == "bc" => -year,
            _ => year,
        };
    }

    0
}

/// Stable ascending sort by parsed year; equal years keep input order.
pub fn sort_chronologically(locations: &mut [Location]) {
    locations.sort_by_key(|l| parse_year(&l.time_context));
}

/// Finds a year or century mention in free text, returned as written.
pub fn find_time_mention(text: &str) -> Option<String> {
    static MENTION_RE: OnceLock<Regex> = OnceLock::new();
    let mention_re = MENTION_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:\d{1,2}(?:st|nd|rd|th)\s+century(?:\s+(?:bce|bc|ce|ad))?|\d{1,4}\s*(?:bce|bc|ce|ad)|(?:ad|ce)\s+\d{1,4}|1\d{3}s?|20\d{2}s?)\b",
        )
        .unwrap()
    });
    mention_re.find(text).map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_and_era_years() {
        assert_eq!(parse_year("1066"), 1066);
        assert_eq!(parse_year("100 BCE"), -100);
        assert_eq!(parse_year("44 BC"), -44);
        assert_eq!(parse_year("50 CE"), 50);
        assert_eq!(parse_year("79 A.D."), 79);
        assert_eq!(parse_year("AD 79"), 79);
        assert_eq!(parse_year("1960s"), 1960);
    }

    #[test]
    fn test_centuries_map_to_midpoint() {
        assert_eq!(parse_year("3rd century"), 250);
        assert_eq!(parse_year("1st century BCE"), -50);
        assert_eq!(parse_year("15th century"), 1450);
    }

    #[test]
    fn test_unparsable_is_zero() {
        assert_eq!(parse_year(""), 0);
        assert_eq!(parse_year("the bronze age"), 0);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut locs = vec![
            Location::named("C").with_time_context("3rd century"),
            Location::named("A").with_time_context("100 BCE"),
            Location::named("X").with_time_context("unknown"),
            Location::named("B").with_time_context("50 CE"),
            Location::named("Y").with_time_context(""),
        ];
        sort_chronologically(&mut locs);
        let names: Vec<_> = locs.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["A", "X", "Y", "B", "C"]);
    }

    #[test]
    fn test_find_time_mention() {
        assert_eq!(
            find_time_mention("Rome in the 1st century BC").as_deref(),
            Some("1st century BC")
        );
        assert_eq!(find_time_mention("Hastings 1066").as_deref(), Some("1066"));
        assert_eq!(find_time_mention("no dates here"), None);
    }
}
