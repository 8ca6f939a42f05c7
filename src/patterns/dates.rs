//! Dates and years, by fixed format only (no calendar validation).

use regex::Regex;

use crate::types::{PatternKind, PatternMatch};

/// Full dates, most specific first.
const DATE_FORMATS: &[&str] = &[
    // YYYY-MM-DD, YYYY/MM/DD, YYYY.MM.DD
    r"(?:19|20)[0-9]{2}[/.\-][0-9]{1,2}[/.\-][0-9]{1,2}",
    // MM/DD/YYYY, DD-MM-YY, ...
    r"[0-9]{1,2}[/.\-][0-9]{1,2}[/.\-](?:[0-9]{4}|[0-9]{2})",
    // MMDDYYYY
    r"(?:0[1-9]|1[0-2])(?:0[1-9]|[12][0-9]|3[01])(?:19|20)[0-9]{2}",
    // DDMMYYYY
    r"(?:0[1-9]|[12][0-9]|3[01])(?:0[1-9]|1[0-2])(?:19|20)[0-9]{2}",
];

/// Years 1900-2099.
const YEAR: &str = r"(?:19|20)[0-9]{2}";

#[derive(Debug, Clone)]
pub struct DateMatcher {
    formats: Vec<Regex>,
    year: Regex,
}

impl DateMatcher {
    pub fn new() -> Result<Self, regex::Error> {
        let formats = DATE_FORMATS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            formats,
            year: Regex::new(YEAR)?,
        })
    }

    /// Full dates first, then years not already inside a reported date.
    pub fn find(&self, password: &str) -> Vec<PatternMatch> {
        let mut spans: Vec<(usize, usize)> = Vec::new();
        let mut found = Vec::new();

        let overlaps = |spans: &[(usize, usize)], start: usize, end: usize| {
            spans.iter().any(|&(s, e)| start < e && s < end)
        };

        for format in self.formats.iter().chain(std::iter::once(&self.year)) {
            for m in format.find_iter(password) {
                if overlaps(&spans, m.start(), m.end()) {
                    continue;
                }
                spans.push((m.start(), m.end()));
                let position = password[..m.start()].chars().count();
                found.push(PatternMatch::new(PatternKind::Date, m.as_str(), position));
            }
        }

        found.sort_by_key(|m| m.position);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(s: &str) -> Vec<String> {
        DateMatcher::new()
            .unwrap()
            .find(s)
            .into_iter()
            .map(|m| m.matched)
            .collect()
    }

    #[test]
    fn test_years() {
        assert_eq!(dates("password1990"), vec!["1990"]);
        assert_eq!(dates("test2023end"), vec!["2023"]);
        assert!(dates("nodate").is_empty());
        assert!(dates("abc1899").is_empty());
        assert!(dates("x2100").is_empty());
    }

    #[test]
    fn test_full_dates_swallow_their_year() {
        assert_eq!(dates("born01/02/1990!"), vec!["01/02/1990"]);
        assert_eq!(dates("x2020-12-31"), vec!["2020-12-31"]);
        assert_eq!(dates("a12-25-99"), vec!["12-25-99"]);
    }

    #[test]
    fn test_compact_date() {
        assert_eq!(dates("Kate07041985"), vec!["07041985"]);
    }

    #[test]
    fn test_multiple_in_position_order() {
        assert_eq!(dates("1999and2001"), vec!["1999", "2001"]);
    }

    #[test]
    fn test_position_counts_chars() {
        let found = DateMatcher::new().unwrap().find("é1990");
        assert_eq!(found[0].position, 1);
    }
}
