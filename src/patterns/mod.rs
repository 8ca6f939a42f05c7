//! Weakness detection
//!
//! A [`PatternDetector`] compiles every matcher once and is then shared
//! read-only (typically behind an `Arc`) by all analyses.

mod dates;
mod keyboard;
mod leet;
mod sequence;
mod words;

pub use dates::DateMatcher;
pub use keyboard::{KeyboardWalks, MIN_WALK_LEN};
pub use leet::{is_stand_in, normalize as normalize_leet};
pub use sequence::{MIN_REPEAT_LEN, MIN_SEQUENCE_LEN};
pub use words::{MIN_WORD_LEN, WordHit, WordLists, WordMatcher};

use crate::error::DetectorError;
use crate::types::{PatternKind, PatternMatch, PatternReport};

#[derive(Debug, Clone)]
pub struct PatternDetector {
    keyboard: KeyboardWalks,
    dates: DateMatcher,
    dictionary: WordMatcher,
    context: WordMatcher,
}

impl PatternDetector {
    pub fn new(lists: &WordLists) -> Result<Self, DetectorError> {
        Ok(Self {
            keyboard: KeyboardWalks::new(),
            dates: DateMatcher::new()?,
            dictionary: WordMatcher::new(lists.dictionary())?,
            context: WordMatcher::new(lists.context())?,
        })
    }

    /// Detector over the bundled word lists.
    pub fn builtin() -> Result<Self, DetectorError> {
        Self::new(&WordLists::builtin())
    }

    /// Runs every detector in fixed order. Common-password membership is
    /// added by the analyzer, which owns the index.
    pub fn detect(&self, password: &str) -> PatternReport {
        let mut report = PatternReport::new();
        if password.is_empty() {
            return report;
        }

        let chars: Vec<char> = password.chars().collect();

        let detected = sequence::find_sequences(&chars)
            .into_iter()
            .chain(self.keyboard.find(&chars))
            .chain(sequence::find_repeats(&chars))
            .chain(self.dates.find(password))
            .chain(self.find_words(password, &self.dictionary, PatternKind::DictionaryWord))
            .chain(self.find_leetspeak(password))
            .chain(self.find_words(password, &self.context, PatternKind::Contextual));

        for m in detected {
            report.push(m);
        }
        report
    }

    fn find_words(&self, password: &str, matcher: &WordMatcher, kind: PatternKind) -> Vec<PatternMatch> {
        matcher
            .find(password)
            .into_iter()
            .map(|hit| to_match(password, &hit, matcher, kind))
            .collect()
    }

    /// Dictionary matches over folded variants. Only spans that contain a
    /// stand-in are reported, with the original characters.
    fn find_leetspeak(&self, password: &str) -> Vec<PatternMatch> {
        let mut found = Vec::new();
        for variant in leet::normalize(password) {
            for hit in self.dictionary.find(&variant) {
                if password[hit.start..hit.end].chars().any(is_stand_in) {
                    found.push(to_match(password, &hit, &self.dictionary, PatternKind::Leetspeak));
                }
            }
        }
        found
    }
}

fn to_match(password: &str, hit: &WordHit, matcher: &WordMatcher, kind: PatternKind) -> PatternMatch {
    let position = password[..hit.start].chars().count();
    PatternMatch::new(kind, &password[hit.start..hit.end], position).with_word(matcher.word(hit.word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> PatternDetector {
        PatternDetector::builtin().expect("builtin detector")
    }

    fn matched(report: &PatternReport, kind: PatternKind) -> Vec<String> {
        report.get(kind).iter().map(|m| m.matched.clone()).collect()
    }

    #[test]
    fn test_detect_sequences() {
        let report = detector().detect("abc123xyz");
        let seqs = matched(&report, PatternKind::Sequence);
        assert!(seqs.contains(&"abc".to_string()));
        assert!(seqs.contains(&"123".to_string()));
    }

    #[test]
    fn test_detect_keyboard_walk() {
        let report = detector().detect("qwerty123");
        assert!(report.contains(PatternKind::KeyboardWalk));
    }

    #[test]
    fn test_detect_dictionary_words() {
        let report = detector().detect("password123");
        assert!(matched(&report, PatternKind::DictionaryWord).contains(&"password".to_string()));

        let report = detector().detect("ADMIN");
        let words: Vec<_> = report
            .get(PatternKind::DictionaryWord)
            .iter()
            .filter_map(|m| m.word.clone())
            .collect();
        assert!(words.contains(&"admin".to_string()));
    }

    #[test]
    fn test_leetspeak_reports_original_substring() {
        let report = detector().detect("p@ssw0rd");
        let leet = report.get(PatternKind::Leetspeak);
        let full = leet
            .iter()
            .find(|m| m.word.as_deref() == Some("password"))
            .expect("password surfaced through leetspeak");
        assert_eq!(full.matched, "p@ssw0rd");
        assert_eq!(full.position, 0);
    }

    #[test]
    fn test_leetspeak_ignores_plain_words() {
        let report = detector().detect("password");
        assert!(!report.contains(PatternKind::Leetspeak));
    }

    #[test]
    fn test_leetspeak_alternative_reading() {
        let report = detector().detect("1ov3ly");
        let words: Vec<_> = report
            .get(PatternKind::Leetspeak)
            .iter()
            .filter_map(|m| m.word.clone())
            .collect();
        assert!(words.contains(&"love".to_string()));
    }

    #[test]
    fn test_leetspeak_six_and_bracket_stand_ins() {
        let d = detector();
        for (pwd, word) in [("dra6on", "dragon"), ("(omputer", "computer")] {
            let report = d.detect(pwd);
            let leet = report.get(PatternKind::Leetspeak);
            assert!(
                leet.iter().any(|m| m.word.as_deref() == Some(word) && m.matched == pwd),
                "{} should fold to {}: {:?}",
                pwd,
                word,
                leet
            );
        }
    }

    #[test]
    fn test_contextual_terms() {
        let report = detector().detect("GooglePass123");
        assert_eq!(matched(&report, PatternKind::Contextual), vec!["Google"]);
    }

    #[test]
    fn test_custom_lists() {
        let lists = WordLists::new(["corporate"], ["initech"]);
        let detector = PatternDetector::new(&lists).unwrap();
        let report = detector.detect("Initech-Corporate");
        assert_eq!(matched(&report, PatternKind::DictionaryWord), vec!["Corporate"]);
        assert_eq!(matched(&report, PatternKind::Contextual), vec!["Initech"]);
    }

    #[test]
    fn test_not_deduplicated_across_kinds() {
        // "1234" is both a sequence and a keyboard walk
        let report = detector().detect("1234");
        assert!(report.contains(PatternKind::Sequence));
        assert!(report.contains(PatternKind::KeyboardWalk));
    }

    #[test]
    fn test_kinds_in_detection_order() {
        let report = detector().detect("Google1990abcaaa");
        let kinds: Vec<_> = report.kinds().collect();
        let mut sorted = kinds.clone();
        sorted.sort();
        assert_eq!(kinds, sorted);
    }

    #[test]
    fn test_clean_password() {
        let report = detector().detect("rX9$mK2#pL5");
        assert!(report.is_empty(), "unexpected patterns: {:?}", report);
    }

    #[test]
    fn test_empty_password() {
        assert!(detector().detect("").is_empty());
    }

    #[test]
    fn test_adversarial_input_does_not_panic() {
        let d = detector();
        d.detect("\u{0}\u{FFFF}𝕏𝕏𝕏@@@");
        d.detect(&"é".repeat(500));
        d.detect(&"1".repeat(1000));
    }
}
