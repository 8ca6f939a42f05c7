//! Analysis data model shared by detectors, the scorer, policies and exporters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Weakness category. Variant order is detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Sequence,
    KeyboardWalk,
    Repeat,
    Date,
    DictionaryWord,
    Leetspeak,
    Contextual,
    CommonPassword,
}

impl PatternKind {
    pub const ALL: [PatternKind; 8] = [
        PatternKind::Sequence,
        PatternKind::KeyboardWalk,
        PatternKind::Repeat,
        PatternKind::Date,
        PatternKind::DictionaryWord,
        PatternKind::Leetspeak,
        PatternKind::Contextual,
        PatternKind::CommonPassword,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PatternKind::Sequence => "sequence",
            PatternKind::KeyboardWalk => "keyboard walk",
            PatternKind::Repeat => "repeated characters",
            PatternKind::Date => "date",
            PatternKind::DictionaryWord => "dictionary word",
            PatternKind::Leetspeak => "leetspeak",
            PatternKind::Contextual => "contextual term",
            PatternKind::CommonPassword => "common password",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One detected weakness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    pub kind: PatternKind,
    /// Substring of the original password.
    pub matched: String,
    /// Char offset of `matched` in the password.
    pub position: usize,
    /// Lowercase list word this match stands for (word-list kinds only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
}

impl PatternMatch {
    pub fn new(kind: PatternKind, matched: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            matched: matched.into(),
            position,
            word: None,
        }
    }

    pub fn with_word(mut self, word: impl Into<String>) -> Self {
        self.word = Some(word.into());
        self
    }
}

/// Matches grouped by kind, iterated in detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PatternReport {
    matches: BTreeMap<PatternKind, Vec<PatternMatch>>,
}

impl PatternReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a match unless the same substring was already recorded for its kind.
    pub fn push(&mut self, m: PatternMatch) -> bool {
        let list = self.matches.entry(m.kind).or_default();
        if list.iter().any(|existing| existing.matched == m.matched) {
            return false;
        }
        list.push(m);
        true
    }

    pub fn get(&self, kind: PatternKind) -> &[PatternMatch] {
        self.matches.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, kind: PatternKind) -> bool {
        !self.get(kind).is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = PatternKind> + '_ {
        self.matches.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PatternKind, &[PatternMatch])> {
        self.matches.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EntropyMeasures {
    pub shannon_bits: f64,
    pub pool_bits: f64,
}

/// Character-class counts of a password. Holds no characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CharProfile {
    pub length: usize,
    pub lowercase: usize,
    pub uppercase: usize,
    pub digits: usize,
    pub symbols: usize,
}

impl CharProfile {
    pub fn classes_present(&self) -> usize {
        [self.lowercase, self.uppercase, self.digits, self.symbols]
            .iter()
            .filter(|&&n| n > 0)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthCategory {
    VeryWeak,
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl StrengthCategory {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            StrengthCategory::VeryStrong
        } else if score >= 60.0 {
            StrengthCategory::Strong
        } else if score >= 40.0 {
            StrengthCategory::Medium
        } else if score >= 20.0 {
            StrengthCategory::Weak
        } else {
            StrengthCategory::VeryWeak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrengthCategory::VeryWeak => "Very Weak",
            StrengthCategory::Weak => "Weak",
            StrengthCategory::Medium => "Medium",
            StrengthCategory::Strong => "Strong",
            StrengthCategory::VeryStrong => "Very Strong",
        }
    }
}

impl fmt::Display for StrengthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a breach lookup. `Unknown` is never equivalent to `NotExposed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BreachStatus {
    Exposed { count: u64 },
    NotExposed,
    Unknown { reason: String },
}

impl BreachStatus {
    pub fn unknown(reason: impl Into<String>) -> Self {
        BreachStatus::Unknown {
            reason: reason.into(),
        }
    }

    /// `Some(true)` if exposed, `Some(false)` if confirmed clean, `None` if unknown.
    pub fn exposed(&self) -> Option<bool> {
        match self {
            BreachStatus::Exposed { .. } => Some(true),
            BreachStatus::NotExposed => Some(false),
            BreachStatus::Unknown { .. } => None,
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            BreachStatus::Exposed { count } => *count,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalyzeOptions {
    pub check_breach: bool,
}

/// Full analysis of one password. Contains no plaintext beyond matched substrings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub score: f64,
    pub category: StrengthCategory,
    pub entropy: EntropyMeasures,
    pub profile: CharProfile,
    pub patterns: PatternReport,
    pub is_common: bool,
    /// `None` when no breach check was requested.
    pub breach: Option<BreachStatus>,
    pub feedback: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_thresholds() {
        assert_eq!(StrengthCategory::from_score(0.0), StrengthCategory::VeryWeak);
        assert_eq!(StrengthCategory::from_score(19.9), StrengthCategory::VeryWeak);
        assert_eq!(StrengthCategory::from_score(20.0), StrengthCategory::Weak);
        assert_eq!(StrengthCategory::from_score(39.9), StrengthCategory::Weak);
        assert_eq!(StrengthCategory::from_score(40.0), StrengthCategory::Medium);
        assert_eq!(StrengthCategory::from_score(60.0), StrengthCategory::Strong);
        assert_eq!(StrengthCategory::from_score(79.9), StrengthCategory::Strong);
        assert_eq!(StrengthCategory::from_score(80.0), StrengthCategory::VeryStrong);
        assert_eq!(StrengthCategory::from_score(100.0), StrengthCategory::VeryStrong);
    }

    #[test]
    fn test_report_dedups_within_kind_only() {
        let mut report = PatternReport::new();
        assert!(report.push(PatternMatch::new(PatternKind::Sequence, "123", 0)));
        assert!(!report.push(PatternMatch::new(PatternKind::Sequence, "123", 5)));
        assert!(report.push(PatternMatch::new(PatternKind::KeyboardWalk, "123", 0)));
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_report_iterates_in_detection_order() {
        let mut report = PatternReport::new();
        report.push(PatternMatch::new(PatternKind::Contextual, "google", 0));
        report.push(PatternMatch::new(PatternKind::Sequence, "abc", 6));
        report.push(PatternMatch::new(PatternKind::Date, "1990", 9));
        let kinds: Vec<_> = report.kinds().collect();
        assert_eq!(
            kinds,
            vec![PatternKind::Sequence, PatternKind::Date, PatternKind::Contextual]
        );
    }

    #[test]
    fn test_breach_status_unknown_is_not_clean() {
        assert_eq!(BreachStatus::unknown("timeout").exposed(), None);
        assert_eq!(BreachStatus::NotExposed.exposed(), Some(false));
        assert_eq!(BreachStatus::Exposed { count: 3 }.count(), 3);
    }

    #[test]
    fn test_report_serializes_with_snake_case_keys() {
        let mut report = PatternReport::new();
        report.push(PatternMatch::new(PatternKind::KeyboardWalk, "qwer", 0));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"keyboard_walk\""));
    }
}
