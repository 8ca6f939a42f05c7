//! Password policies
//!
//! A [`Policy`] is a named, ordered list of [`Rule`]s. Policies are built
//! through [`PolicyBuilder`], taken from a preset, or loaded from JSON; every
//! path validates the rules up front, so a policy that exists is usable.
//!
//! Validation never short-circuits: every rule is evaluated and each failed
//! rule contributes one message, in policy order.

mod load;
mod presets;

pub use load::{load_policy, load_policy_file};
pub use presets::{PRESET_NAMES, preset};

use std::collections::BTreeSet;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::types::{AnalysisResult, BreachStatus, PatternKind};

/// One requirement. Serialized as `{"kind": "...", "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Rule {
    MinLength(usize),
    MaxLength(usize),
    MinUppercase(usize),
    MinLowercase(usize),
    MinDigits(usize),
    MinSymbols(usize),
    ForbidCommon,
    /// Shannon bits.
    MinEntropy(f64),
    MinScore(f64),
    ForbidPatterns(BTreeSet<PatternKind>),
    ForbidBreach,
    /// Matched case-insensitively as substrings.
    BlacklistWords(Vec<String>),
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::MinLength(_) => "min_length",
            Rule::MaxLength(_) => "max_length",
            Rule::MinUppercase(_) => "min_uppercase",
            Rule::MinLowercase(_) => "min_lowercase",
            Rule::MinDigits(_) => "min_digits",
            Rule::MinSymbols(_) => "min_symbols",
            Rule::ForbidCommon => "forbid_common",
            Rule::MinEntropy(_) => "min_entropy",
            Rule::MinScore(_) => "min_score",
            Rule::ForbidPatterns(_) => "forbid_patterns",
            Rule::ForbidBreach => "forbid_breach",
            Rule::BlacklistWords(_) => "blacklist_words",
        }
    }

    /// Human-readable requirement.
    pub fn description(&self) -> String {
        match self {
            Rule::MinLength(n) => format!("Minimum {} characters", n),
            Rule::MaxLength(n) => format!("Maximum {} characters", n),
            Rule::MinUppercase(n) => format!("At least {} uppercase letter(s)", n),
            Rule::MinLowercase(n) => format!("At least {} lowercase letter(s)", n),
            Rule::MinDigits(n) => format!("At least {} digit(s)", n),
            Rule::MinSymbols(n) => format!("At least {} special symbol(s)", n),
            Rule::ForbidCommon => "Must not be a common password".to_string(),
            Rule::MinEntropy(bits) => format!("Minimum {} bits entropy", bits),
            Rule::MinScore(score) => format!("Minimum strength score {}/100", score),
            Rule::ForbidPatterns(kinds) => {
                format!("Must not contain patterns: {}", join_labels(kinds.iter()))
            }
            Rule::ForbidBreach => "Must not appear in data breaches".to_string(),
            Rule::BlacklistWords(_) => "Must not contain blacklisted words".to_string(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            Rule::MinLength(0) | Rule::MaxLength(0) => Err("length must be at least 1".to_string()),
            Rule::MinUppercase(0) | Rule::MinLowercase(0) | Rule::MinDigits(0) | Rule::MinSymbols(0) => {
                Err("count must be at least 1".to_string())
            }
            Rule::MinEntropy(bits) if !bits.is_finite() || *bits < 0.0 => {
                Err(format!("entropy must be a non-negative number, got {}", bits))
            }
            Rule::MinScore(score) if !score.is_finite() || !(0.0..=100.0).contains(score) => {
                Err(format!("score must be between 0 and 100, got {}", score))
            }
            Rule::ForbidPatterns(kinds) if kinds.is_empty() => {
                Err("at least one pattern kind is required".to_string())
            }
            Rule::BlacklistWords(words) if words.is_empty() => {
                Err("at least one word is required".to_string())
            }
            Rule::BlacklistWords(words) if words.iter().any(|w| w.trim().is_empty()) => {
                Err("words must not be empty".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Violation message, or `None` when the rule is satisfied.
    fn check(&self, result: &AnalysisResult, password: Option<&str>) -> Option<String> {
        let profile = &result.profile;
        match self {
            Rule::MinLength(n) => (profile.length < *n)
                .then(|| format!("Password must be at least {} characters long", n)),
            Rule::MaxLength(n) => (profile.length > *n)
                .then(|| format!("Password must not exceed {} characters", n)),
            Rule::MinUppercase(n) => (profile.uppercase < *n)
                .then(|| format!("Password must contain at least {} uppercase letter(s)", n)),
            Rule::MinLowercase(n) => (profile.lowercase < *n)
                .then(|| format!("Password must contain at least {} lowercase letter(s)", n)),
            Rule::MinDigits(n) => (profile.digits < *n)
                .then(|| format!("Password must contain at least {} digit(s)", n)),
            Rule::MinSymbols(n) => (profile.symbols < *n)
                .then(|| format!("Password must contain at least {} special symbol(s)", n)),
            Rule::ForbidCommon => result
                .is_common
                .then(|| "Password is too common and easily guessable".to_string()),
            Rule::MinEntropy(bits) => (result.entropy.shannon_bits < *bits)
                .then(|| format!("Password must have at least {} bits of entropy", bits)),
            Rule::MinScore(score) => (result.score < *score)
                .then(|| format!("Password must have a strength score of at least {}/100", score)),
            Rule::ForbidPatterns(kinds) => {
                let present: Vec<PatternKind> = result
                    .patterns
                    .kinds()
                    .filter(|kind| kinds.contains(kind))
                    .collect();
                (!present.is_empty()).then(|| {
                    format!(
                        "Password contains forbidden patterns: {}",
                        join_labels(present.iter())
                    )
                })
            }
            Rule::ForbidBreach => match &result.breach {
                Some(BreachStatus::NotExposed) => None,
                Some(BreachStatus::Exposed { count }) => Some(format!(
                    "Password has been exposed in known data breaches ({} times)",
                    count
                )),
                Some(BreachStatus::Unknown { .. }) | None => {
                    Some("Breach status unknown, cannot confirm policy compliance".to_string())
                }
            },
            Rule::BlacklistWords(words) => {
                let Some(password) = password else {
                    return Some(
                        "Forbidden words cannot be checked without the password".to_string(),
                    );
                };
                let lowered = password.to_lowercase();
                let found: Vec<&str> = words
                    .iter()
                    .filter(|w| lowered.contains(&w.to_lowercase()))
                    .map(String::as_str)
                    .collect();
                (!found.is_empty())
                    .then(|| format!("Password contains forbidden words: {}", found.join(", ")))
            }
        }
    }
}

fn join_labels<'a>(kinds: impl Iterator<Item = &'a PatternKind>) -> String {
    kinds.map(PatternKind::label).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub violations: Vec<String>,
}

/// Immutable, validated rule set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Policy {
    name: String,
    rules: Vec<Rule>,
}

impl Policy {
    pub fn builder(name: impl Into<String>) -> PolicyBuilder {
        PolicyBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn requirements(&self) -> Vec<String> {
        self.rules.iter().map(Rule::description).collect()
    }

    /// Checks an analyzed password against every rule.
    pub fn validate(&self, password: &SecretString, result: &AnalysisResult) -> ValidationResult {
        self.evaluate(result, Some(password.expose_secret()))
    }

    /// Checks a stored result. Rules that need the password itself fail.
    pub fn validate_result(&self, result: &AnalysisResult) -> ValidationResult {
        self.evaluate(result, None)
    }

    fn evaluate(&self, result: &AnalysisResult, password: Option<&str>) -> ValidationResult {
        let violations: Vec<String> = self
            .rules
            .iter()
            .filter_map(|rule| rule.check(result, password))
            .collect();
        ValidationResult {
            passed: violations.is_empty(),
            violations,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PolicyBuilder {
    name: String,
    rules: Vec<Rule>,
}

impl PolicyBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn min_length(self, n: usize) -> Self {
        self.rule(Rule::MinLength(n))
    }

    pub fn max_length(self, n: usize) -> Self {
        self.rule(Rule::MaxLength(n))
    }

    pub fn min_uppercase(self, n: usize) -> Self {
        self.rule(Rule::MinUppercase(n))
    }

    pub fn min_lowercase(self, n: usize) -> Self {
        self.rule(Rule::MinLowercase(n))
    }

    pub fn min_digits(self, n: usize) -> Self {
        self.rule(Rule::MinDigits(n))
    }

    pub fn min_symbols(self, n: usize) -> Self {
        self.rule(Rule::MinSymbols(n))
    }

    pub fn forbid_common(self) -> Self {
        self.rule(Rule::ForbidCommon)
    }

    pub fn min_entropy(self, bits: f64) -> Self {
        self.rule(Rule::MinEntropy(bits))
    }

    pub fn min_score(self, score: f64) -> Self {
        self.rule(Rule::MinScore(score))
    }

    pub fn forbid_patterns(self, kinds: impl IntoIterator<Item = PatternKind>) -> Self {
        self.rule(Rule::ForbidPatterns(kinds.into_iter().collect()))
    }

    pub fn forbid_breach(self) -> Self {
        self.rule(Rule::ForbidBreach)
    }

    pub fn blacklist_words<S: Into<String>>(self, words: impl IntoIterator<Item = S>) -> Self {
        self.rule(Rule::BlacklistWords(words.into_iter().map(Into::into).collect()))
    }

    /// Validates every rule and the rule set as a whole.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The name is empty
    /// - A rule has an out-of-range parameter
    /// - `max_length` is smaller than `min_length`
    pub fn build(self) -> Result<Policy, PolicyError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(PolicyError::EmptyName);
        }

        for rule in &self.rules {
            rule.validate().map_err(|reason| PolicyError::InvalidRule {
                policy: name.clone(),
                rule: rule.name(),
                reason,
            })?;
        }

        let min = self.rules.iter().filter_map(|r| match r {
            Rule::MinLength(n) => Some(*n),
            _ => None,
        });
        let max = self.rules.iter().filter_map(|r| match r {
            Rule::MaxLength(n) => Some(*n),
            _ => None,
        });
        if let (Some(min), Some(max)) = (min.max(), max.min()) {
            if max < min {
                return Err(PolicyError::InvalidRule {
                    policy: name,
                    rule: "max_length",
                    reason: format!("maximum {} is below minimum {}", max, min),
                });
            }
        }

        Ok(Policy {
            name,
            rules: self.rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Analyzer;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn analyze(password: &str) -> (SecretString, AnalysisResult) {
        let analyzer = Analyzer::builtin().expect("builtin analyzer");
        let password = secret(password);
        let result = analyzer.analyze_offline(&password);
        (password, result)
    }

    #[test]
    fn test_min_length_violation() {
        let policy = Policy::builder("short").min_length(12).build().unwrap();
        let (pw, result) = analyze("short");
        let validation = policy.validate(&pw, &result);
        assert!(!validation.passed);
        assert_eq!(
            validation.violations,
            vec!["Password must be at least 12 characters long"]
        );
    }

    #[test]
    fn test_collects_every_violation_in_order() {
        let policy = Policy::builder("all")
            .min_length(12)
            .min_uppercase(1)
            .min_digits(2)
            .min_symbols(1)
            .forbid_common()
            .build()
            .unwrap();
        let (pw, result) = analyze("password");
        let validation = policy.validate(&pw, &result);
        assert_eq!(
            validation.violations,
            vec![
                "Password must be at least 12 characters long",
                "Password must contain at least 1 uppercase letter(s)",
                "Password must contain at least 2 digit(s)",
                "Password must contain at least 1 special symbol(s)",
                "Password is too common and easily guessable",
            ]
        );
    }

    #[test]
    fn test_passing_policy() {
        let policy = Policy::builder("ok")
            .min_length(8)
            .min_lowercase(1)
            .max_length(64)
            .build()
            .unwrap();
        let (pw, result) = analyze("Zx9#Kp2@Lm7$");
        let validation = policy.validate(&pw, &result);
        assert!(validation.passed);
        assert!(validation.violations.is_empty());
    }

    #[test]
    fn test_forbid_breach_unknown_is_a_violation() {
        let policy = Policy::builder("breach").forbid_breach().build().unwrap();
        let (pw, mut result) = analyze("Zx9#Kp2@Lm7$");
        let unknown = "Breach status unknown, cannot confirm policy compliance";

        // not checked
        assert_eq!(policy.validate(&pw, &result).violations, vec![unknown]);

        result.breach = Some(BreachStatus::unknown("timeout"));
        assert_eq!(policy.validate(&pw, &result).violations, vec![unknown]);

        result.breach = Some(BreachStatus::Exposed { count: 12 });
        assert_eq!(
            policy.validate(&pw, &result).violations,
            vec!["Password has been exposed in known data breaches (12 times)"]
        );

        result.breach = Some(BreachStatus::NotExposed);
        assert!(policy.validate(&pw, &result).passed);
    }

    #[test]
    fn test_forbid_patterns_lists_present_kinds() {
        let policy = Policy::builder("patterns")
            .forbid_patterns([PatternKind::Sequence, PatternKind::Date])
            .build()
            .unwrap();
        let (pw, result) = analyze("Xq!abc1990");
        assert_eq!(
            policy.validate(&pw, &result).violations,
            vec!["Password contains forbidden patterns: sequence, date"]
        );
    }

    #[test]
    fn test_blacklist_words() {
        let policy = Policy::builder("words")
            .blacklist_words(["ACME", "initech"])
            .build()
            .unwrap();
        let (pw, result) = analyze("myAcme#2024x");
        assert_eq!(
            policy.validate(&pw, &result).violations,
            vec!["Password contains forbidden words: ACME"]
        );
        // without the secret the rule cannot pass
        assert!(!policy.validate_result(&result).passed);
    }

    #[test]
    fn test_entropy_and_score_rules() {
        let policy = Policy::builder("numbers")
            .min_entropy(50.0)
            .min_score(60.0)
            .build()
            .unwrap();
        let (pw, result) = analyze("aaaa");
        assert_eq!(
            policy.validate(&pw, &result).violations,
            vec![
                "Password must have at least 50 bits of entropy",
                "Password must have a strength score of at least 60/100",
            ]
        );
    }

    #[test]
    fn test_build_rejects_invalid_rules() {
        let err = Policy::builder("bad").min_score(150.0).build().unwrap_err();
        assert!(matches!(err, PolicyError::InvalidRule { rule: "min_score", .. }));

        let err = Policy::builder("bad").min_length(0).build().unwrap_err();
        assert!(matches!(err, PolicyError::InvalidRule { rule: "min_length", .. }));

        let err = Policy::builder("bad")
            .min_length(16)
            .max_length(8)
            .build()
            .unwrap_err();
        assert!(matches!(err, PolicyError::InvalidRule { rule: "max_length", .. }));

        let err = Policy::builder("bad")
            .blacklist_words(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, PolicyError::InvalidRule { rule: "blacklist_words", .. }));

        assert!(matches!(
            Policy::builder("  ").build(),
            Err(PolicyError::EmptyName)
        ));
    }

    #[test]
    fn test_rule_serialization_format() {
        let json = serde_json::to_string(&Rule::MinLength(12)).unwrap();
        assert_eq!(json, r#"{"kind":"min_length","value":12}"#);

        let json = serde_json::to_string(&Rule::ForbidCommon).unwrap();
        assert_eq!(json, r#"{"kind":"forbid_common"}"#);

        let rule: Rule =
            serde_json::from_str(r#"{"kind":"forbid_patterns","value":["keyboard_walk"]}"#).unwrap();
        assert_eq!(
            rule,
            Rule::ForbidPatterns(BTreeSet::from([PatternKind::KeyboardWalk]))
        );
    }

    #[test]
    fn test_requirements() {
        let policy = Policy::builder("req").min_length(8).forbid_common().build().unwrap();
        assert_eq!(
            policy.requirements(),
            vec!["Minimum 8 characters", "Must not be a common password"]
        );
    }
}
