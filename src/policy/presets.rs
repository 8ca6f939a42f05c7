//! Built-in policies, from lenient to strict.

use super::{Policy, Rule};
use crate::types::PatternKind;

pub const PRESET_NAMES: [&str; 4] = ["basic", "medium", "strong", "enterprise"];

/// Looks up a preset by name. Case-insensitive; a `POLICY_` prefix is accepted.
pub fn preset(name: &str) -> Option<Policy> {
    let key = name.trim().to_ascii_lowercase();
    let key = key.strip_prefix("policy_").unwrap_or(&key);
    let rules = match key {
        "basic" => basic(),
        "medium" => medium(),
        "strong" => strong(),
        "enterprise" => enterprise(),
        _ => return None,
    };
    Some(Policy {
        name: format!("POLICY_{}", key.to_ascii_uppercase()),
        rules,
    })
}

fn basic() -> Vec<Rule> {
    vec![
        Rule::MinLength(8),
        Rule::MinUppercase(1),
        Rule::MinLowercase(1),
        Rule::MinDigits(1),
    ]
}

fn medium() -> Vec<Rule> {
    vec![
        Rule::MinLength(10),
        Rule::MinUppercase(1),
        Rule::MinLowercase(1),
        Rule::MinDigits(1),
        Rule::MinSymbols(1),
        Rule::ForbidCommon,
        Rule::MinScore(40.0),
    ]
}

fn strong() -> Vec<Rule> {
    vec![
        Rule::MinLength(12),
        Rule::MinUppercase(1),
        Rule::MinLowercase(1),
        Rule::MinDigits(1),
        Rule::MinSymbols(1),
        Rule::ForbidCommon,
        Rule::MinEntropy(50.0),
        Rule::MinScore(60.0),
        Rule::ForbidPatterns([PatternKind::Sequence, PatternKind::KeyboardWalk].into()),
    ]
}

fn enterprise() -> Vec<Rule> {
    vec![
        Rule::MinLength(14),
        Rule::MinUppercase(2),
        Rule::MinLowercase(2),
        Rule::MinDigits(2),
        Rule::MinSymbols(2),
        Rule::ForbidCommon,
        Rule::MinEntropy(60.0),
        Rule::MinScore(70.0),
        Rule::ForbidPatterns(
            [
                PatternKind::Sequence,
                PatternKind::KeyboardWalk,
                PatternKind::Repeat,
                PatternKind::Date,
                PatternKind::DictionaryWord,
                PatternKind::Leetspeak,
            ]
            .into(),
        ),
        Rule::ForbidBreach,
    ]
}
