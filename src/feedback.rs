//! Recommendations derived from an analysis, most urgent first.

use crate::types::{BreachStatus, CharProfile, PatternKind, PatternReport};

const MAX_EXAMPLES: usize = 3;

pub struct FeedbackInput<'a> {
    pub score: f64,
    pub profile: &'a CharProfile,
    pub patterns: &'a PatternReport,
    pub is_common: bool,
    pub breach: Option<&'a BreachStatus>,
}

pub fn generate(input: &FeedbackInput<'_>) -> Vec<String> {
    let mut feedback = Vec::new();

    if input.is_common {
        feedback.push(
            "CRITICAL: This password appears in common password lists and is easily guessable."
                .to_string(),
        );
    }

    if let Some(BreachStatus::Exposed { count }) = input.breach {
        feedback.push(format!(
            "CRITICAL: This password has appeared {} times in known data breaches. Do not use it.",
            count
        ));
    }

    let length = input.profile.length;
    if length < 8 {
        feedback.push(
            "Your password is too short. Use at least 12 characters for better security."
                .to_string(),
        );
    } else if length < 12 {
        feedback.push("Consider using at least 12 characters for improved security.".to_string());
    }

    if input.profile.classes_present() < 3 {
        let missing = missing_classes(input.profile);
        if !missing.is_empty() {
            feedback.push(format!(
                "Add {} to increase password complexity.",
                missing.join(", ")
            ));
        }
    }

    for (kind, _) in input.patterns.iter() {
        if let Some(line) = pattern_feedback(kind, input.patterns) {
            feedback.push(line);
        }
    }

    if let Some(BreachStatus::Unknown { .. }) = input.breach {
        feedback.push(
            "Breach exposure could not be verified; treat this password with caution.".to_string(),
        );
    }

    if input.score >= 80.0 && feedback.is_empty() {
        feedback.push(
            "Excellent password! It's long, complex, and doesn't contain obvious patterns."
                .to_string(),
        );
    }

    feedback
}

fn examples(patterns: &PatternReport, kind: PatternKind, use_word: bool) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for m in patterns.get(kind) {
        let shown: &str = if use_word {
            m.word.as_deref().unwrap_or(&m.matched)
        } else {
            &m.matched
        };
        if !seen.contains(&shown) {
            seen.push(shown);
        }
        if seen.len() == MAX_EXAMPLES {
            break;
        }
    }
    seen.join(", ")
}

fn pattern_feedback(kind: PatternKind, patterns: &PatternReport) -> Option<String> {
    let line = match kind {
        PatternKind::Sequence => format!(
            "Avoid predictable sequences like: {}",
            examples(patterns, kind, false)
        ),
        PatternKind::KeyboardWalk => format!(
            "Avoid keyboard patterns like: {}",
            examples(patterns, kind, false)
        ),
        PatternKind::Repeat => "Avoid repeating the same character multiple times.".to_string(),
        PatternKind::Date => "Avoid using dates or years in your password.".to_string(),
        PatternKind::DictionaryWord => format!(
            "Avoid common words like: {}",
            examples(patterns, kind, true)
        ),
        PatternKind::Leetspeak => format!(
            "Swapping letters for look-alike symbols is easily guessed (e.g. {}).",
            examples(patterns, kind, true)
        ),
        PatternKind::Contextual => format!(
            "Avoid brand names and well-known terms like: {}",
            examples(patterns, kind, true)
        ),
        // covered by the critical warning
        PatternKind::CommonPassword => return None,
    };
    Some(line)
}

fn missing_classes(profile: &CharProfile) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if profile.lowercase == 0 {
        missing.push("lowercase letters");
    }
    if profile.uppercase == 0 {
        missing.push("uppercase letters");
    }
    if profile.digits == 0 {
        missing.push("numbers");
    }
    if profile.symbols == 0 {
        missing.push("symbols");
    }
    missing
}
