//! Sequential runs (`abc`, `987`) and repeated characters (`aaa`).

use crate::types::{PatternKind, PatternMatch};

pub const MIN_SEQUENCE_LEN: usize = 3;
pub const MIN_REPEAT_LEN: usize = 3;

/// Step between two chars of the same class, if it is +1 or -1.
/// Letters compare case-insensitively; digits and letters never mix.
fn step(a: char, b: char) -> Option<i32> {
    let same_class = (a.is_ascii_digit() && b.is_ascii_digit())
        || (a.is_ascii_alphabetic() && b.is_ascii_alphabetic());
    if !same_class {
        return None;
    }
    let delta = b.to_ascii_lowercase() as i32 - a.to_ascii_lowercase() as i32;
    if delta == 1 || delta == -1 {
        Some(delta)
    } else {
        None
    }
}

/// Maximal runs with a constant +1/-1 step. A direction change starts a new
/// run that shares the turning character.
pub fn find_sequences(chars: &[char]) -> Vec<PatternMatch> {
    let mut found = Vec::new();
    let n = chars.len();
    let mut start = 0;

    while start + 1 < n {
        let Some(delta) = step(chars[start], chars[start + 1]) else {
            start += 1;
            continue;
        };

        let mut end = start + 1;
        while end + 1 < n && step(chars[end], chars[end + 1]) == Some(delta) {
            end += 1;
        }

        if end - start + 1 >= MIN_SEQUENCE_LEN {
            let matched: String = chars[start..=end].iter().collect();
            found.push(PatternMatch::new(PatternKind::Sequence, matched, start));
        }
        start = end;
    }

    found
}

/// Runs of at least three identical characters.
pub fn find_repeats(chars: &[char]) -> Vec<PatternMatch> {
    let mut found = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = start + 1;
        while end < chars.len() && chars[end] == chars[start] {
            end += 1;
        }
        if end - start >= MIN_REPEAT_LEN {
            let matched: String = chars[start..end].iter().collect();
            found.push(PatternMatch::new(PatternKind::Repeat, matched, start));
        }
        start = end;
    }

    found
}
