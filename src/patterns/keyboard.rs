//! Keyboard walks over a US QWERTY layout.

use std::collections::HashSet;

use crate::types::{PatternKind, PatternMatch};

pub const MIN_WALK_LEN: usize = 4;

/// Rows plus the common column and diagonal chains.
const CHAINS: &[&str] = &[
    "qwertyuiop",
    "asdfghjkl",
    "zxcvbnm",
    "1234567890",
    "1qaz2wsx3edc4rfv5tgb6yhn7ujm",
    "qazwsx",
    "qweasd",
    "zaqxswcde",
];

/// Every substring of length >= `MIN_WALK_LEN` of every chain, both directions.
#[derive(Debug, Clone)]
pub struct KeyboardWalks {
    walks: HashSet<String>,
    max_len: usize,
}

impl KeyboardWalks {
    pub fn new() -> Self {
        let mut walks = HashSet::new();
        let mut max_len = 0;

        for chain in CHAINS {
            let forward: Vec<char> = chain.chars().collect();
            let reversed: Vec<char> = forward.iter().rev().copied().collect();
            max_len = max_len.max(forward.len());

            for seq in [forward, reversed] {
                for start in 0..seq.len() {
                    for end in (start + MIN_WALK_LEN)..=seq.len() {
                        walks.insert(seq[start..end].iter().collect());
                    }
                }
            }
        }

        Self { walks, max_len }
    }

    /// Longest walks found scanning left to right; a found walk is skipped over.
    pub fn find(&self, chars: &[char]) -> Vec<PatternMatch> {
        let lower: Vec<char> = chars.iter().map(|c| c.to_ascii_lowercase()).collect();
        let mut found = Vec::new();
        let mut start = 0;

        while start + MIN_WALK_LEN <= lower.len() {
            let longest = (start + MIN_WALK_LEN..=(start + self.max_len).min(lower.len()))
                .rev()
                .find(|&end| {
                    let candidate: String = lower[start..end].iter().collect();
                    self.walks.contains(&candidate)
                });

            match longest {
                Some(end) => {
                    let matched: String = chars[start..end].iter().collect();
                    found.push(PatternMatch::new(PatternKind::KeyboardWalk, matched, start));
                    start = end;
                }
                None => start += 1,
            }
        }

        found
    }
}

impl Default for KeyboardWalks {
    fn default() -> Self {
        Self::new()
    }
}
