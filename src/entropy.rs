//! Shannon and character-pool entropy.

use std::collections::HashMap;

use crate::types::{CharProfile, EntropyMeasures};

const LOWERCASE_POOL: u32 = 26;
const UPPERCASE_POOL: u32 = 26;
const DIGIT_POOL: u32 = 10;
const SYMBOL_POOL: u32 = 32;

pub fn measure(password: &str) -> EntropyMeasures {
    EntropyMeasures {
        shannon_bits: shannon_bits(password),
        pool_bits: pool_bits(password),
    }
}

/// Total Shannon entropy of the string: per-symbol entropy times length.
pub fn shannon_bits(password: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut length = 0usize;
    for c in password.chars() {
        *counts.entry(c).or_insert(0) += 1;
        length += 1;
    }
    if length == 0 {
        return 0.0;
    }

    let len = length as f64;
    let per_symbol: f64 = counts
        .values()
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum();

    per_symbol * len
}

/// `length * log2(pool_size)`, an upper bound independent of distribution.
pub fn pool_bits(password: &str) -> f64 {
    let profile = CharProfile::of(password);
    let pool = pool_size(&profile);
    if pool == 0 || profile.length == 0 {
        return 0.0;
    }
    profile.length as f64 * f64::from(pool).log2()
}

/// Sum of the alphabet sizes of the classes actually present.
pub fn pool_size(profile: &CharProfile) -> u32 {
    let mut pool = 0;
    if profile.lowercase > 0 {
        pool += LOWERCASE_POOL;
    }
    if profile.uppercase > 0 {
        pool += UPPERCASE_POOL;
    }
    if profile.digits > 0 {
        pool += DIGIT_POOL;
    }
    if profile.symbols > 0 {
        pool += SYMBOL_POOL;
    }
    pool
}

impl CharProfile {
    /// Uncased letters count as lowercase; anything non-alphanumeric is a symbol.
    pub fn of(password: &str) -> Self {
        let mut profile = CharProfile::default();
        for c in password.chars() {
            profile.length += 1;
            if c.is_numeric() {
                profile.digits += 1;
            } else if c.is_uppercase() {
                profile.uppercase += 1;
            } else if c.is_alphabetic() {
                profile.lowercase += 1;
            } else {
                profile.symbols += 1;
            }
        }
        profile
    }
}
