//! Strength score sections
//!
//! Each section scores one aspect of an analyzed password. The evaluator runs
//! them in sequence, sums the points and clamps the total to `0..=100`.
//! Every weight used by the scorer is defined here.

mod common;
mod entropy;
mod length;
mod pattern;
mod variety;

pub use common::common_password_section;
pub use entropy::entropy_section;
pub use length::length_section;
pub use pattern::pattern_penalty_section;
pub use variety::character_variety_section;

use crate::types::{CharProfile, EntropyMeasures, PatternKind, PatternReport};

/// Length credit is linear up to `AMPLE_LENGTH` chars and flat beyond.
pub const LENGTH_MAX_POINTS: f64 = 30.0;
pub const AMPLE_LENGTH: usize = 16;

/// Spread evenly over the four character classes.
pub const VARIETY_MAX_POINTS: f64 = 25.0;

/// Linear in Shannon bits up to `ENTROPY_SATURATION_BITS`.
pub const ENTROPY_MAX_POINTS: f64 = 25.0;
pub const ENTROPY_SATURATION_BITS: f64 = 60.0;

/// Total pattern penalty never exceeds this.
pub const PATTERN_PENALTY_CAP: f64 = 20.0;

/// Applied on top of, and independently from, the capped pattern penalty.
pub const COMMON_PASSWORD_PENALTY: f64 = 40.0;

/// Penalty per pattern kind present, regardless of occurrences.
pub fn pattern_weight(kind: PatternKind) -> f64 {
    match kind {
        PatternKind::Sequence => 5.0,
        PatternKind::KeyboardWalk => 6.0,
        PatternKind::Repeat => 5.0,
        PatternKind::Date => 4.0,
        PatternKind::DictionaryWord => 5.0,
        PatternKind::Leetspeak => 5.0,
        PatternKind::Contextual => 4.0,
        // scored by the common-password section
        PatternKind::CommonPassword => 0.0,
    }
}

/// What a section may look at. Holds no plaintext.
#[derive(Debug, Clone, Copy)]
pub struct SectionInput<'a> {
    pub profile: &'a CharProfile,
    pub entropy: &'a EntropyMeasures,
    pub patterns: &'a PatternReport,
    pub is_common: bool,
}

/// Points contributed by one section; penalties are negative.
pub type SectionScore = f64;
