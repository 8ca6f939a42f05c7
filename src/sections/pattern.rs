//! Pattern section - penalty for detected weakness categories.

use super::{PATTERN_PENALTY_CAP, SectionInput, SectionScore, pattern_weight};

/// One fixed penalty per kind present, capped in total.
pub fn pattern_penalty_section(input: &SectionInput<'_>) -> SectionScore {
    let penalty: f64 = input.patterns.kinds().map(pattern_weight).sum();
    -penalty.min(PATTERN_PENALTY_CAP)
}
