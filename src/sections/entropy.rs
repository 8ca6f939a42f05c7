//! Entropy section - credit for Shannon entropy.

use super::{ENTROPY_MAX_POINTS, ENTROPY_SATURATION_BITS, SectionInput, SectionScore};

pub fn entropy_section(input: &SectionInput<'_>) -> SectionScore {
    let bits = input.entropy.shannon_bits.clamp(0.0, ENTROPY_SATURATION_BITS);
    ENTROPY_MAX_POINTS * bits / ENTROPY_SATURATION_BITS
}
