//! Length section - credit for password length.

use super::{AMPLE_LENGTH, LENGTH_MAX_POINTS, SectionInput, SectionScore};

pub fn length_section(input: &SectionInput<'_>) -> SectionScore {
    let length = input.profile.length.min(AMPLE_LENGTH);
    LENGTH_MAX_POINTS * length as f64 / AMPLE_LENGTH as f64
}
