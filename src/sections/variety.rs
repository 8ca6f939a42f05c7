//! Character variety section - credit for uppercase, lowercase, digits, symbols.

use super::{SectionInput, SectionScore, VARIETY_MAX_POINTS};

pub fn character_variety_section(input: &SectionInput<'_>) -> SectionScore {
    VARIETY_MAX_POINTS * input.profile.classes_present() as f64 / 4.0
}
