//! Common-password section - heavy penalty for known-weak passwords.

use super::{COMMON_PASSWORD_PENALTY, SectionInput, SectionScore};

/// Independent of every other section: a listed password stays unsafe
/// whatever its apparent entropy.
pub fn common_password_section(input: &SectionInput<'_>) -> SectionScore {
    if input.is_common {
        -COMMON_PASSWORD_PENALTY
    } else {
        0.0
    }
}
