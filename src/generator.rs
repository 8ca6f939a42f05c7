//! Random password generation.

use rand::seq::{IndexedRandom, SliceRandom};
use secrecy::SecretString;

use crate::error::GeneratorError;

pub const MIN_LENGTH: usize = 4;
pub const MAX_COUNT: usize = 100;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: 16,
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
        }
    }
}

impl GeneratorOptions {
    fn classes(&self) -> Vec<&'static [u8]> {
        [
            (self.lowercase, LOWERCASE),
            (self.uppercase, UPPERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter_map(|(enabled, class)| enabled.then_some(class))
        .collect()
    }
}

/// Generates one password with at least one character of every enabled class.
///
/// Uses the thread-local CSPRNG.
pub fn generate_password(options: &GeneratorOptions) -> Result<SecretString, GeneratorError> {
    if options.length < MIN_LENGTH {
        return Err(GeneratorError::TooShort { min: MIN_LENGTH });
    }
    let classes = options.classes();
    if classes.is_empty() {
        return Err(GeneratorError::NoCharacterClasses);
    }

    let pool: Vec<u8> = classes.concat();
    let mut rng = rand::rng();

    // MIN_LENGTH covers one pick from each of the four classes
    let mut chars: Vec<u8> = classes
        .iter()
        .filter_map(|class| class.choose(&mut rng).copied())
        .collect();
    while chars.len() < options.length {
        if let Some(&c) = pool.choose(&mut rng) {
            chars.push(c);
        }
    }
    chars.shuffle(&mut rng);

    Ok(SecretString::from(
        chars.into_iter().map(char::from).collect::<String>(),
    ))
}

/// Generates `count` passwords, `1..=MAX_COUNT`.
pub fn generate_passwords(
    count: usize,
    options: &GeneratorOptions,
) -> Result<Vec<SecretString>, GeneratorError> {
    if !(1..=MAX_COUNT).contains(&count) {
        return Err(GeneratorError::InvalidCount { max: MAX_COUNT });
    }
    (0..count).map(|_| generate_password(options)).collect()
}
