//! Leetspeak folding.
//!
//! Substitutions are ASCII to ASCII, so a folded variant has the same byte
//! layout as the original and match offsets carry over unchanged.

/// Stand-ins and the letters they may represent, most likely first.
const SUBSTITUTIONS: &[(char, &[char])] = &[
    ('0', &['o']),
    ('1', &['i', 'l']),
    ('!', &['i']),
    ('|', &['l']),
    ('3', &['e']),
    ('4', &['a']),
    ('@', &['a']),
    ('5', &['s']),
    ('$', &['s']),
    ('7', &['t']),
    ('+', &['t']),
    ('8', &['b']),
    ('9', &['g']),
    ('6', &['g']),
    ('2', &['z']),
    ('(', &['c']),
];

fn readings(c: char) -> Option<&'static [char]> {
    SUBSTITUTIONS
        .iter()
        .find(|(stand_in, _)| *stand_in == c)
        .map(|(_, letters)| *letters)
}

pub fn is_stand_in(c: char) -> bool {
    readings(c).is_some()
}

/// Lowercased variants with stand-ins replaced. The first uses the primary
/// reading of every stand-in; a second is added when some stand-in has an
/// alternative reading (`1` as `l`). Empty when nothing was substituted.
pub fn normalize(password: &str) -> Vec<String> {
    if !password.chars().any(is_stand_in) {
        return Vec::new();
    }

    let max_readings = password
        .chars()
        .filter_map(readings)
        .map(<[char]>::len)
        .max()
        .unwrap_or(1);

    (0..max_readings)
        .map(|variant| {
            password
                .chars()
                .map(|c| match readings(c) {
                    Some(letters) => letters[variant.min(letters.len() - 1)],
                    None => c.to_ascii_lowercase(),
                })
                .collect()
        })
        .collect()
}
