//! Obfuscation, verification and password-quality primitives.
//!
//! Neither transform here is real cryptography. The keyed transform is a
//! single-byte XOR and the verification "hash" is trivially reversible; both
//! are kept because the on-disk format and every stored token depend on them.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::fmt;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!@#$%^&*()-_=+[]{};:,.<>?";

/// Shortest password `generate_password` will produce.
pub const MIN_GENERATED_LEN: usize = 8;

/// Longest password `generate_password` will produce.
pub const MAX_GENERATED_LEN: usize = 1024;

/// Bytes `generate_key` draws from. Every one is a plain shell word.
pub const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Highest value `score_strength` can return.
pub const MAX_STRENGTH: u8 = 7;

/// XORs every byte of `data` with `key`.
///
/// Applying it twice with the same key yields the input again, so the same
/// function both protects and reveals a payload.
pub fn confidentiality_transform(data: &[u8], key: u8) -> Vec<u8> {
    data.iter().map(|b| b ^ key).collect()
}

/// Reverses `text` and shifts every character up by one code point.
///
/// A character with no valid successor (the end of the surrogate gap or
/// `char::MAX`) is kept as is.
pub fn integrity_transform(text: &str) -> String {
    text.chars()
        .rev()
        .map(|c| char::from_u32(c as u32 + 1).unwrap_or(c))
        .collect()
}

/// Scores a password from 0 to 7 based on length and character classes.
///
/// Two length bonuses and four class bonuses top out at 6, so the clamp only
/// guards the documented range.
pub fn score_strength(plaintext: &str) -> u8 {
    let len = plaintext.chars().count();
    let mut score = 0u8;
    if len >= 8 {
        score += 1;
    }
    if len >= 12 {
        score += 1;
    }

    let (mut upper, mut lower, mut digit, mut other) = (false, false, false, false);
    for c in plaintext.chars() {
        if c.is_uppercase() {
            upper = true;
        } else if c.is_lowercase() {
            lower = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else {
            other = true;
        }
    }
    score += [upper, lower, digit, other].iter().filter(|&&b| b).count() as u8;

    score.min(MAX_STRENGTH)
}

/// Coarse strength bucket shown next to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLevel {
    Weak,
    Good,
    Strong,
}

impl fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrengthLevel::Weak => "Weak",
            StrengthLevel::Good => "Good",
            StrengthLevel::Strong => "Strong",
        };
        f.write_str(s)
    }
}

pub fn classify_strength(score: u8) -> StrengthLevel {
    if score >= 7 {
        StrengthLevel::Strong
    } else if score >= 5 {
        StrengthLevel::Good
    } else {
        StrengthLevel::Weak
    }
}

/// Generates a password of `length` characters (8 to 1024) using the thread RNG.
pub fn generate_password(length: usize) -> String {
    generate_password_with(length, &mut rand::rng())
}

/// Generates a password containing at least one uppercase letter, lowercase
/// letter, digit and special character.
pub fn generate_password_with<R: Rng + ?Sized>(length: usize, rng: &mut R) -> String {
    let length = length.clamp(MIN_GENERATED_LEN, MAX_GENERATED_LEN);
    let all: Vec<u8> = [UPPER, LOWER, DIGITS, SPECIAL].concat();

    let mut bytes = Vec::with_capacity(length);
    for class in [UPPER, LOWER, DIGITS, SPECIAL] {
        if let Some(&b) = class.choose(rng) {
            bytes.push(b);
        }
    }
    while bytes.len() < length {
        if let Some(&b) = all.choose(rng) {
            bytes.push(b);
        }
    }
    bytes.shuffle(rng);

    bytes.into_iter().map(char::from).collect()
}

/// Picks a key byte from `KEY_ALPHABET`.
pub fn generate_key() -> u8 {
    generate_key_with(&mut rand::rng())
}

pub fn generate_key_with<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    KEY_ALPHABET[rng.random_range(0..KEY_ALPHABET.len())]
}
