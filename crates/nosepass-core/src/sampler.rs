//! Keystream expansion and rejection sampling.
//!
//! The derived secret keys ChaCha20 (the legacy 64-bit nonce variant), with
//! the schema's increment as the nonce. Keystream bytes are masked to
//! the smallest all-ones bit pattern that covers every alphabet index; a
//! masked byte that lands past the end of the alphabet is discarded rather
//! than reduced, so every emitted character is exactly uniform over the
//! alphabet.

use std::fmt;

use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::{ChaCha20Legacy, Key, LegacyNonce};
use log::trace;
use zeroize::Zeroizing;

use crate::charset::Alphabet;
use crate::kdf::SecretKey;

/// Size of one ChaCha20 keystream block.
pub const BLOCK_LENGTH: usize = 64;

/// Smallest value of the form `2^k - 1` that is at least `size - 1`.
///
/// Masking a uniform byte with this keeps every alphabet index reachable
/// while rejecting fewer than half of all draws. Valid for `size` in
/// `2..=256`.
///
/// Power-of-two sizes get the tight mask `size - 1`. Generators that
/// compute the mask from `size` itself use `2 * size - 1` there, so
/// passwords over alphabets of 2, 4, 8, 16, 32 or 64 symbols will not match
/// theirs.
///
/// ```
/// use nosepass_core::sampler::mask_for;
///
/// assert_eq!(mask_for(2), 1);
/// assert_eq!(mask_for(21), 31);
/// assert_eq!(mask_for(32), 31);
/// assert_eq!(mask_for(95), 127);
/// ```
pub fn mask_for(size: usize) -> u8 {
    debug_assert!((2..=256).contains(&size));
    let mut mask = size.saturating_sub(1);
    mask |= mask >> 1;
    mask |= mask >> 2;
    mask |= mask >> 4;
    mask as u8
}

/// Encode the increment as the 8-byte keystream nonce, least significant
/// byte first.
pub fn nonce_for(increment: u64) -> [u8; 8] {
    increment.to_le_bytes()
}

/// A generated password. The buffer is wiped on drop.
pub struct Password {
    bytes: Zeroizing<Vec<u8>>,
}

impl Password {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Every byte is drawn from an ASCII alphabet, so this never fails.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Password")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Uniform character source over one alphabet.
pub struct Sampler<'a> {
    cipher: ChaCha20Legacy,
    alphabet: &'a Alphabet,
    mask: u8,
    block: Zeroizing<[u8; BLOCK_LENGTH]>,
    position: usize,
    drawn: u64,
}

impl<'a> Sampler<'a> {
    /// Key the keystream from `key` and `increment`.
    pub fn new(key: &SecretKey, increment: u64, alphabet: &'a Alphabet) -> Self {
        let nonce = nonce_for(increment);
        let cipher = ChaCha20Legacy::new(
            Key::from_slice(key.as_bytes()),
            LegacyNonce::from_slice(&nonce),
        );
        Self {
            cipher,
            alphabet,
            mask: mask_for(alphabet.len()),
            block: Zeroizing::new([0u8; BLOCK_LENGTH]),
            position: BLOCK_LENGTH,
            drawn: 0,
        }
    }

    /// Next raw keystream byte, refilling the block when it runs out.
    fn next_byte(&mut self) -> u8 {
        if self.position == BLOCK_LENGTH {
            self.block.fill(0);
            self.cipher.apply_keystream(&mut self.block[..]);
            self.position = 0;
        }
        let byte = self.block[self.position];
        self.position += 1;
        self.drawn += 1;
        byte
    }

    /// Next accepted alphabet symbol.
    pub fn next_symbol(&mut self) -> u8 {
        loop {
            let candidate = usize::from(self.next_byte() & self.mask);
            if let Some(symbol) = self.alphabet.get(candidate) {
                return symbol;
            }
        }
    }

    /// Produce exactly `count` symbols.
    pub fn take(mut self, count: usize) -> Password {
        let mut bytes = Zeroizing::new(Vec::with_capacity(count));
        for _ in 0..count {
            bytes.push(self.next_symbol());
        }
        trace!(
            "emitted {} characters from {} keystream bytes",
            count,
            self.drawn
        );
        Password { bytes }
    }

    /// Keystream bytes consumed so far, accepted or not.
    pub fn drawn(&self) -> u64 {
        self.drawn
    }
}

/// Expand `key` into `count` characters of `alphabet`.
pub fn generate(key: &SecretKey, increment: u64, alphabet: &Alphabet, count: usize) -> Password {
    Sampler::new(key, increment, alphabet).take(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_key() -> SecretKey {
        SecretKey::from_bytes([0u8; 32])
    }

    fn alphabet(declaration: &str) -> Alphabet {
        Alphabet::compile(declaration).expect("test alphabet should compile")
    }

    #[test]
    fn test_mask_for_every_alphabet_size() {
        for size in 2..=95usize {
            let mask = usize::from(mask_for(size));
            assert!(mask >= size - 1, "mask {} too small for {}", mask, size);
            assert!((mask + 1).is_power_of_two());
            // Smallest such mask: halving it would no longer cover size - 1
            assert!(mask / 2 < size - 1, "mask {} not minimal for {}", mask, size);
        }
    }

    #[test]
    fn test_power_of_two_sizes_use_tight_mask() {
        for (size, mask) in [(2, 1), (4, 3), (8, 7), (16, 15), (32, 31), (64, 63)] {
            assert_eq!(mask_for(size), mask);
        }
        // One past a power of two needs the next bit
        assert_eq!(mask_for(33), 63);
    }

    #[test]
    fn test_nonce_is_little_endian() {
        assert_eq!(nonce_for(0), [0u8; 8]);
        assert_eq!(nonce_for(1), [1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            nonce_for(0x0102_0304_0506_0708),
            [8, 7, 6, 5, 4, 3, 2, 1]
        );
    }

    #[test]
    fn test_zero_key_keystream() {
        // ChaCha20 block 0 for an all-zero key and nonce
        let expected = hex::decode(
            "76b8e0ada0f13d90405d6ae55386bd28bdd219b8a08ded1aa836efcc8b770dc7\
             da41597c5157488d7724e03fb8d84a376a43b8f41518a11cc387b669b2ee6586",
        )
        .unwrap();

        let key = zero_key();
        let nonce = nonce_for(0);
        let mut cipher =
            ChaCha20Legacy::new(Key::from_slice(key.as_bytes()), LegacyNonce::from_slice(&nonce));
        let mut block = [0u8; BLOCK_LENGTH];
        cipher.apply_keystream(&mut block);
        assert_eq!(block.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_known_answer_without_rejection() {
        // Low bit of each keystream byte: 76 b8 e0 ad a0 f1 3d 90
        let ab = alphabet("ab");
        let password = generate(&zero_key(), 0, &ab, 8);
        assert_eq!(password.as_str(), "aaababba");
    }

    #[test]
    fn test_known_answer_with_rejection() {
        // 0x53 & 3 == 3 is past the end of "abc" and gets discarded
        let abc = alphabet("abc");
        let mut sampler = Sampler::new(&zero_key(), 0, &abc);
        let symbols: Vec<u8> = (0..13).map(|_| sampler.next_symbol()).collect();
        assert_eq!(symbols, b"caababbaabcbc");
        assert_eq!(sampler.drawn(), 14);
    }

    #[test]
    fn test_exact_count() {
        let abc = alphabet("a-c");
        for count in [1, 2, 63, 64, 65, 1024] {
            assert_eq!(generate(&zero_key(), 0, &abc, count).len(), count);
        }
    }

    #[test]
    fn test_containment() {
        let digits = alphabet("0-9");
        let password = generate(&SecretKey::from_bytes([7u8; 32]), 3, &digits, 1024);
        assert!(password.as_bytes().iter().all(|&b| digits.contains(b)));
    }

    #[test]
    fn test_increment_changes_output() {
        let key = SecretKey::from_bytes([42u8; 32]);
        let full = Alphabet::default();
        let first = generate(&key, 0, &full, 32);
        let second = generate(&key, 1, &full, 32);
        assert_ne!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_same_inputs_same_output() {
        let key = SecretKey::from_bytes([42u8; 32]);
        let full = Alphabet::default();
        let first = generate(&key, 9, &full, 64);
        let second = generate(&key, 9, &full, 64);
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_uniform_over_non_power_of_two_alphabet() {
        let twenty_one = alphabet("a-u");
        assert_eq!(twenty_one.len(), 21);
        assert_eq!(mask_for(21), 31);

        let samples = 21_000usize;
        let mut sampler = Sampler::new(&SecretKey::from_bytes([0x5a; 32]), 0, &twenty_one);
        let mut counts = [0usize; 21];
        for _ in 0..samples {
            let symbol = sampler.next_symbol();
            counts[usize::from(symbol - b'a')] += 1;
        }

        // Chi-square with 20 degrees of freedom; 60 is far past p = 0.0001
        let expected = samples as f64 / 21.0;
        let chi_square: f64 = counts
            .iter()
            .map(|&observed| {
                let delta = observed as f64 - expected;
                delta * delta / expected
            })
            .sum();
        assert!(chi_square < 60.0, "chi-square {} too large: {:?}", chi_square, counts);

        // Acceptance rate approaches 21/32
        let acceptance = samples as f64 / sampler.drawn() as f64;
        assert!(
            (acceptance - 21.0 / 32.0).abs() < 0.02,
            "acceptance rate {} far from 21/32",
            acceptance
        );
    }

    #[test]
    fn test_password_debug_redacts() {
        let password = generate(&zero_key(), 0, &alphabet("ab"), 8);
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("aaababba"));
    }
}
