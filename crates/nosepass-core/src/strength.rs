//! Informational strength estimate for a schema.

use crate::schema::Schema;

/// Below this many bits a schema is weak.
pub const MODERATE_BITS: f64 = 92.0;

/// At or above this many bits a schema is strong.
pub const STRONG_BITS: f64 = 128.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthClass {
    Weak,
    Moderate,
    Strong,
}

/// Entropy of a generated password, assuming a secret master passphrase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strength {
    pub bits: f64,
    pub class: StrengthClass,
}

impl Strength {
    /// `count * log2(alphabet_size)`.
    pub fn estimate(count: usize, alphabet_size: usize) -> Self {
        let bits = count as f64 * (alphabet_size as f64).log2();
        let class = if bits >= STRONG_BITS {
            StrengthClass::Strong
        } else if bits >= MODERATE_BITS {
            StrengthClass::Moderate
        } else {
            StrengthClass::Weak
        };
        Self { bits, class }
    }

    pub fn of(schema: &Schema) -> Self {
        Self::estimate(schema.count(), schema.alphabet().len())
    }
}
