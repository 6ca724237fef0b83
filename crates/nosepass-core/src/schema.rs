//! The resolved per-site generation policy.
//!
//! A [`Schema`] starts from compiled-in defaults and is overridden field by
//! field by the config parser: first by `default` entries, then by entries
//! named after the site. Once resolved it is only read.

use std::fmt;

use crate::charset::Alphabet;
use crate::error::{NosepassError, Result};

/// Characters generated when no entry sets `count=`.
pub const DEFAULT_COUNT: usize = 20;

/// KDF rounds used when no entry sets a cost.
pub const DEFAULT_ROUNDS: u32 = 200;

/// Upper bound for `count=`.
pub const MAX_COUNT: usize = 1024;

/// Bounds for the logarithmic `work=` cost.
pub const MIN_WORK: u8 = 4;
pub const MAX_WORK: u8 = 31;

/// KDF work factor.
///
/// `rounds=` gives the bcrypt-pbkdf round count directly; `work=` is a
/// logarithmic factor (see [`Cost::kdf_rounds`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cost {
    Rounds(u32),
    Work(u8),
}

impl Cost {
    /// Validated round count.
    pub fn rounds(value: u64) -> Result<Self> {
        if value < 1 {
            return Err(NosepassError::SchemaConstraint(
                "number of rounds must be at least 1".to_string(),
            ));
        }
        let rounds = u32::try_from(value).map_err(|_| {
            NosepassError::SchemaConstraint(format!(
                "number of rounds must be at most {}",
                u32::MAX
            ))
        })?;
        Ok(Cost::Rounds(rounds))
    }

    /// Validated logarithmic work factor.
    pub fn work(value: u64) -> Result<Self> {
        match u8::try_from(value) {
            Ok(work) if (MIN_WORK..=MAX_WORK).contains(&work) => Ok(Cost::Work(work)),
            _ => Err(NosepassError::SchemaConstraint(format!(
                "work factor must be between {} and {}",
                MIN_WORK, MAX_WORK
            ))),
        }
    }

    /// Number of bcrypt-pbkdf rounds this cost stands for.
    ///
    /// A work factor `w` doubles the rounds per step, starting from a single
    /// round at the minimum: `2^(w - 4)`.
    pub fn kdf_rounds(self) -> u32 {
        match self {
            Cost::Rounds(rounds) => rounds,
            Cost::Work(work) => 1u32 << (work - MIN_WORK),
        }
    }
}

impl Default for Cost {
    fn default() -> Self {
        Cost::Rounds(DEFAULT_ROUNDS)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Rounds(rounds) => write!(f, "rounds={}", rounds),
            Cost::Work(work) => write!(f, "work={}", work),
        }
    }
}

/// Resolved generation policy for one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    count: usize,
    cost: Cost,
    increment: u64,
    alphabet: Alphabet,
}

impl Schema {
    /// Number of characters to generate.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Nonce disambiguator; bump it to rotate a site's password.
    pub fn increment(&self) -> u64 {
        self.increment
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Set the output length, enforcing `1..=MAX_COUNT`.
    pub fn set_count(&mut self, count: u64) -> Result<()> {
        if count == 0 {
            return Err(NosepassError::SchemaConstraint(
                "character count must be greater than 0".to_string(),
            ));
        }
        match usize::try_from(count) {
            Ok(count) if count <= MAX_COUNT => {
                self.count = count;
                Ok(())
            }
            _ => Err(NosepassError::SchemaConstraint(format!(
                "character count must be at most {}",
                MAX_COUNT
            ))),
        }
    }

    pub fn set_cost(&mut self, cost: Cost) {
        self.cost = cost;
    }

    pub fn set_increment(&mut self, increment: u64) {
        self.increment = increment;
    }

    pub fn set_alphabet(&mut self, alphabet: Alphabet) {
        self.alphabet = alphabet;
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            cost: Cost::default(),
            increment: 0,
            alphabet: Alphabet::default(),
        }
    }
}
