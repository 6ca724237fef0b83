//! Character-set compiler for the `set=` schema field.
//!
//! A set declaration is a run of contiguous tokens:
//!
//! - a printable ASCII character, taken literally
//! - `\x`, the character after the backslash taken literally (how a space,
//!   a backslash, or a hyphen becomes an ordinary member)
//! - `a-b`, every character from `a` through `b` inclusive, where `a` is the
//!   preceding literal or escaped character and `b` is a literal or escaped
//!   character
//!
//! The declaration ends at the first unescaped space or at end of input.
//! Duplicates collapse, and the compiled [`Alphabet`] is always ascending.

use std::fmt;

use crate::error::{NosepassError, Result};

const FIRST_PRINTABLE: u8 = b' ';
const LAST_PRINTABLE: u8 = b'~';

/// Number of printable ASCII characters (0x20 through 0x7e).
pub const PRINTABLE_COUNT: usize = (LAST_PRINTABLE - FIRST_PRINTABLE + 1) as usize;

/// Smallest alphabet that can carry any entropy.
pub const MIN_ALPHABET_SIZE: usize = 2;

/// An ordered set of unique printable ASCII symbols, at least two long.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: String,
}

impl Alphabet {
    /// Compile a complete set declaration.
    ///
    /// Unlike [`Alphabet::parse_prefix`], an unescaped space is not a
    /// terminator here; anything left after the declaration is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use nosepass_core::Alphabet;
    ///
    /// let alphabet = Alphabet::compile("a-f0-9").unwrap();
    /// assert_eq!(alphabet.as_str(), "0123456789abcdef");
    /// ```
    pub fn compile(declaration: &str) -> Result<Self> {
        let (alphabet, rest) = Self::parse_prefix(declaration.as_bytes())?;
        if !rest.is_empty() {
            return Err(NosepassError::ConfigSyntax(format!(
                "unexpected '{}' after character set",
                String::from_utf8_lossy(rest)
            )));
        }
        Ok(alphabet)
    }

    /// Compile the declaration at the start of `input`.
    ///
    /// Returns the alphabet and the unconsumed remainder, which is either
    /// empty or starts with the space that ended the declaration.
    pub fn parse_prefix(input: &[u8]) -> Result<(Self, &[u8])> {
        let mut table = PresenceTable::default();
        let mut last: Option<u8> = None;
        let mut pos = 0;

        while let Some(&c) = input.get(pos) {
            match c {
                b' ' => break,
                b'\\' => {
                    let escaped = input.get(pos + 1).copied().ok_or_else(|| {
                        syntax("expected escaped character, but found end of line")
                    })?;
                    table.mark(escaped)?;
                    last = Some(escaped);
                    pos += 2;
                }
                b'-' => {
                    let start = last
                        .take()
                        .ok_or_else(|| syntax("found hyphen range with no starting character"))?;
                    let (end, width) = match input.get(pos + 1) {
                        Some(b'\\') => match input.get(pos + 2) {
                            Some(&end) => (end, 3),
                            None => return Err(missing_range_end()),
                        },
                        Some(b' ') | None => return Err(missing_range_end()),
                        Some(&end) => (end, 2),
                    };
                    ensure_printable(end)?;
                    if end < start {
                        return Err(syntax(format!(
                            "empty range {}-{}",
                            char::from(start),
                            char::from(end)
                        )));
                    }
                    table.mark_range(start, end);
                    pos += width;
                }
                _ => {
                    table.mark(c)?;
                    last = Some(c);
                    pos += 1;
                }
            }
        }

        Ok((table.into_alphabet()?, &input[pos..]))
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a compiled alphabet; present for API completeness.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol at `index` in ascending order.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.symbols.as_bytes().get(index).copied()
    }

    /// Whether `symbol` is a member.
    pub fn contains(&self, symbol: u8) -> bool {
        self.symbols.as_bytes().binary_search(&symbol).is_ok()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.symbols.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.symbols
    }
}

impl Default for Alphabet {
    /// Every printable character except space.
    fn default() -> Self {
        Self {
            symbols: (FIRST_PRINTABLE + 1..=LAST_PRINTABLE).map(char::from).collect(),
        }
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Alphabet").field(&self.symbols).finish()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbols)
    }
}

/// One slot per printable character.
struct PresenceTable {
    slots: [bool; PRINTABLE_COUNT],
}

impl Default for PresenceTable {
    fn default() -> Self {
        Self {
            slots: [false; PRINTABLE_COUNT],
        }
    }
}

impl PresenceTable {
    fn mark(&mut self, symbol: u8) -> Result<()> {
        ensure_printable(symbol)?;
        self.slots[usize::from(symbol - FIRST_PRINTABLE)] = true;
        Ok(())
    }

    /// Both ends must already be printable and ordered.
    fn mark_range(&mut self, start: u8, end: u8) {
        for symbol in start..=end {
            self.slots[usize::from(symbol - FIRST_PRINTABLE)] = true;
        }
    }

    fn into_alphabet(self) -> Result<Alphabet> {
        let symbols: String = self
            .slots
            .iter()
            .zip(FIRST_PRINTABLE..=LAST_PRINTABLE)
            .filter(|(present, _)| **present)
            .map(|(_, symbol)| char::from(symbol))
            .collect();

        if symbols.len() < MIN_ALPHABET_SIZE {
            return Err(NosepassError::SchemaConstraint(
                "character set must contain at least two characters".to_string(),
            ));
        }

        Ok(Alphabet { symbols })
    }
}

fn ensure_printable(symbol: u8) -> Result<()> {
    if (FIRST_PRINTABLE..=LAST_PRINTABLE).contains(&symbol) {
        Ok(())
    } else {
        Err(syntax(format!(
            "expected printable ASCII but found '\\x{:02x}' instead",
            symbol
        )))
    }
}

fn missing_range_end() -> NosepassError {
    syntax("found hyphen range with no ending character")
}

fn syntax(message: impl Into<String>) -> NosepassError {
    NosepassError::ConfigSyntax(message.into())
}
