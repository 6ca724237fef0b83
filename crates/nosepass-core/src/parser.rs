//! Line-oriented schema config parser.
//!
//! Each line of the config is either a comment (empty, or starting with
//! `#`) or an entry:
//!
//! ```text
//! <name> key=value key=value ...
//! ```
//!
//! Recognized keys are `count=`, `set=`, `rounds=`, `work=` and
//! `increment=`. A line consisting of just the name is an entry with no
//! fields. Within one line each field may be set once; `rounds=` and
//! `work=` share the cost field. Across lines, later assignments overwrite
//! earlier ones.

use log::debug;

use crate::charset::Alphabet;
use crate::error::{NosepassError, Result};
use crate::schema::{Cost, Schema};

/// Name of the entry applied to every site before its own entries.
pub const DEFAULT_ENTRY: &str = "default";

/// Longest accepted config line, not counting the newline.
pub const MAX_LINE_LENGTH: usize = 1022;

const PREFIX_COUNT: &[u8] = b"count=";
const PREFIX_SET: &[u8] = b"set=";
const PREFIX_ROUNDS: &[u8] = b"rounds=";
const PREFIX_WORK: &[u8] = b"work=";
const PREFIX_INCREMENT: &[u8] = b"increment=";

/// Resolve the schema for `site`: built-in defaults, then every `default`
/// entry, then every entry named `site`.
///
/// # Examples
///
/// ```
/// use nosepass_core::parser::resolve;
///
/// let config = b"default count=8 set=a-c rounds=4\nexample count=12\n";
/// let schema = resolve(config, "example").unwrap();
/// assert_eq!(schema.count(), 12);
/// assert_eq!(schema.alphabet().as_str(), "abc");
/// ```
pub fn resolve(config: &[u8], site: &str) -> Result<Schema> {
    let mut schema = Schema::default();
    apply_entries(config, DEFAULT_ENTRY, &mut schema)?;
    apply_entries(config, site, &mut schema)?;
    Ok(schema)
}

/// Apply every entry named `name` to `schema`, scanning the whole config.
///
/// Returns the number of matching entry lines.
pub fn apply_entries(config: &[u8], name: &str, schema: &mut Schema) -> Result<usize> {
    if name.is_empty() {
        return Err(NosepassError::InvalidInput(
            "entry name must not be empty".to_string(),
        ));
    }

    let mut matched = 0;
    for (index, line) in config.split(|&b| b == b'\n').enumerate() {
        let line_number = index + 1;

        if line.len() > MAX_LINE_LENGTH {
            return Err(NosepassError::ConfigSyntax(format!(
                "configuration line too long; limit is {} characters",
                MAX_LINE_LENGTH
            ))
            .at_line(line_number));
        }

        if line.is_empty() || line[0] == b'#' {
            continue;
        }

        let Some(body) = line.strip_prefix(name.as_bytes()) else {
            continue;
        };

        match body.first() {
            None => {}
            Some(b' ') => parse_entry(body, schema).map_err(|e| e.at_line(line_number))?,
            Some(_) => continue,
        }
        matched += 1;
    }

    debug!(
        "applied {} config entr{} for '{}'",
        matched,
        if matched == 1 { "y" } else { "ies" },
        name
    );
    Ok(matched)
}

/// Fields already assigned by the current entry line.
#[derive(Default)]
struct Assigned {
    count: bool,
    set: bool,
    cost: bool,
    increment: bool,
}

impl Assigned {
    fn claim(flag: &mut bool, what: &str) -> Result<()> {
        if *flag {
            return Err(syntax(format!("multiple settings for {}", what)));
        }
        *flag = true;
        Ok(())
    }
}

/// Parse the ` key=value` items after an entry name.
fn parse_entry(body: &[u8], schema: &mut Schema) -> Result<()> {
    let mut assigned = Assigned::default();
    let mut rest = body;

    while let Some((&separator, item)) = rest.split_first() {
        if separator != b' ' {
            return Err(syntax(format!(
                "expected space, but found '{}' instead",
                lossy(rest)
            )));
        }

        rest = if let Some(value) = item.strip_prefix(PREFIX_COUNT) {
            Assigned::claim(&mut assigned.count, "character count")?;
            let (count, remaining) = parse_number(value)
                .ok_or_else(|| syntax(format!("expected count, but found '{}' instead", lossy(item))))?;
            schema.set_count(count)?;
            remaining
        } else if let Some(value) = item.strip_prefix(PREFIX_SET) {
            Assigned::claim(&mut assigned.set, "character set")?;
            let (alphabet, remaining) = Alphabet::parse_prefix(value)?;
            schema.set_alphabet(alphabet);
            remaining
        } else if let Some(value) = item.strip_prefix(PREFIX_ROUNDS) {
            Assigned::claim(&mut assigned.cost, "rounds or work factor")?;
            let (rounds, remaining) = parse_number(value).ok_or_else(|| {
                syntax(format!("expected number of rounds, but found '{}' instead", lossy(item)))
            })?;
            schema.set_cost(Cost::rounds(rounds)?);
            remaining
        } else if let Some(value) = item.strip_prefix(PREFIX_WORK) {
            Assigned::claim(&mut assigned.cost, "rounds or work factor")?;
            let (work, remaining) = parse_number(value).ok_or_else(|| {
                syntax(format!("expected work factor, but found '{}' instead", lossy(item)))
            })?;
            schema.set_cost(Cost::work(work)?);
            remaining
        } else if let Some(value) = item.strip_prefix(PREFIX_INCREMENT) {
            Assigned::claim(&mut assigned.increment, "increment")?;
            let (increment, remaining) = parse_number(value).ok_or_else(|| {
                syntax(format!("expected increment, but found '{}' instead", lossy(item)))
            })?;
            schema.set_increment(increment);
            remaining
        } else {
            return Err(syntax(format!(
                "expected one of count=, set=, rounds=, work=, or increment=, but found '{}' instead",
                lossy(item)
            )));
        };
    }

    Ok(())
}

/// Parse a run of decimal digits ending at a space or end of input.
///
/// Returns `None` for an empty run, a non-digit, or a value past `u64::MAX`.
fn parse_number(input: &[u8]) -> Option<(u64, &[u8])> {
    let end = input.iter().position(|&b| b == b' ').unwrap_or(input.len());
    let (digits, remaining) = input.split_at(end);
    if digits.is_empty() {
        return None;
    }

    let mut value: u64 = 0;
    for &digit in digits {
        if !digit.is_ascii_digit() {
            return None;
        }
        value = value
            .checked_mul(10)?
            .checked_add(u64::from(digit - b'0'))?;
    }
    Some((value, remaining))
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn syntax(message: String) -> NosepassError {
    NosepassError::ConfigSyntax(message)
}
