//! Strength banner rendering.

use nosepass_core::{Strength, StrengthClass};
use owo_colors::OwoColorize;

/// Bullet shown before the strength estimate.
const BULLET: &str = "\u{25CF}"; // ●

/// Render the strength line shown before the passphrase prompt.
pub fn render_strength(strength: &Strength, color: bool) -> String {
    let bullet = if color {
        match strength.class {
            StrengthClass::Strong => BULLET.green().to_string(),
            StrengthClass::Moderate => BULLET.yellow().to_string(),
            StrengthClass::Weak => BULLET.red().to_string(),
        }
    } else {
        BULLET.to_string()
    };
    format!(
        "{} generating password equivalent to {:.0} bits",
        bullet, strength.bits
    )
}
