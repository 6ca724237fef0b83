//! Master passphrase checks.
//!
//! The passphrase is never stored, so the only checks are the ones that
//! would otherwise silently change the derived key: an empty entry, or one
//! long enough that a fixed-size reader would have truncated it.

use secrecy::{ExposeSecret, SecretSlice};

use crate::error::{NosepassError, Result};

/// Longest accepted passphrase, in bytes. Any byte values are allowed.
pub const MAX_PASSPHRASE_LENGTH: usize = 1022;

/// Validate a passphrase before derivation.
///
/// # Examples
///
/// ```
/// use nosepass_core::passphrase::validate_passphrase;
/// use secrecy::SecretSlice;
///
/// assert!(validate_passphrase(&SecretSlice::from(b"correcthorse".to_vec())).is_ok());
/// assert!(validate_passphrase(&SecretSlice::from(Vec::new())).is_err());
/// ```
pub fn validate_passphrase(passphrase: &SecretSlice<u8>) -> Result<()> {
    let length = passphrase.expose_secret().len();

    if length == 0 {
        return Err(NosepassError::InputIo("a password is required".to_string()));
    }

    if length > MAX_PASSPHRASE_LENGTH {
        return Err(NosepassError::InputIo(format!(
            "the maximum password length is {} characters",
            MAX_PASSPHRASE_LENGTH
        )));
    }

    Ok(())
}
