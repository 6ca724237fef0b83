//! Key derivation using bcrypt-pbkdf.
//!
//! The master passphrase is stretched into a 32-byte secret, salted with
//! the site name. The derivation is deliberately slow; the schema's cost is
//! the only knob, and it is fixed by the config file.

use log::debug;
use secrecy::{ExposeSecret, SecretSlice};
use zeroize::ZeroizeOnDrop;

use crate::error::{NosepassError, Result};
use crate::schema::Cost;

/// Length of derived key in bytes (256 bits, a ChaCha20 key).
pub const KEY_LENGTH: usize = 32;

/// A secret derived from the master passphrase.
///
/// Key material is zeroized from memory when dropped.
#[derive(ZeroizeOnDrop)]
pub struct SecretKey {
    /// The raw key bytes (zeroized on drop)
    key: [u8; KEY_LENGTH],
}

impl SecretKey {
    /// Create a SecretKey from raw bytes.
    ///
    /// The caller is responsible for wiping its own copy of `bytes`.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    fn zeroed() -> Self {
        Self {
            key: [0u8; KEY_LENGTH],
        }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only to key the keystream.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// A slow, deterministic passphrase-to-key function.
///
/// Implementations must return the same key for the same inputs and must
/// not keep any copy of the passphrase or the key.
pub trait KeyDerivation {
    fn derive(&self, passphrase: &SecretSlice<u8>, salt: &[u8], cost: Cost) -> Result<SecretKey>;
}

/// bcrypt-pbkdf, as used by OpenSSH for key files.
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptPbkdf;

impl KeyDerivation for BcryptPbkdf {
    /// # Examples
    ///
    /// ```
    /// use nosepass_core::kdf::{BcryptPbkdf, KeyDerivation};
    /// use nosepass_core::Cost;
    /// use secrecy::SecretSlice;
    ///
    /// let passphrase = SecretSlice::from(b"correcthorse".to_vec());
    /// let key = BcryptPbkdf.derive(&passphrase, b"example", Cost::Rounds(1)).unwrap();
    /// assert_eq!(key.as_bytes().len(), 32);
    /// ```
    fn derive(&self, passphrase: &SecretSlice<u8>, salt: &[u8], cost: Cost) -> Result<SecretKey> {
        let rounds = cost.kdf_rounds();
        debug!("deriving key with bcrypt-pbkdf ({} rounds)", rounds);

        let mut key = SecretKey::zeroed();
        bcrypt_pbkdf::bcrypt_pbkdf(passphrase.expose_secret(), salt, rounds, &mut key.key)
            .map_err(|e| NosepassError::Derivation(e.to_string()))?;

        Ok(key)
    }
}
