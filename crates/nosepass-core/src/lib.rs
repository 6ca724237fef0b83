//! # nosepass core
//!
//! Core library for nosepass - a deterministic per-site password generator.
//! Nothing is stored: every password is re-derived from the master
//! passphrase, the site name, and the site's schema.
//!
//! ## Architecture
//!
//! - **charset**: compiles `set=` declarations into alphabets
//! - **schema**: the resolved generation policy and its bounds
//! - **parser**: merges `default` and site entries from the config
//! - **config**: reads the config file
//! - **kdf**: bcrypt-pbkdf key stretching behind the `KeyDerivation` trait
//! - **sampler**: ChaCha20 keystream with rejection sampling
//! - **strength**: entropy estimate shown before the passphrase prompt
//! - **pipeline**: ties it all together as a small state machine

pub mod charset;
pub mod config;
pub mod error;
pub mod kdf;
pub mod parser;
pub mod passphrase;
pub mod pipeline;
pub mod sampler;
pub mod schema;
pub mod strength;

pub use charset::Alphabet;
pub use error::{NosepassError, Result};
pub use kdf::{BcryptPbkdf, KeyDerivation, SecretKey};
pub use pipeline::{Pipeline, Stage};
pub use sampler::Password;
pub use schema::{Cost, Schema};
pub use strength::{Strength, StrengthClass};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
