//! The derivation pipeline for one site.
//!
//! ```text
//! Unconfigured -> DefaultsApplied -> SiteOverridesApplied
//!   -> KeyDerived -> KeystreamReady -> Emitting -> Done
//! ```
//!
//! Any error moves the pipeline to `Failed`. A password is only handed back
//! once every character has been produced.

use std::fmt;

use log::{debug, trace};
use secrecy::SecretSlice;

use crate::error::{NosepassError, Result};
use crate::kdf::KeyDerivation;
use crate::parser::{self, DEFAULT_ENTRY};
use crate::passphrase::validate_passphrase;
use crate::sampler::{Password, Sampler};
use crate::schema::Schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unconfigured,
    DefaultsApplied,
    SiteOverridesApplied,
    KeyDerived,
    KeystreamReady,
    Emitting,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Derives one site's password from a config and a passphrase.
///
/// # Examples
///
/// ```
/// use nosepass_core::kdf::BcryptPbkdf;
/// use nosepass_core::pipeline::{Pipeline, Stage};
/// use secrecy::SecretSlice;
///
/// let mut pipeline = Pipeline::new(BcryptPbkdf, "example").unwrap();
/// pipeline.configure(b"default count=8 set=a-c rounds=4\n").unwrap();
///
/// let passphrase = SecretSlice::from(b"correcthorse".to_vec());
/// let password = pipeline.generate(&passphrase).unwrap();
/// assert_eq!(password.len(), 8);
/// assert_eq!(pipeline.stage(), Stage::Done);
/// ```
pub struct Pipeline<K> {
    kdf: K,
    site: String,
    schema: Schema,
    stage: Stage,
}

impl<K: KeyDerivation> Pipeline<K> {
    /// Start an unconfigured pipeline with built-in schema defaults.
    pub fn new(kdf: K, site: &str) -> Result<Self> {
        if site.is_empty() {
            return Err(NosepassError::InvalidInput(
                "site name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            kdf,
            site: site.to_string(),
            schema: Schema::default(),
            stage: Stage::Unconfigured,
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Apply the `default` entries, then the site's own entries.
    pub fn configure(&mut self, config: &[u8]) -> Result<&Schema> {
        self.expect_stage(Stage::Unconfigured)?;

        let outcome = parser::apply_entries(config, DEFAULT_ENTRY, &mut self.schema);
        self.advance(outcome, Stage::DefaultsApplied)?;

        let outcome = parser::apply_entries(config, &self.site, &mut self.schema);
        self.advance(outcome, Stage::SiteOverridesApplied)?;

        debug!(
            "schema for '{}': count={} alphabet={} {} increment={}",
            self.site,
            self.schema.count(),
            self.schema.alphabet().len(),
            self.schema.cost(),
            self.schema.increment()
        );
        Ok(&self.schema)
    }

    /// Derive the key and sample the password.
    pub fn generate(&mut self, passphrase: &SecretSlice<u8>) -> Result<Password> {
        self.expect_stage(Stage::SiteOverridesApplied)?;

        let outcome = validate_passphrase(passphrase).and_then(|()| {
            self.kdf
                .derive(passphrase, self.site.as_bytes(), self.schema.cost())
        });
        let key = self.advance(outcome, Stage::KeyDerived)?;

        let sampler = Sampler::new(&key, self.schema.increment(), self.schema.alphabet());
        transition(&mut self.stage, Stage::KeystreamReady);

        transition(&mut self.stage, Stage::Emitting);
        let password = sampler.take(self.schema.count());

        transition(&mut self.stage, Stage::Done);
        Ok(password)
    }

    fn expect_stage(&self, expected: Stage) -> Result<()> {
        if self.stage != expected {
            return Err(NosepassError::InvalidInput(format!(
                "pipeline is {} but must be {}",
                self.stage, expected
            )));
        }
        Ok(())
    }

    fn advance<T>(&mut self, outcome: Result<T>, next: Stage) -> Result<T> {
        match outcome {
            Ok(value) => {
                transition(&mut self.stage, next);
                Ok(value)
            }
            Err(err) => {
                transition(&mut self.stage, Stage::Failed);
                Err(err)
            }
        }
    }
}

fn transition(stage: &mut Stage, next: Stage) {
    trace!("pipeline {} -> {}", stage, next);
    *stage = next;
}
