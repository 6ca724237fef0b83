//! CLI error types for structured error handling.
//!
//! Every failure ends the process with one `Error:` line on stderr and an
//! exit code for its class.

use std::fmt;

use nosepass_core::NosepassError;

use crate::constants::exit_codes;

/// CLI-level error with an associated exit code.
#[derive(Debug)]
pub struct CliError {
    message: String,
    code: i32,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Classify an error bubbled up from `run`.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let code = match err.downcast_ref::<NosepassError>() {
            Some(core) => exit_code_for(core),
            None => exit_codes::GENERAL,
        };
        CliError {
            message: err.to_string(),
            code,
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        self.code
    }

    /// Print error message to stderr and exit with appropriate code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }
}

fn exit_code_for(err: &NosepassError) -> i32 {
    match err {
        NosepassError::ConfigIo(_) => exit_codes::CONFIG_IO,
        NosepassError::ConfigSyntax(_)
        | NosepassError::SchemaConstraint(_)
        | NosepassError::InvalidInput(_) => exit_codes::INVALID_CONFIG,
        NosepassError::InputIo(_) => exit_codes::INPUT_FAILED,
        NosepassError::Derivation(_) => exit_codes::DERIVATION_FAILED,
        NosepassError::OutputIo(_) => exit_codes::OUTPUT_FAILED,
    }
}
