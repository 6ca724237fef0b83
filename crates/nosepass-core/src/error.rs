//! Error types for nosepass core operations.
//!
//! Every failure is fatal and operator-actionable: a broken config file, an
//! unreadable secret, or an output stream that refused the password. Errors
//! carry a single descriptive line; the CLI layer maps each class to an exit
//! code.

use thiserror::Error;

/// Result type alias for nosepass operations.
pub type Result<T> = std::result::Result<T, NosepassError>;

/// Core error type for nosepass operations.
#[derive(Debug, Error)]
pub enum NosepassError {
    /// Config file could not be opened or read
    #[error("{0}")]
    ConfigIo(String),

    /// Malformed config line, key, or value
    #[error("{0}")]
    ConfigSyntax(String),

    /// Count, cost, or alphabet size out of bounds
    #[error("{0}")]
    SchemaConstraint(String),

    /// Secret could not be read, or was empty or too long
    #[error("{0}")]
    InputIo(String),

    /// Key derivation failed
    #[error("key derivation failed: {0}")]
    Derivation(String),

    /// Generated password could not be written
    #[error("{0}")]
    OutputIo(String),

    /// Invalid use of the API (empty site name, out-of-order pipeline calls)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl NosepassError {
    /// Prefix a config-file error with the 1-based line it came from.
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            NosepassError::ConfigSyntax(message) => {
                NosepassError::ConfigSyntax(format!("line {}: {}", line, message))
            }
            NosepassError::SchemaConstraint(message) => {
                NosepassError::SchemaConstraint(format!("line {}: {}", line, message))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_line_prefixes_config_errors() {
        let err = NosepassError::ConfigSyntax("multiple settings for rounds".to_string()).at_line(7);
        assert_eq!(err.to_string(), "line 7: multiple settings for rounds");

        let err = NosepassError::SchemaConstraint("character count must be greater than 0".to_string())
            .at_line(2);
        assert_eq!(err.to_string(), "line 2: character count must be greater than 0");
    }

    #[test]
    fn test_at_line_leaves_other_errors_alone() {
        let err = NosepassError::OutputIo("failed to write output".to_string()).at_line(3);
        assert_eq!(err.to_string(), "failed to write output");
    }
}
