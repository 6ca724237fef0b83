//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error
/// - 2: Misuse of shell command (clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Unexpected failure with no more specific class.
    pub const GENERAL: i32 = 1;

    /// Config file missing or unreadable.
    pub const CONFIG_IO: i32 = 3;

    /// Malformed config, out-of-bounds schema, or invalid arguments.
    pub const INVALID_CONFIG: i32 = 4;

    /// Master passphrase could not be read, or was empty or too long.
    pub const INPUT_FAILED: i32 = 5;

    /// Key derivation failed.
    pub const DERIVATION_FAILED: i32 = 6;

    /// Password could not be written to stdout.
    pub const OUTPUT_FAILED: i32 = 7;
}
