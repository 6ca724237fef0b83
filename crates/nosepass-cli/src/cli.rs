use std::path::PathBuf;

use clap::Parser;

use nosepass_core::VERSION;

/// nosepass - derive a site's password from a master passphrase
///
/// Nothing is stored. The same passphrase, site, and schema always give
/// the same password; bump the site's increment to rotate it.
#[derive(Parser)]
#[command(name = "nosepass")]
#[command(author, version = VERSION, about, long_about = None)]
pub struct Cli {
    /// Site name, matched against config entries and used as the salt
    #[arg(value_name = "SITE")]
    pub site: String,

    /// Path to the schema config file (default: ~/.nosepass)
    #[arg(short, long, env = "NOSEPASS_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Quiet mode (no strength estimate)
    #[arg(short, long)]
    pub quiet: bool,
}
