//! nosepass CLI - deterministic per-site passwords
//!
//! Reads the schema config, prompts for the master passphrase, and writes
//! the site's password to stdout with no trailing newline. Everything else
//! goes to stderr.

mod cli;
mod config;
mod constants;
mod errors;
mod helpers;
mod ui;

use std::io;

use clap::Parser;
use env_logger::Env;
use log::debug;

use nosepass_core::config::read_config;
use nosepass_core::{BcryptPbkdf, Pipeline, Strength};

use crate::cli::Cli;
use crate::config::resolve_config_path;
use crate::errors::CliError;
use crate::helpers::{read_passphrase, write_password};
use crate::ui::{render_strength, UiContext};

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    if let Err(err) = run(&cli) {
        CliError::from_anyhow(&err).exit();
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let ui_ctx = UiContext::from_env();

    let path = resolve_config_path(cli.config.as_deref())?;
    let config = read_config(&path)?;

    let mut pipeline = Pipeline::new(BcryptPbkdf, &cli.site)?;
    let schema = pipeline.configure(&config)?;

    if !cli.quiet {
        eprintln!("{}", render_strength(&Strength::of(schema), ui_ctx.color));
    }

    let passphrase = read_passphrase(ui_ctx.interactive)?;
    let password = pipeline.generate(&passphrase)?;
    debug!("generated {} characters for '{}'", password.len(), pipeline.site());

    write_password(&mut io::stdout().lock(), &password)?;
    // Keep the shell prompt off the password line without touching stdout
    eprintln!();
    Ok(())
}
