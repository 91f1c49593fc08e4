//! `string-vault` — vault generator binary entry point.
//!
//! Run sequence:
//! 1. Load and validate [`Config`] from environment variables (all optional).
//! 2. Initialise console logging.
//! 3. Generate the run key, encrypt the builtin string table, write the
//!    output file, and exit.

mod config;
mod crypto;
mod table;
mod telemetry;
mod vault;

use anyhow::Result;

use config::Config;

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;

    // -----------------------------------------------------------------------
    // 3. Encrypt and write the vault
    // -----------------------------------------------------------------------
    vault::run(&cfg)
}
