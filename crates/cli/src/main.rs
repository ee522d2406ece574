//! CLI entry point for govlink.

use clap::Parser;
use cli::CliConfig;

fn main() -> anyhow::Result<()> {
    // Hydrate before parsing so `.env` values reach clap's env fallbacks.
    corelib::config::hydrate_env_file()?;
    let config = CliConfig::parse();
    config.run()
}
