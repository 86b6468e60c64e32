use anyhow::Result;
use clap::Parser;

use subclean::{cli, config, pipeline};

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let cfg = config::Config::load(args.config.as_deref())?;
    config::init_tracing(&cfg.logging, args.log_level.as_deref())?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "subclean starting");

    if args.print_default_config {
        let s = cfg.to_toml_pretty()?;
        print!("{s}");
        return Ok(());
    }

    pipeline::run_clean(&args, &cfg)
}
