mod breakpoints;
mod cli;
mod commands;
mod pdf;
mod sections;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let list_sections = cli.list_sections;
    let config = cli.into_config()?;
    log::debug!("{:?}", config);

    if list_sections {
        commands::sections::run(&config)?;
    } else {
        commands::split::run(&config)?;
    }

    Ok(())
}
