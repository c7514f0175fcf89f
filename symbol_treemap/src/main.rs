use anyhow::Context;
use clap::Parser;

use symbol_treemap::args::{Cli, documentation_text};
use symbol_treemap::config::RunConfig;
use symbol_treemap::{logging, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.documentation {
        print!("{}", documentation_text());
        return Ok(());
    }

    logging::init_logging(cli.verbose);
    let config = RunConfig::from_cli(&cli)?;
    run::run(&config)
        .with_context(|| format!("failed to build treemap for {}", cli.filename.display()))?;
    Ok(())
}
