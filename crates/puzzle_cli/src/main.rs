//! Headless command-line driver: reads a puzzle document, runs the solver,
//! and prints solutions as JSON.

mod cli;
mod doc;
mod output;

use clap::Parser;

fn main() -> eyre::Result<()> {
    env_logger::builder().init();
    let args = cli::Args::parse();

    match args.subcommand {
        Some(subcommand) => cli::exec(subcommand),
        None => {
            log::info!("no subcommand given; pass `solve` or `inspect`");
            Ok(())
        }
    }
}
