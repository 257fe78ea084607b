use anyhow::Result;
use clap::Parser;
use rodcut::{CLIArguments, bounds_main, logging, solve_main};

fn main() -> Result<()> {
    logging::init();
    let args = CLIArguments::parse();

    match args {
        CLIArguments::Solve(args) => solve_main(args),
        CLIArguments::Bounds(args) => bounds_main(args),
    }
}
