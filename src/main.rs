use anyhow::Result;
use env_logger::Env;

use abcgen::cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    cli::run()
}
