// src/bin/cli.rs
use ltd2_scrape::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = cli::parse_args(std::env::args().skip(1))?;
    cli::run(args)?;
    Ok(())
}
