#![deny(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use runtime::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let scene = cli.scene()?;
    let summary = runtime::run(&scene)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
