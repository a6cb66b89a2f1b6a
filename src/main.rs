//! dirsizer CLI: total size and file count of a directory tree.

use anyhow::Result;
use clap::Parser;
use dirsizer::engine::Cli;
use dirsizer::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
