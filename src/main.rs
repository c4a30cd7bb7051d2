use anyhow::Result;
use clap::Parser;

use vgdiff::commands::compare::{normalize_legacy_flags, CompareCommand};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let command = CompareCommand::parse_from(normalize_legacy_flags(std::env::args()));
    command.run().await
}
