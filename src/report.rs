use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;

use crate::diff::{DirectionalDiff, GroupDiff};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn write_report<W: Write>(out: &mut W, diff: &GroupDiff, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            write_direction(out, &diff.first_only)?;
            write_direction(out, &diff.second_only)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, diff)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn write_direction<W: Write>(out: &mut W, direction: &DirectionalDiff) -> std::io::Result<()> {
    writeln!(
        out,
        "\nVariables in {} but not in {}:",
        direction.source, direction.target
    )?;
    if direction.is_empty() {
        return writeln!(out, " - No differences found");
    }
    for name in &direction.missing {
        writeln!(out, " - {name}")?;
    }
    Ok(())
}
