pub mod annotate;
pub mod config;
pub mod diff;
pub mod represent;

use crate::bio::fasta::{read_fasta, read_fasta_from};
use crate::bio::sequence::Alignment;
use anyhow::Context;
use std::path::Path;

/// Read an aligned FASTA file, or stdin when no path (or `-`) is given.
pub fn read_alignment(input: Option<&Path>) -> anyhow::Result<Alignment> {
    let sequences = match input {
        Some(path) if path != Path::new("-") => {
            read_fasta(path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        _ => read_fasta_from(std::io::stdin().lock()).context("Failed to read FASTA from stdin")?,
    };
    tracing::debug!("Read {} sequences", sequences.len());
    Ok(Alignment::new(sequences)?)
}
