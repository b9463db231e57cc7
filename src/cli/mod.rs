pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "alndiff",
    version,
    about = "Reference-relative difference tables and representative subsampling for alignments",
    long_about = "alndiff numbers alignment columns relative to a reference sequence (negative \
                  numbers before its start, n+k for insertions after site n), tabulates where \
                  sequences differ from that reference, and reduces sets of near-identical, \
                  closely dated sequences to one representative per group."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use (0 = all available)
    #[arg(short = 'j', long, global = true)]
    pub threads: Option<usize>,

    /// Configuration file (TOML)
    #[arg(short = 'c', long, global = true, env = "ALNDIFF_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tabulate the sites where aligned sequences differ from a reference
    Diff(commands::diff::DiffArgs),

    /// List every alignment column with its site label, reference residue and annotations
    Annotate(commands::annotate::AnnotateArgs),

    /// Keep one representative of each group of similar, closely dated sequences
    Represent(commands::represent::RepresentArgs),

    /// Print or save the configuration in effect (TOML)
    Config(commands::config::ConfigArgs),
}
