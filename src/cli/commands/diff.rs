use crate::bio::sequence::{AlignedSequence, Alignment};
use crate::cli::commands::read_alignment;
use crate::cli::output::print_table;
use crate::core::annotation::{AnnotationMerger, AnnotationTable, JoinMode};
use crate::core::config::{AlignmentConfig, Config};
use crate::core::diff::{DiffTable, DiffTableBuilder, ReferenceMode};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

/// Options shared by `diff` and `annotate`
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// Aligned FASTA file (reads stdin when omitted or "-")
    #[arg(value_name = "ALIGNMENT")]
    pub input: Option<PathBuf>,

    /// Compare against this sequence (header or its first word) instead of the first one.
    /// The sequence is shown as the reference column rather than compared.
    #[arg(short = 'r', long, value_name = "ID", conflicts_with = "consensus_as_reference")]
    pub reference: Option<String>,

    /// Number sites by this sequence (e.g. a numbering template); it is not shown as a column
    #[arg(long, value_name = "ID")]
    pub index: Option<String>,

    /// Add a consensus column
    #[arg(long)]
    pub make_consensus: bool,

    /// Use the consensus as the reference
    #[arg(long)]
    pub consensus_as_reference: bool,

    /// TAB-delimited annotation tables (comma-separated). The first column holds site
    /// labels such as -3, 42 or 42+1; a header line is required.
    #[arg(long, value_delimiter = ',', value_name = "FILES")]
    pub annotation_tables: Vec<PathBuf>,

    /// Join same-named annotation columns, separating values with commas
    #[arg(long)]
    pub join_annotations: bool,

    /// Gap character (default from config, "-")
    #[arg(long, value_name = "CHAR")]
    pub gap: Option<char>,

    /// Draw a table instead of TAB-delimited output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub table: TableArgs,
}

impl TableArgs {
    /// Resolve the gap character from flags and config.
    pub fn gap_byte(&self, config: &Config) -> anyhow::Result<u8> {
        let gap_char = self.gap.unwrap_or(config.alignment.gap_char);
        Ok(AlignmentConfig { gap_char }.gap_byte()?)
    }

    fn join_mode(&self, config: &Config) -> anyhow::Result<JoinMode> {
        if self.join_annotations {
            Ok(JoinMode::Join)
        } else {
            Ok(config.diff.join_mode()?)
        }
    }

    pub fn load_annotations(&self, config: &Config) -> anyhow::Result<AnnotationMerger> {
        let tables = self
            .annotation_tables
            .iter()
            .map(|path| {
                AnnotationTable::from_path(path)
                    .with_context(|| format!("Failed to load annotation table {}", path.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(AnnotationMerger::new(tables).with_mode(self.join_mode(config)?))
    }

    /// Pull the index and reference rows out of the alignment and configure
    /// the builder accordingly.
    pub fn prepare(
        &self,
        alignment: Alignment,
        config: &Config,
    ) -> anyhow::Result<(DiffTableBuilder, Alignment)> {
        let mut alignment = alignment;

        let index = match &self.index {
            Some(id) => {
                let (seq, rest) = take_named(alignment, id)?;
                alignment = rest;
                Some(seq)
            }
            None => None,
        };

        let reference = match (&self.reference, &index) {
            (Some(id), Some(index)) if index_matches(index, id) => {
                ReferenceMode::Explicit(index.clone())
            }
            (Some(id), _) => {
                let (seq, rest) = take_named(alignment, id)?;
                alignment = rest;
                ReferenceMode::Explicit(seq)
            }
            (None, _) if self.consensus_as_reference => ReferenceMode::Consensus,
            (None, _) => ReferenceMode::First,
        };

        let mut builder = DiffTableBuilder::new()
            .with_gap(self.gap_byte(config)?)
            .with_reference(reference)
            .with_consensus_column(self.make_consensus || self.consensus_as_reference)
            .with_labels(
                config.diff.reference_label.clone(),
                config.diff.consensus_label.clone(),
            );
        if let Some(index) = index {
            builder = builder.with_index_sequence(index);
        }

        Ok((builder, alignment))
    }

    /// Read the input, build the table and attach annotations.
    pub fn build_table(&self, config: &Config, all_columns: bool) -> anyhow::Result<DiffTable> {
        let merger = self.load_annotations(config)?;
        let alignment = read_alignment(self.input.as_deref())?;
        let (builder, alignment) = self.prepare(alignment, config)?;

        let table = builder.with_all_columns(all_columns).build(&alignment)?;
        if merger.is_empty() {
            Ok(table)
        } else {
            Ok(merger.merge(&table))
        }
    }
}

fn index_matches(seq: &AlignedSequence, id: &str) -> bool {
    seq.header == id || seq.header.split_whitespace().next() == Some(id)
}

fn take_named(alignment: Alignment, id: &str) -> anyhow::Result<(AlignedSequence, Alignment)> {
    let position = alignment
        .position(id)
        .with_context(|| format!("No sequence named '{}' in the alignment", id))?;
    alignment
        .take(position)
        .with_context(|| format!("'{}' is the only sequence; nothing to compare against it", id))
}

pub fn run(args: DiffArgs, config: &Config) -> anyhow::Result<()> {
    let table = args.table.build_table(config, false)?;
    tracing::info!("{} differing sites", table.len());
    print_table(&table, args.table.pretty)?;
    Ok(())
}
