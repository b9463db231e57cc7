use crate::bio::fasta::write_fasta;
use crate::bio::sequence::Alignment;
use crate::cli::commands::read_alignment;
use crate::cli::output;
use crate::core::config::{AlignmentConfig, Config};
use crate::core::selection::{
    GroupingParams, PipeHeaderExtractor, Representation, RepresentativeSelector,
};
use clap::Args;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct RepresentArgs {
    /// Aligned FASTA file (reads stdin when omitted or "-")
    #[arg(value_name = "ALIGNMENT")]
    pub input: Option<PathBuf>,

    /// Maximum number of days separating members of a group (unbounded by default)
    #[arg(long, value_name = "DAYS")]
    pub max_day_sep: Option<u32>,

    /// Members of a group differ by less than this proportion of aligned residues (0-1)
    #[arg(long, value_name = "PROPORTION")]
    pub min_pident_sep: Option<f64>,

    /// Group sequences only if they come from the same state
    #[arg(long, overrides_with = "no_same_state")]
    pub same_state: bool,

    /// Group across states even if the config asks for the same state
    #[arg(long, overrides_with = "same_state")]
    pub no_same_state: bool,

    /// Zero-based pipe-delimited header field holding the state
    #[arg(long, value_name = "N")]
    pub state_field: Option<usize>,

    /// Do not read a state from headers
    #[arg(long, conflicts_with = "state_field")]
    pub no_state: bool,

    /// Print the groups (representative first, blank line between groups) instead of FASTA
    #[arg(long)]
    pub print_groups: bool,

    /// Print the groups as JSON
    #[arg(long, conflicts_with = "print_groups")]
    pub json: bool,

    /// Gap character (default from config, "-")
    #[arg(long, value_name = "CHAR")]
    pub gap: Option<char>,

    /// Show a progress bar while comparing sequences
    #[arg(long)]
    pub progress: bool,
}

impl RepresentArgs {
    /// Flags override the `[represent]` section of the config.
    pub fn grouping_params(&self, config: &Config) -> GroupingParams {
        let defaults = config.represent.grouping_params();
        GroupingParams {
            max_day_sep: self.max_day_sep.or(defaults.max_day_sep),
            min_pident_sep: self.min_pident_sep.unwrap_or(defaults.min_pident_sep),
            same_state: if self.no_same_state {
                false
            } else {
                self.same_state || defaults.same_state
            },
        }
    }

    /// Header field holding the state; `None` turns state extraction off.
    pub fn state_field(&self, config: &Config) -> Option<usize> {
        if self.no_state {
            None
        } else {
            self.state_field.or(config.represent.state_field())
        }
    }

    pub fn selector(&self, config: &Config) -> anyhow::Result<RepresentativeSelector> {
        let params = self.grouping_params(config);
        params.validate()?;

        let gap_char = self.gap.unwrap_or(config.alignment.gap_char);
        let extractor = PipeHeaderExtractor::new()
            .with_state_field(self.state_field(config));

        Ok(RepresentativeSelector::new(params)
            .with_extractor(extractor)
            .with_gap(AlignmentConfig { gap_char }.gap_byte()?)
            .with_parallel_threshold(config.performance.parallel_threshold)
            .with_progress(self.progress))
    }
}

/// Headers of each group, representative first, groups separated by a blank line.
pub fn write_groups<W: Write>(
    writer: &mut W,
    representation: &Representation,
    alignment: &Alignment,
) -> io::Result<()> {
    let header = |i: usize| alignment.get(i).map(|s| s.header.as_str()).unwrap_or("");
    for group in &representation.groups {
        writeln!(writer, "{}", header(group.representative))?;
        for member in group.redundant() {
            writeln!(writer, "{}", header(member))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Groups as JSON, with the thresholds that produced them.
pub fn groups_json(
    representation: &Representation,
    alignment: &Alignment,
    params: &GroupingParams,
) -> serde_json::Value {
    let header = |i: usize| alignment.get(i).map(|s| s.header.as_str()).unwrap_or("");
    let groups: Vec<serde_json::Value> = representation
        .groups
        .iter()
        .map(|group| {
            serde_json::json!({
                "representative": header(group.representative),
                "members": group.members.iter().map(|&m| header(m)).collect::<Vec<_>>(),
            })
        })
        .collect();

    serde_json::json!({
        "params": params,
        "total": alignment.len(),
        "kept": representation.kept.len(),
        "dropped": representation.dropped.len(),
        "groups": groups,
    })
}

pub fn run(args: RepresentArgs, config: &Config) -> anyhow::Result<()> {
    let selector = args.selector(config)?;
    let alignment = read_alignment(args.input.as_deref())?;
    let representation = selector.select(&alignment)?;

    if selector.params().max_day_sep.is_some() {
        let undated = selector
            .metadata(&alignment)
            .iter()
            .filter(|m| m.date.is_none())
            .count();
        if undated > 0 {
            output::warning(&format!(
                "{} sequences have no YYYY-MM-DD date in their header; the day window does not apply to them",
                undated
            ));
        }
    }

    if args.progress {
        output::info(&format!(
            "Kept {} of {} sequences ({} groups)",
            representation.kept.len(),
            alignment.len(),
            representation.groups.len()
        ));
    }

    for seq in representation.dropped_sequences(&alignment) {
        tracing::debug!("Dropped {}", seq.header);
    }

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    if args.json {
        let json = groups_json(&representation, &alignment, selector.params());
        writeln!(writer, "{}", serde_json::to_string_pretty(&json)?)?;
    } else if args.print_groups {
        write_groups(&mut writer, &representation, &alignment)?;
    } else {
        let kept: Vec<_> = representation
            .kept_sequences(&alignment)
            .into_iter()
            .cloned()
            .collect();
        write_fasta(&mut writer, &kept)?;
    }
    writer.flush()?;
    Ok(())
}
