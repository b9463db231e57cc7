use crate::bio::alignment::pident;
use crate::bio::sequence::{Alignment, DEFAULT_GAP};
use crate::core::selection::components::ComponentFinder;
use crate::core::selection::metadata::SequenceMetadata;
use crate::AlnDiffError;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Thresholds deciding whether two sequences belong in one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupingParams {
    /// Maximum days between collection dates; no bound when `None`.
    pub max_day_sep: Option<u32>,
    /// Sequences are grouped only if `1 - pident` is strictly below this.
    pub min_pident_sep: f64,
    /// Require equal states.
    pub same_state: bool,
}

impl Default for GroupingParams {
    fn default() -> Self {
        Self {
            max_day_sep: None,
            min_pident_sep: 1.0,
            same_state: false,
        }
    }
}

impl GroupingParams {
    pub fn validate(&self) -> crate::Result<()> {
        if !(0.0..=1.0).contains(&self.min_pident_sep) {
            return Err(AlnDiffError::Config(format!(
                "min_pident_sep must be within [0, 1], got {}",
                self.min_pident_sep
            )));
        }
        Ok(())
    }

    /// Date and state checks; these need no sequence data.
    pub fn metadata_compatible(&self, a: &SequenceMetadata, b: &SequenceMetadata) -> bool {
        if self.same_state && a.state != b.state {
            return false;
        }
        if let (Some(max), Some(da), Some(db)) = (self.max_day_sep, a.date, b.date) {
            if (da - db).num_days().unsigned_abs() > u64::from(max) {
                return false;
            }
        }
        true
    }

    /// Identity check. The comparison is strict.
    pub fn similar_enough(&self, identity: f64) -> bool {
        1.0 - identity < self.min_pident_sep
    }
}

/// Undirected graph over alignment rows. Edges are stored once as `(i, j)`
/// with `i < j`, sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityGraph {
    pub node_count: usize,
    pub edges: Vec<(usize, usize)>,
}

impl SimilarityGraph {
    pub fn components(&self) -> crate::Result<Vec<Vec<usize>>> {
        ComponentFinder::find(self.node_count, &self.edges)
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        let key = if a < b { (a, b) } else { (b, a) };
        self.edges.binary_search(&key).is_ok()
    }
}

#[derive(Debug, Clone)]
pub struct SimilarityGraphBuilder {
    params: GroupingParams,
    gap: u8,
    parallel_threshold: usize,
    show_progress: bool,
}

impl SimilarityGraphBuilder {
    pub fn new(params: GroupingParams) -> Self {
        Self {
            params,
            gap: DEFAULT_GAP,
            parallel_threshold: 64,
            show_progress: false,
        }
    }

    pub fn with_gap(mut self, gap: u8) -> Self {
        self.gap = gap;
        self
    }

    /// Alignments with at least this many sequences are compared on the rayon pool.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Neighbours of `i` among the later rows.
    fn edges_from(
        &self,
        i: usize,
        alignment: &Alignment,
        metadata: &[SequenceMetadata],
    ) -> crate::Result<Vec<(usize, usize)>> {
        let seqs = alignment.sequences();
        let mut edges = Vec::new();
        for j in (i + 1)..seqs.len() {
            if !self.params.metadata_compatible(&metadata[i], &metadata[j]) {
                continue;
            }
            let identity = pident(&seqs[i].sequence, &seqs[j].sequence, self.gap)?;
            if self.params.similar_enough(identity) {
                edges.push((i, j));
            }
        }
        Ok(edges)
    }

    pub fn build(
        &self,
        alignment: &Alignment,
        metadata: &[SequenceMetadata],
    ) -> crate::Result<SimilarityGraph> {
        self.params.validate()?;
        let n = alignment.len();
        if metadata.len() != n {
            return Err(AlnDiffError::Input(format!(
                "{} metadata records for {} sequences",
                metadata.len(),
                n
            )));
        }

        let pb = if self.show_progress {
            ProgressBar::new(n as u64)
        } else {
            ProgressBar::with_draw_target(Some(n as u64), ProgressDrawTarget::hidden())
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        pb.set_message("Comparing sequences");

        // Indexed parallel collect keeps row order, so both paths give the
        // same sorted edge list.
        let per_row: Vec<Vec<(usize, usize)>> = if n >= self.parallel_threshold {
            debug!("Comparing {} sequences in parallel", n);
            (0..n)
                .into_par_iter()
                .map(|i| {
                    let edges = self.edges_from(i, alignment, metadata);
                    pb.inc(1);
                    edges
                })
                .collect::<crate::Result<_>>()?
        } else {
            (0..n)
                .map(|i| {
                    let edges = self.edges_from(i, alignment, metadata);
                    pb.inc(1);
                    edges
                })
                .collect::<crate::Result<_>>()?
        };

        let edges: Vec<(usize, usize)> = per_row.into_iter().flatten().collect();
        pb.finish_and_clear();
        info!("Similarity graph: {} sequences, {} edges", n, edges.len());

        Ok(SimilarityGraph {
            node_count: n,
            edges,
        })
    }
}
