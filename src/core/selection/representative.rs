//! Choosing one sequence per similarity component
//!
//! Representative rule: the member with the latest collection date. Members
//! without a date rank below every dated member. Remaining ties go to the
//! member that appears first in the input.
use crate::bio::sequence::{AlignedSequence, Alignment, DEFAULT_GAP};
use crate::core::selection::graph::{GroupingParams, SimilarityGraphBuilder};
use crate::core::selection::metadata::{MetadataExtractor, PipeHeaderExtractor, SequenceMetadata};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub representative: usize,
    /// All members, ascending, representative included.
    pub members: Vec<usize>,
}

impl Group {
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    /// Members other than the representative.
    pub fn redundant(&self) -> impl Iterator<Item = usize> + '_ {
        self.members
            .iter()
            .copied()
            .filter(move |&m| m != self.representative)
    }
}

/// Outcome of a selection: the groups plus kept and dropped indices, both
/// in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representation {
    pub groups: Vec<Group>,
    pub kept: Vec<usize>,
    pub dropped: Vec<usize>,
}

impl Representation {
    /// Pick a representative for every component.
    pub fn from_components(components: Vec<Vec<usize>>, metadata: &[SequenceMetadata]) -> Self {
        let groups: Vec<Group> = components
            .into_iter()
            .filter_map(|mut members| {
                members.sort_unstable();
                let representative = choose_representative(&members, metadata)?;
                Some(Group {
                    representative,
                    members,
                })
            })
            .collect();

        let mut kept: Vec<usize> = groups.iter().map(|g| g.representative).collect();
        let mut dropped: Vec<usize> = groups.iter().flat_map(|g| g.redundant()).collect();
        kept.sort_unstable();
        dropped.sort_unstable();

        Self {
            groups,
            kept,
            dropped,
        }
    }

    pub fn kept_sequences<'a>(&self, alignment: &'a Alignment) -> Vec<&'a AlignedSequence> {
        self.kept.iter().filter_map(|&i| alignment.get(i)).collect()
    }

    pub fn dropped_sequences<'a>(&self, alignment: &'a Alignment) -> Vec<&'a AlignedSequence> {
        self.dropped.iter().filter_map(|&i| alignment.get(i)).collect()
    }

    /// The alignment restricted to kept sequences.
    pub fn reduced(&self, alignment: &Alignment) -> crate::Result<Alignment> {
        alignment.subset(&self.kept)
    }
}

/// Latest known date first, then earliest input position. `None` for an
/// empty component.
pub fn choose_representative(members: &[usize], metadata: &[SequenceMetadata]) -> Option<usize> {
    let date = |i: usize| metadata.get(i).and_then(|m| m.date);
    let (&first, rest) = members.split_first()?;
    let mut best = first;
    for &candidate in rest {
        if date(candidate) > date(best) || (date(candidate) == date(best) && candidate < best) {
            best = candidate;
        }
    }
    Some(best)
}

#[derive(Clone)]
pub struct RepresentativeSelector {
    params: GroupingParams,
    gap: u8,
    extractor: Arc<dyn MetadataExtractor>,
    parallel_threshold: usize,
    show_progress: bool,
}

impl RepresentativeSelector {
    pub fn new(params: GroupingParams) -> Self {
        Self {
            params,
            gap: DEFAULT_GAP,
            extractor: Arc::new(PipeHeaderExtractor::default()),
            parallel_threshold: 64,
            show_progress: false,
        }
    }

    pub fn with_extractor<E: MetadataExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn with_gap(mut self, gap: u8) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    pub fn params(&self) -> &GroupingParams {
        &self.params
    }

    pub fn metadata(&self, alignment: &Alignment) -> Vec<SequenceMetadata> {
        alignment
            .iter()
            .map(|s| self.extractor.extract(&s.header))
            .collect()
    }

    pub fn select(&self, alignment: &Alignment) -> crate::Result<Representation> {
        self.params.validate()?;
        let metadata = self.metadata(alignment);

        let graph = SimilarityGraphBuilder::new(self.params)
            .with_gap(self.gap)
            .with_parallel_threshold(self.parallel_threshold)
            .with_progress(self.show_progress)
            .build(alignment, &metadata)?;
        let components = graph.components()?;
        let representation = Representation::from_components(components, &metadata);

        info!(
            "Kept {} of {} sequences in {} groups ({} dropped)",
            representation.kept.len(),
            alignment.len(),
            representation.groups.len(),
            representation.dropped.len()
        );

        Ok(representation)
    }
}
