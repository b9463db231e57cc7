//! Representative subsampling of near-identical sequences
//!
//! Sequences are linked when they are close in collection date, optionally
//! share a state, and differ by less than a proportion-identity threshold.
//! Each connected component of that graph keeps a single representative.

pub mod components;
pub mod graph;
pub mod metadata;
pub mod representative;

pub use components::ComponentFinder;
pub use graph::{GroupingParams, SimilarityGraph, SimilarityGraphBuilder};
pub use metadata::{parse_out_date, MetadataExtractor, PipeHeaderExtractor, SequenceMetadata};
pub use representative::{Group, Representation, RepresentativeSelector};
