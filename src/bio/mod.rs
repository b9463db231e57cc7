pub mod alignment;
pub mod fasta;
pub mod sequence;

pub use sequence::{AlignedSequence, Alignment, DEFAULT_GAP};
