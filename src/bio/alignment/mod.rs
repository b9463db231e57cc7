//! Column-level operations on aligned sequences: reference-relative
//! coordinates, proportion identity and majority consensus.

pub mod consensus;
pub mod identity;
pub mod index;

pub use consensus::consensus;
pub use identity::pident;
pub use index::{gapped_indices, PositionLabel};
