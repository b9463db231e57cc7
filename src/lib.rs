pub mod bio;
pub mod cli;
pub mod core;
pub mod utils;

pub use crate::bio::alignment::{gapped_indices, pident, PositionLabel};
pub use crate::bio::sequence::{AlignedSequence, Alignment};
pub use crate::core::diff::{DiffTable, DiffTableBuilder};
pub use crate::core::selection::{RepresentativeSelector, Representation};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlnDiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AlnDiffError>;
