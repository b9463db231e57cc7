pub mod annotation;
pub mod config;
pub mod diff;
pub mod selection;

pub use annotation::{AnnotationMerger, AnnotationTable, JoinMode};
pub use config::Config;
pub use diff::{DiffTable, DiffTableBuilder, ReferenceMode};
