//! Per-position difference tables
//!
//! A diff table lists, for each alignment column where some sequence departs
//! from the reference, the reference-relative site label and the differing
//! residues. Columns where everything agrees are left out, so the table grows
//! with variation rather than with alignment width.
use crate::bio::alignment::{consensus, gapped_indices, PositionLabel};
use crate::bio::sequence::{AlignedSequence, Alignment, DEFAULT_GAP};
use crate::AlnDiffError;
use tracing::debug;

/// Name of the label column.
pub const SITE_COLUMN: &str = "site";

/// Which row the other sequences are compared against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReferenceMode {
    /// The first sequence of the alignment. It stays in place as the first
    /// data column and always shows its own residue.
    #[default]
    First,
    /// A row supplied by the caller, shown in its own leading column.
    Explicit(AlignedSequence),
    /// The majority consensus of the alignment.
    Consensus,
}

/// Header plus data rows; every row is as long as the header and starts with
/// the site label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DiffTable {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Site labels of the data rows, in order.
    pub fn sites(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r[0].as_str())
    }

    /// Header row followed by data rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &Vec<String>> {
        std::iter::once(&self.header).chain(self.rows.iter())
    }

    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.iter_rows().cloned().collect()
    }
}

/// A column in the output that echoes a row (reference or consensus).
struct EchoColumn {
    residues: Vec<u8>,
    /// Print the residue only where it differs from the reference.
    diff_only: bool,
}

#[derive(Debug, Clone)]
pub struct DiffTableBuilder {
    gap: u8,
    reference: ReferenceMode,
    index: Option<AlignedSequence>,
    consensus_column: bool,
    all_columns: bool,
    reference_label: String,
    consensus_label: String,
}

impl Default for DiffTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffTableBuilder {
    pub fn new() -> Self {
        Self {
            gap: DEFAULT_GAP,
            reference: ReferenceMode::First,
            index: None,
            consensus_column: false,
            all_columns: false,
            reference_label: "Ref".to_string(),
            consensus_label: "Consensus".to_string(),
        }
    }

    pub fn with_gap(mut self, gap: u8) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_reference(mut self, reference: ReferenceMode) -> Self {
        self.reference = reference;
        self
    }

    /// Take site labels from `index` instead of the reference row.
    pub fn with_index_sequence(mut self, index: AlignedSequence) -> Self {
        self.index = Some(index);
        self
    }

    /// Add a consensus column. With `ReferenceMode::Consensus` this shows the
    /// reference itself; otherwise it shows where the consensus departs from
    /// the reference.
    pub fn with_consensus_column(mut self, enabled: bool) -> Self {
        self.consensus_column = enabled;
        self
    }

    /// Emit a row for every alignment column, not only differing ones.
    pub fn with_all_columns(mut self, enabled: bool) -> Self {
        self.all_columns = enabled;
        self
    }

    pub fn with_labels(mut self, reference: impl Into<String>, consensus: impl Into<String>) -> Self {
        self.reference_label = reference.into();
        self.consensus_label = consensus.into();
        self
    }

    /// Site labels for every column of `alignment`.
    pub fn site_labels(&self, alignment: &Alignment) -> crate::Result<Vec<PositionLabel>> {
        let reference = self.reference_row(alignment)?;
        self.labels_for(&reference, alignment.width())
    }

    fn labels_for(&self, reference: &[u8], width: usize) -> crate::Result<Vec<PositionLabel>> {
        let index_row = match &self.index {
            Some(index) => {
                self.check_width(index, width)?;
                index.sequence.as_slice()
            }
            None => reference,
        };
        Ok(gapped_indices(index_row, self.gap))
    }

    pub fn build(&self, alignment: &Alignment) -> crate::Result<DiffTable> {
        let reference = self.reference_row(alignment)?;
        let labels = self.labels_for(&reference, alignment.width())?;

        let mut header = vec![SITE_COLUMN.to_string()];
        let mut echoes: Vec<EchoColumn> = Vec::new();
        let mut compared: Vec<&AlignedSequence> = Vec::new();

        match &self.reference {
            ReferenceMode::First => {
                let first = &alignment.sequences()[0];
                header.push(first.header.clone());
                echoes.push(EchoColumn {
                    residues: first.sequence.clone(),
                    diff_only: false,
                });
                if self.consensus_column {
                    header.push(self.consensus_label.clone());
                    echoes.push(EchoColumn {
                        residues: consensus(alignment),
                        diff_only: true,
                    });
                }
                compared.extend(alignment.iter().skip(1));
            }
            ReferenceMode::Explicit(row) => {
                header.push(self.reference_label.clone());
                echoes.push(EchoColumn {
                    residues: row.sequence.clone(),
                    diff_only: false,
                });
                if self.consensus_column {
                    header.push(self.consensus_label.clone());
                    echoes.push(EchoColumn {
                        residues: consensus(alignment),
                        diff_only: true,
                    });
                }
                compared.extend(alignment.iter());
            }
            ReferenceMode::Consensus => {
                if self.consensus_column {
                    header.push(self.consensus_label.clone());
                    echoes.push(EchoColumn {
                        residues: reference.clone(),
                        diff_only: false,
                    });
                }
                compared.extend(alignment.iter());
            }
        }
        header.extend(compared.iter().map(|s| s.header.clone()));

        let mut table = DiffTable::new(header);
        for (column, label) in labels.iter().enumerate() {
            let expected = reference[column];
            let mut differs = false;
            let mut row = Vec::with_capacity(table.header.len());
            row.push(label.to_string());

            for echo in &echoes {
                let residue = echo.residues[column];
                if echo.diff_only && residue == expected {
                    row.push(String::new());
                } else {
                    differs |= echo.diff_only;
                    row.push((residue as char).to_string());
                }
            }

            for seq in &compared {
                let residue = seq.residue(column);
                if residue == expected {
                    row.push(String::new());
                } else {
                    differs = true;
                    row.push((residue as char).to_string());
                }
            }

            if differs || self.all_columns {
                table.rows.push(row);
            }
        }

        debug!(
            "Diff table: {} of {} columns emitted for {} sequences",
            table.len(),
            alignment.width(),
            compared.len()
        );

        Ok(table)
    }

    fn reference_row(&self, alignment: &Alignment) -> crate::Result<Vec<u8>> {
        match &self.reference {
            ReferenceMode::First => Ok(alignment.sequences()[0].sequence.clone()),
            ReferenceMode::Explicit(row) => {
                self.check_width(row, alignment.width())?;
                Ok(row.sequence.clone())
            }
            ReferenceMode::Consensus => Ok(consensus(alignment)),
        }
    }

    fn check_width(&self, row: &AlignedSequence, width: usize) -> crate::Result<()> {
        if row.len() != width {
            return Err(AlnDiffError::Format(format!(
                "'{}' has {} columns but the alignment has {}",
                row.header,
                row.len(),
                width
            )));
        }
        Ok(())
    }
}
