use crate::AlnDiffError;
use serde::{Deserialize, Serialize};

/// Gap character used when nothing else is configured.
pub const DEFAULT_GAP: u8 = b'-';

/// One row of a multiple-sequence alignment.
///
/// The header is kept verbatim (everything after `>` in FASTA), since the
/// clustering engine reads pipe-delimited metadata out of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlignedSequence {
    pub header: String,
    pub sequence: Vec<u8>,
}

impl AlignedSequence {
    pub fn new(header: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Residue at an alignment column.
    pub fn residue(&self, column: usize) -> u8 {
        self.sequence[column]
    }

    /// Residue count, ignoring gap columns.
    pub fn ungapped_len(&self, gap: u8) -> usize {
        self.sequence.iter().filter(|&&c| c != gap).count()
    }

    pub fn to_string(&self) -> String {
        String::from_utf8_lossy(&self.sequence).to_string()
    }
}

/// An ordered, non-empty set of equal-length aligned sequences.
///
/// Order matters: the first member is the implicit reference for diff tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    sequences: Vec<AlignedSequence>,
    width: usize,
}

impl Alignment {
    pub fn new(sequences: Vec<AlignedSequence>) -> crate::Result<Self> {
        let first = sequences
            .first()
            .ok_or_else(|| AlnDiffError::Format("alignment contains no sequences".to_string()))?;
        let width = first.len();

        if let Some(bad) = sequences.iter().find(|s| s.len() != width) {
            return Err(AlnDiffError::Format(format!(
                "sequences are not all of equal length: '{}' has {} columns, expected {}",
                bad.header,
                bad.len(),
                width
            )));
        }

        Ok(Self { sequences, width })
    }

    /// Build an alignment from `(header, sequence)` pairs.
    pub fn from_pairs<H, S>(pairs: impl IntoIterator<Item = (H, S)>) -> crate::Result<Self>
    where
        H: Into<String>,
        S: AsRef<[u8]>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(h, s)| AlignedSequence::new(h, s.as_ref().to_vec()))
                .collect(),
        )
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of sequences.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn sequences(&self) -> &[AlignedSequence] {
        &self.sequences
    }

    pub fn get(&self, index: usize) -> Option<&AlignedSequence> {
        self.sequences.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AlignedSequence> {
        self.sequences.iter()
    }

    /// Index of the first sequence whose header is exactly `header`, or whose
    /// first whitespace-delimited word is `header`.
    pub fn position(&self, header: &str) -> Option<usize> {
        self.sequences
            .iter()
            .position(|s| s.header == header)
            .or_else(|| {
                self.sequences
                    .iter()
                    .position(|s| s.header.split_whitespace().next() == Some(header))
            })
    }

    /// Remove and return the sequence at `index`. Fails if it is the last one.
    pub fn take(mut self, index: usize) -> crate::Result<(AlignedSequence, Alignment)> {
        if index >= self.sequences.len() {
            return Err(AlnDiffError::Input(format!(
                "sequence index {} out of range for alignment of {}",
                index,
                self.sequences.len()
            )));
        }
        let taken = self.sequences.remove(index);
        let rest = Alignment::new(self.sequences)?;
        Ok((taken, rest))
    }

    /// Alignment restricted to the given member indices, in the given order.
    pub fn subset(&self, indices: &[usize]) -> crate::Result<Alignment> {
        let mut picked = Vec::with_capacity(indices.len());
        for &i in indices {
            let seq = self.sequences.get(i).ok_or_else(|| {
                AlnDiffError::Input(format!("sequence index {} out of range", i))
            })?;
            picked.push(seq.clone());
        }
        Alignment::new(picked)
    }
}

impl<'a> IntoIterator for &'a Alignment {
    type Item = &'a AlignedSequence;
    type IntoIter = std::slice::Iter<'a, AlignedSequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_length_alignment() {
        let aln = Alignment::from_pairs([("a", "AC-T"), ("b", "ACGT")]).unwrap();
        assert_eq!(aln.width(), 4);
        assert_eq!(aln.len(), 2);
        assert_eq!(aln.get(0).unwrap().ungapped_len(DEFAULT_GAP), 3);
    }

    #[test]
    fn test_unequal_lengths_rejected() {
        let err = Alignment::from_pairs([("a", "ACGT"), ("b", "ACG")]).unwrap_err();
        assert!(matches!(err, AlnDiffError::Format(_)));
        assert!(err.to_string().contains("'b' has 3 columns"));
    }

    #[test]
    fn test_empty_alignment_rejected() {
        assert!(matches!(
            Alignment::new(Vec::new()),
            Err(AlnDiffError::Format(_))
        ));
    }

    #[test]
    fn test_position_matches_first_word() {
        let aln = Alignment::from_pairs([("x1 some description", "A"), ("x2", "T")]).unwrap();
        assert_eq!(aln.position("x1"), Some(0));
        assert_eq!(aln.position("x2"), Some(1));
        assert_eq!(aln.position("x3"), None);
    }

    #[test]
    fn test_take_last_sequence_fails() {
        let aln = Alignment::from_pairs([("only", "ACGT")]).unwrap();
        assert!(aln.take(0).is_err());
    }
}
