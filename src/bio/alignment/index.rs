//! Reference-relative coordinates for alignment columns
//!
//! A reference row is numbered by its own residues (1-based). Columns where the
//! reference has a gap get either a negative number (before the first residue)
//! or an insertion label `n+k` (k-th gap column after residue `n`).
use crate::AlnDiffError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionLabel {
    /// Gap column upstream of the first reference residue. `Upstream(1)` is
    /// the column immediately before position 1 and prints as `-1`.
    Upstream(usize),
    /// Column holding the n-th reference residue.
    Reference(usize),
    /// The `offset`-th gap column after reference residue `after`.
    Insertion { after: usize, offset: usize },
}

impl PositionLabel {
    fn sort_key(&self) -> (i64, usize) {
        match *self {
            PositionLabel::Upstream(n) => (-(n as i64), 0),
            PositionLabel::Reference(n) => (n as i64, 0),
            PositionLabel::Insertion { after, offset } => (after as i64, offset),
        }
    }

    /// True when the reference has a residue in this column.
    pub fn is_reference(&self) -> bool {
        matches!(self, PositionLabel::Reference(_))
    }
}

impl Ord for PositionLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for PositionLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PositionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionLabel::Upstream(n) => write!(f, "-{}", n),
            PositionLabel::Reference(n) => write!(f, "{}", n),
            PositionLabel::Insertion { after, offset } => write!(f, "{}+{}", after, offset),
        }
    }
}

impl FromStr for PositionLabel {
    type Err = AlnDiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || AlnDiffError::Format(format!("invalid position label '{}'", s));
        let s = s.trim();

        if let Some((after, offset)) = s.split_once('+') {
            let after: usize = after.parse().map_err(|_| bad())?;
            let offset: usize = offset.parse().map_err(|_| bad())?;
            if after == 0 || offset == 0 {
                return Err(bad());
            }
            return Ok(PositionLabel::Insertion { after, offset });
        }

        if let Some(upstream) = s.strip_prefix('-') {
            let n: usize = upstream.parse().map_err(|_| bad())?;
            if n == 0 {
                return Err(bad());
            }
            return Ok(PositionLabel::Upstream(n));
        }

        match s.parse::<usize>() {
            Ok(0) | Err(_) => Err(bad()),
            Ok(n) => Ok(PositionLabel::Reference(n)),
        }
    }
}

/// Label every column of `reference` relative to its ungapped residues.
///
/// The output has exactly one label per column, in column order.
pub fn gapped_indices(reference: &[u8], gap: u8) -> Vec<PositionLabel> {
    let leading = reference.iter().take_while(|&&c| c == gap).count();
    let mut labels = Vec::with_capacity(reference.len());

    labels.extend((1..=leading).rev().map(PositionLabel::Upstream));

    let mut position = 0usize;
    let mut offset = 0usize;
    for &c in &reference[leading..] {
        if c == gap {
            offset += 1;
            labels.push(PositionLabel::Insertion {
                after: position,
                offset,
            });
        } else {
            position += 1;
            offset = 0;
            labels.push(PositionLabel::Reference(position));
        }
    }

    labels
}
