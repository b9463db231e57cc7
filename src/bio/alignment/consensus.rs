use crate::bio::sequence::Alignment;

/// Majority-rule consensus row.
///
/// Every byte counts as a residue, the gap character included. On a tie the
/// residue seen first (top to bottom) wins.
pub fn consensus(alignment: &Alignment) -> Vec<u8> {
    (0..alignment.width())
        .map(|column| majority(alignment.iter().map(|s| s.residue(column))))
        .collect()
}

fn majority(residues: impl Iterator<Item = u8>) -> u8 {
    // (residue, count) in first-seen order
    let mut tally: Vec<(u8, usize)> = Vec::new();
    for r in residues {
        match tally.iter_mut().find(|(seen, _)| *seen == r) {
            Some((_, count)) => *count += 1,
            None => tally.push((r, 1)),
        }
    }

    let mut best: Option<(u8, usize)> = None;
    for (residue, count) in tally {
        // strict > keeps the earliest residue on ties
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((residue, count));
        }
    }
    best.map(|(r, _)| r).unwrap_or(b'-')
}
