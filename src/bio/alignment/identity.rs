use crate::AlnDiffError;

/// Proportion identity over the ungapped aligned region of two rows.
///
/// Columns where either row has a gap are ignored. When no column is
/// comparable the identity is 0.0 rather than undefined.
pub fn pident(a: &[u8], b: &[u8], gap: u8) -> crate::Result<f64> {
    if a.len() != b.len() {
        return Err(AlnDiffError::Input(format!(
            "cannot compute identity between sequences of length {} and {}",
            a.len(),
            b.len()
        )));
    }

    let (matches, compared) = a
        .iter()
        .zip(b.iter())
        .filter(|(&x, &y)| x != gap && y != gap)
        .fold((0usize, 0usize), |(m, n), (x, y)| {
            (m + usize::from(x == y), n + 1)
        });

    if compared == 0 {
        return Ok(0.0);
    }

    Ok(matches as f64 / compared as f64)
}
