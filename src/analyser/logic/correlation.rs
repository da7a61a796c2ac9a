use super::descriptive::is_constant;
use super::types::CorrelationMatrix;

/// Pearson correlation over the rows where both sides are present.
///
/// Returns `None` with fewer than two complete pairs or when either side is
/// constant over those pairs.
pub fn pairwise_pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();

    if pairs.len() < 2
        || is_constant(pairs.iter().map(|(a, _)| a))
        || is_constant(pairs.iter().map(|(_, b)| b))
    {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((sxy / denom).clamp(-1.0, 1.0))
}

/// Symmetric correlation matrix over `columns`, in the given order.
pub fn correlation_matrix(names: Vec<String>, columns: &[Vec<Option<f64>>]) -> CorrelationMatrix {
    let k = columns.len();
    let mut data = vec![vec![None; k]; k];

    for (i, ci) in columns.iter().enumerate() {
        for (j, cj) in columns.iter().enumerate().skip(i) {
            let r = pairwise_pearson(ci, cj);
            // Diagonal is exactly 1 for any non-constant column
            let r = if i == j { r.map(|_| 1.0) } else { r };
            if let Some(row) = data.get_mut(i)
                && let Some(cell) = row.get_mut(j)
            {
                *cell = r;
            }
            if let Some(row) = data.get_mut(j)
                && let Some(cell) = row.get_mut(i)
            {
                *cell = r;
            }
        }
    }

    CorrelationMatrix {
        columns: names,
        data,
    }
}
