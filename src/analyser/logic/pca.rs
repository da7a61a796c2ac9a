//! Principal component analysis on standardized columns.
//!
//! Each column is centred and scaled by its own population standard deviation
//! (constant columns become all zeros), the covariance matrix is diagonalised
//! with cyclic Jacobi rotations and the data is projected onto the leading
//! eigenvectors. Covariance matrices here are small (columns × columns) and
//! symmetric, which is the case Jacobi handles well.

use super::descriptive::is_constant;
use super::types::{Outcome, PcaResult, Unavailable};
use anyhow::{Result, bail};
use ndarray::{Array1, Array2, Axis};

const MAX_SWEEPS: usize = 100;
const JACOBI_TOL: f64 = 1e-12;
// Total variance at or below this means nothing varies
const VARIANCE_EPS: f64 = 10.0 * f64::EPSILON;

/// Fits PCA on a complete `rows × columns` matrix and returns the projection.
///
/// # Errors
///
/// Fails only when the eigen solver does not converge.
pub fn fit_transform(
    columns: Vec<String>,
    data: &Array2<f64>,
    n_components: usize,
) -> Result<Outcome<PcaResult>> {
    let (rows, cols) = data.dim();
    if rows < 2 {
        return Ok(Outcome::Unavailable(Unavailable::InsufficientData {
            required: 2,
            found: rows,
        }));
    }

    let scaled = standardize(data);
    let covariance = scaled.t().dot(&scaled) / (rows - 1) as f64;

    let (eigenvalues, eigenvectors) = symmetric_eigen(covariance)?;

    let mut ranked: Vec<(usize, f64)> = eigenvalues
        .iter()
        .map(|v| v.max(0.0))
        .enumerate()
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let total: f64 = ranked.iter().map(|(_, v)| v).sum();
    if total <= VARIANCE_EPS {
        return Ok(Outcome::Unavailable(Unavailable::ZeroVariance));
    }

    let k = n_components.min(cols);
    let mut components = Array2::<f64>::zeros((k, cols));
    let mut explained_variance = Vec::with_capacity(k);
    for (mut row, &(idx, value)) in components.outer_iter_mut().zip(&ranked) {
        let mut vector = eigenvectors.column(idx).to_owned();
        flip_sign(&mut vector);
        row.assign(&vector);
        explained_variance.push(value);
    }

    let scores = scaled.dot(&components.t());
    let explained_variance_ratio = explained_variance.iter().map(|v| v / total).collect();

    Ok(Outcome::Available(PcaResult {
        columns,
        scores: scores.outer_iter().map(|row| row.to_vec()).collect(),
        explained_variance_ratio,
        explained_variance,
        components: components.outer_iter().map(|row| row.to_vec()).collect(),
    }))
}

/// Centres each column and scales it to unit population variance. Constant
/// columns come out as exact zeros.
pub fn standardize(data: &Array2<f64>) -> Array2<f64> {
    let mut out = data.clone();
    for mut column in out.axis_iter_mut(Axis(1)) {
        let n = column.len() as f64;
        let mean = column.sum() / n;
        let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();
        if is_constant(column.iter()) || std <= 0.0 {
            column.fill(0.0);
        } else {
            column.mapv_inplace(|v| (v - mean) / std);
        }
    }
    out
}

// Largest-magnitude loading positive, so results do not depend on solver sign
fn flip_sign(vector: &mut Array1<f64>) {
    let pivot = vector
        .iter()
        .copied()
        .max_by(|a, b| a.abs().total_cmp(&b.abs()))
        .unwrap_or(0.0);
    if pivot < 0.0 {
        vector.mapv_inplace(|v| -v);
    }
}

/// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns eigenvalues and a matrix whose columns are the matching unit
/// eigenvectors, in no particular order.
///
/// # Errors
///
/// Fails if the off-diagonal mass has not vanished after `MAX_SWEEPS` sweeps.
// p, q and k all range over 0..n of an n × n matrix
#[expect(clippy::indexing_slicing)]
pub fn symmetric_eigen(mut a: Array2<f64>) -> Result<(Array1<f64>, Array2<f64>)> {
    let n = a.nrows();
    let mut v = Array2::<f64>::eye(n);
    let scale = a.iter().map(|x| x * x).sum::<f64>().sqrt().max(1.0);

    for _ in 0..MAX_SWEEPS {
        let off: f64 = a
            .indexed_iter()
            .filter(|((i, j), _)| i != j)
            .map(|(_, x)| x * x)
            .sum();
        if off.sqrt() <= JACOBI_TOL * scale {
            return Ok((a.diag().to_owned(), v));
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq.abs() <= f64::MIN_POSITIVE {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    bail!("Jacobi eigen-decomposition did not converge after {MAX_SWEEPS} sweeps")
}
