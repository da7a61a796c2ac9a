use super::descriptive::{is_constant, mean, median, population_std};
use super::types::{OutlierResult, Outcome, Unavailable};
use crate::config::OutlierMethod;

// Consistency constants for the robust score (Iglewicz & Hoaglin)
const MAD_SCALE: f64 = 0.6745;
const MEAN_AD_SCALE: f64 = 1.253_314;

/// Flags values whose score magnitude exceeds `threshold`.
///
/// `values` is the coerced column in row order; missing entries are dropped
/// first and all positions in the result except `outlier_rows` refer to the
/// remaining values.
pub fn detect(
    column: &str,
    values: &[Option<f64>],
    method: OutlierMethod,
    threshold: f64,
) -> Outcome<OutlierResult> {
    let (rows, clean): (Vec<usize>, Vec<f64>) = values
        .iter()
        .enumerate()
        .filter_map(|(row, v)| v.map(|v| (row, v)))
        .unzip();

    if clean.is_empty() {
        return Outcome::Unavailable(Unavailable::NoNumericData {
            column: column.to_owned(),
        });
    }

    let z_scores = match method {
        OutlierMethod::ZScore => z_scores(&clean),
        OutlierMethod::ModifiedZScore => modified_z_scores(&clean),
    };

    let flags: Vec<bool> = z_scores.iter().map(|z| z.abs() > threshold).collect();

    let mut outlier_indices = Vec::new();
    let mut outlier_rows = Vec::new();
    let mut outlier_values = Vec::new();
    for (i, ((flag, row), value)) in flags.iter().zip(&rows).zip(&clean).enumerate() {
        if *flag {
            outlier_indices.push(i);
            outlier_rows.push(*row);
            outlier_values.push(*value);
        }
    }

    Outcome::Available(OutlierResult {
        threshold,
        flags,
        z_scores,
        outlier_indices,
        outlier_rows,
        outlier_values,
    })
}

/// Classic z-score with population standard deviation. A constant sample
/// scores 0 everywhere.
///
/// With `n` values no score can exceed `sqrt(n - 1)`, so a 3-sigma rule needs
/// at least 11 values before it can flag anything.
pub fn z_scores(values: &[f64]) -> Vec<f64> {
    let Some(mean) = mean(values) else {
        return Vec::new();
    };
    let std = population_std(values, mean).unwrap_or(0.0);
    if is_constant(values) || std <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mean) / std).collect()
}

/// Median/MAD based score; falls back to the mean absolute deviation when more
/// than half the values are identical.
pub fn modified_z_scores(values: &[f64]) -> Vec<f64> {
    let Some(med) = median(values) else {
        return Vec::new();
    };
    if is_constant(values) {
        return vec![0.0; values.len()];
    }
    let deviations: Vec<f64> = values.iter().map(|v| (v - med).abs()).collect();
    let mad = median(&deviations).unwrap_or(0.0);

    if mad > 0.0 {
        return values.iter().map(|v| MAD_SCALE * (v - med) / mad).collect();
    }

    let mean_ad = mean(&deviations).unwrap_or(0.0);
    if mean_ad > 0.0 {
        return values
            .iter()
            .map(|v| (v - med) / (MEAN_AD_SCALE * mean_ad))
            .collect();
    }

    vec![0.0; values.len()]
}
