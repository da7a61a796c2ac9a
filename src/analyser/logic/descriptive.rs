//! Descriptive statistics of a single column.
//!
//! Moment estimators follow the bias-corrected sample definitions used by most
//! dataframe libraries: sample standard deviation (ddof 1), adjusted
//! Fisher-Pearson skewness and excess kurtosis with small-sample correction.

use super::types::{DescriptiveStats, Outcome, Unavailable};
use crate::utils::round_to;

// Sums below this are treated as floating point noise
const FP_NOISE: f64 = 1e-14;

pub fn describe(column: &str, values: &[Option<f64>]) -> Outcome<DescriptiveStats> {
    let clean: Vec<f64> = values.iter().flatten().copied().collect();
    let missing_values = values.len() - clean.len();

    let Some(mean) = mean(&clean) else {
        return Outcome::Unavailable(Unavailable::NoNumericData {
            column: column.to_owned(),
        });
    };
    let Some(median) = median(&clean) else {
        return Outcome::Unavailable(Unavailable::NoNumericData {
            column: column.to_owned(),
        });
    };

    Outcome::Available(DescriptiveStats {
        mean: round_to(mean, 2),
        median: round_to(median, 2),
        std: sample_std(&clean, mean).map(|v| round_to(v, 2)),
        skew: skewness(&clean, mean).map(|v| round_to(v, 2)),
        kurtosis: excess_kurtosis(&clean, mean).map(|v| round_to(v, 2)),
        missing_values,
        count: clean.len(),
    })
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// True when every value equals the first one. Exact, unlike a spread
/// computed around a rounded mean.
pub fn is_constant<'a>(values: impl IntoIterator<Item = &'a f64>) -> bool {
    let mut iter = values.into_iter();
    match iter.next() {
        Some(first) => iter.all(|v| v == first),
        None => true,
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted.get(mid).copied()
    } else {
        let lo = sorted.get(mid.checked_sub(1)?)?;
        let hi = sorted.get(mid)?;
        Some(f64::midpoint(*lo, *hi))
    }
}

/// Population standard deviation (ddof 0).
pub fn population_std(values: &[f64], mean: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some((central_sum(values, mean, 2) / values.len() as f64).sqrt())
}

pub fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    if is_constant(values) {
        return Some(0.0);
    }
    Some((central_sum(values, mean, 2) / (values.len() - 1) as f64).sqrt())
}

pub fn skewness(values: &[f64], mean: f64) -> Option<f64> {
    let n = values.len() as f64;
    if values.len() < 3 {
        return None;
    }
    if is_constant(values) {
        return Some(0.0);
    }
    let m2 = zero_noise(central_sum(values, mean, 2));
    let m3 = zero_noise(central_sum(values, mean, 3));
    if m2 == 0.0 {
        return Some(0.0);
    }
    Some((n * (n - 1.0).sqrt() / (n - 2.0)) * (m3 / m2.powf(1.5)))
}

pub fn excess_kurtosis(values: &[f64], mean: f64) -> Option<f64> {
    let n = values.len() as f64;
    if values.len() < 4 {
        return None;
    }
    if is_constant(values) {
        return Some(0.0);
    }
    let m2 = zero_noise(central_sum(values, mean, 2));
    let m4 = zero_noise(central_sum(values, mean, 4));
    if m2 == 0.0 {
        return Some(0.0);
    }
    let adj = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    let numerator = n * (n + 1.0) * (n - 1.0) * m4;
    let denominator = (n - 2.0) * (n - 3.0) * m2.powi(2);
    Some(numerator / denominator - adj)
}

fn central_sum(values: &[f64], mean: f64, power: i32) -> f64 {
    values.iter().map(|v| (v - mean).powi(power)).sum()
}

fn zero_noise(v: f64) -> f64 {
    if v.abs() < FP_NOISE { 0.0 } else { v }
}
