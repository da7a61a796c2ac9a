//! Additive seasonal decomposition of a time-ordered series.

use super::coercion;
use super::types::{DecompositionResult, Outcome, Unavailable};
use crate::error::Result;
use anyhow::anyhow;
use chrono::NaiveDateTime;
use polars::prelude::*;

/// Date/value pairs sorted by date, built fresh for each decomposition.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeriesView {
    pub timestamps: Vec<NaiveDateTime>,
    pub values: Vec<Option<f64>>,
}

impl TimeSeriesView {
    /// Pairs parsed dates with values, drops rows without a date, sorts by date
    /// (stable for equal dates) and forward-fills the values in the new order.
    ///
    /// # Errors
    ///
    /// Propagates polars failures while sorting.
    pub fn build(
        value_name: &str,
        dates: &[Option<NaiveDateTime>],
        values: &[Option<f64>],
    ) -> Result<Self> {
        let (millis, kept): (Vec<i64>, Vec<Option<f64>>) = dates
            .iter()
            .zip(values)
            .filter_map(|(d, v)| d.map(|d| (coercion::to_millis(d), *v)))
            .unzip();

        let df = DataFrame::new(vec![
            Column::new("timestamp".into(), millis),
            Column::new("value".into(), kept),
        ])?
        .sort(
            ["timestamp"],
            SortMultipleOptions::default().with_maintain_order(true),
        )?;

        let timestamps = df
            .column("timestamp")?
            .as_materialized_series()
            .i64()?
            .into_no_null_iter()
            .filter_map(coercion::from_millis)
            .collect();
        let sorted: Vec<Option<f64>> = df
            .column("value")?
            .as_materialized_series()
            .f64()?
            .into_iter()
            .collect();

        let values = coercion::forward_fill(value_name, &sorted)?;
        Ok(Self { timestamps, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Default seasonal period: `min(max_period, rows / 2)`.
pub fn default_period(rows: usize, max_period: usize) -> usize {
    max_period.min(rows / 2)
}

/// Decomposes `view` with the given period.
///
/// Unavailable when the view starts with missing values, when the period is
/// below 2, or when fewer than two full cycles are present.
///
/// # Errors
///
/// Internal consistency failures only; callers downgrade them to
/// [`Unavailable::ComputationFailed`].
pub fn decompose(
    value_name: &str,
    view: TimeSeriesView,
    period: usize,
) -> anyhow::Result<Outcome<DecompositionResult>> {
    let n = view.len();
    if period < 2 || n < 2 * period {
        return Ok(Outcome::Unavailable(Unavailable::InsufficientData {
            required: 2 * period.max(2),
            found: n,
        }));
    }

    let Some(observed) = view.values.iter().copied().collect::<Option<Vec<f64>>>() else {
        return Ok(Outcome::Unavailable(Unavailable::LeadingMissing {
            column: value_name.to_owned(),
        }));
    };

    let trend = centred_moving_average(&observed, period);
    let seasonal = seasonal_component(&observed, &trend, period)?;
    let residual = observed
        .iter()
        .zip(&trend)
        .zip(&seasonal)
        .map(|((x, t), s)| t.map(|t| x - t - s))
        .collect();

    Ok(Outcome::Available(DecompositionResult {
        period,
        timestamps: view.timestamps,
        observed,
        trend,
        seasonal,
        residual,
    }))
}

/// Two-sided moving average with window `period`; even periods use the 2×m
/// filter with half weights at both ends so the window stays centred.
pub fn centred_moving_average(x: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = x.len();
    let half = period / 2;
    let weights: Vec<f64> = if period % 2 == 0 {
        let mut w = vec![1.0; period + 1];
        if let Some(first) = w.first_mut() {
            *first = 0.5;
        }
        if let Some(last) = w.last_mut() {
            *last = 0.5;
        }
        w
    } else {
        vec![1.0; period]
    };

    (0..n)
        .map(|i| {
            if i < half || i + half >= n {
                return None;
            }
            let window = x.get(i - half..=i + half)?;
            let sum: f64 = window.iter().zip(&weights).map(|(v, w)| v * w).sum();
            Some(sum / period as f64)
        })
        .collect()
}

fn seasonal_component(
    observed: &[f64],
    trend: &[Option<f64>],
    period: usize,
) -> anyhow::Result<Vec<f64>> {
    let mut sums = vec![0.0; period];
    let mut counts = vec![0_usize; period];
    for (i, (x, t)) in observed.iter().zip(trend).enumerate() {
        if let Some(t) = t {
            let phase = i % period;
            if let (Some(sum), Some(count)) = (sums.get_mut(phase), counts.get_mut(phase)) {
                *sum += x - t;
                *count += 1;
            }
        }
    }

    let averages = sums
        .iter()
        .zip(&counts)
        .map(|(s, c)| {
            if *c == 0 {
                Err(anyhow!("Seasonal phase has no detrended observations"))
            } else {
                Ok(s / *c as f64)
            }
        })
        .collect::<anyhow::Result<Vec<f64>>>()?;

    let centre = averages.iter().sum::<f64>() / period as f64;
    Ok((0..observed.len())
        .map(|i| averages.get(i % period).map_or(0.0, |a| a - centre))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_period_heuristic() {
        assert_eq!(default_period(100, 12), 12);
        assert_eq!(default_period(10, 12), 5);
        assert_eq!(default_period(3, 12), 1);
    }

    #[test]
    fn test_moving_average_even_period() {
        let x: Vec<f64> = (0..8).map(f64::from).collect();
        let trend = centred_moving_average(&x, 4);
        assert_eq!(trend[0], None);
        assert_eq!(trend[1], None);
        // A linear series is reproduced exactly
        assert_eq!(trend[2], Some(2.0));
        assert_eq!(trend[5], Some(5.0));
        assert_eq!(trend[6], None);
    }

    #[test]
    fn test_moving_average_odd_period() {
        let x = [1.0, 2.0, 6.0, 2.0, 1.0];
        let trend = centred_moving_average(&x, 3);
        assert_eq!(trend, vec![None, Some(3.0), Some(10.0 / 3.0), Some(3.0), None]);
    }

    #[test]
    fn test_view_sorts_and_fills() -> Result<()> {
        let day = |d: u32| {
            chrono::NaiveDate::from_ymd_opt(2024, 1, d).and_then(|d| d.and_hms_opt(0, 0, 0))
        };
        let view = TimeSeriesView::build(
            "v",
            &[day(3), None, day(1), day(2)],
            &[Some(30.0), Some(99.0), Some(10.0), None],
        )?;
        assert_eq!(view.len(), 3);
        assert_eq!(view.timestamps.first().copied(), day(1));
        assert_eq!(view.values, vec![Some(10.0), Some(10.0), Some(30.0)]);
        Ok(())
    }

    #[test]
    fn test_short_series_is_unavailable() -> anyhow::Result<()> {
        let view = TimeSeriesView {
            timestamps: Vec::new(),
            values: vec![Some(1.0); 5],
        };
        let outcome = decompose("v", view, 3)?;
        assert_eq!(
            outcome.unavailable_reason(),
            Some(&Unavailable::InsufficientData {
                required: 6,
                found: 5
            })
        );
        Ok(())
    }
}
