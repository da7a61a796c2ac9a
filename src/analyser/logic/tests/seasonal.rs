use super::*;
use crate::analyser::logic::decomposition::{self, TimeSeriesView};
use std::f64::consts::PI;

const MONTHS: usize = 96;

fn true_trend(t: usize) -> f64 {
    10.0 + 0.5 * t as f64
}

fn true_seasonal(t: usize) -> f64 {
    3.0 * (2.0 * PI * t as f64 / 12.0).sin()
}

// Deterministic noise in [-0.1, 0.1]
fn noise(t: usize) -> f64 {
    0.05 * (((t * 7) % 5) as f64 - 2.0)
}

fn month_label(t: usize) -> String {
    format!("{}-{:02}-01", 2015 + t / 12, t % 12 + 1)
}

/// Monthly series stored newest first, so the analysis has to sort it.
fn monthly_sales() -> Dataset {
    let dates: Vec<String> = (0..MONTHS).rev().map(month_label).collect();
    let sales: Vec<f64> = (0..MONTHS)
        .rev()
        .map(|t| true_trend(t) + true_seasonal(t) + noise(t))
        .collect();
    dataset(vec![
        Column::new("month".into(), dates),
        Column::new("sales".into(), sales),
    ])
}

#[test]
fn test_decomposition_recovers_trend_and_season() -> anyhow::Result<()> {
    let ds = monthly_sales();
    let result = Analyzer::new(&ds)
        .time_series_analysis("month", "sales")?
        .available()
        .expect("96 months is plenty");

    assert_eq!(result.period, 12);
    assert_eq!(result.len(), MONTHS);
    assert!(result.timestamps.windows(2).all(|w| w[0] < w[1]));

    for t in 0..MONTHS {
        let seasonal = result.seasonal[t];
        assert_close(seasonal, true_seasonal(t), 0.25);

        match (result.trend[t], result.residual[t]) {
            (Some(trend), Some(residual)) => {
                assert_close(trend, true_trend(t), 0.15);
                assert_close(result.observed[t], trend + seasonal + residual, 1e-9);
            }
            (None, None) => assert!(t < 6 || t >= MONTHS - 6, "missing trend at {t}"),
            other => panic!("trend and residual disagree at {t}: {other:?}"),
        }
    }
    Ok(())
}

#[test]
fn test_seasonal_component_is_centred() -> anyhow::Result<()> {
    let ds = monthly_sales();
    let result = Analyzer::new(&ds)
        .time_series_analysis("month", "sales")?
        .available()
        .expect("decomposition available");

    let one_cycle: f64 = result.seasonal.iter().take(12).sum();
    assert_close(one_cycle, 0.0, 1e-9);
    assert_close(result.seasonal[0], result.seasonal[12], 1e-12);
    Ok(())
}

#[test]
fn test_dataset_order_is_untouched() -> anyhow::Result<()> {
    let ds = monthly_sales();
    let before = ds.frame().clone();
    let _ = Analyzer::new(&ds).time_series_analysis("month", "sales")?;
    assert!(ds.frame().equals_missing(&before));
    Ok(())
}

#[test]
fn test_configured_period_is_used() -> anyhow::Result<()> {
    let ds = monthly_sales();
    let settings = AnalysisSettings {
        seasonal_period: Some(4),
        ..AnalysisSettings::default()
    };
    let result = analyzer_with(&ds, settings)
        .time_series_analysis("month", "sales")?
        .available()
        .expect("decomposition available");
    assert_eq!(result.period, 4);
    assert_eq!(result.trend.iter().filter(|t| t.is_none()).count(), 4);
    Ok(())
}

#[test]
fn test_short_series_is_insufficient() -> anyhow::Result<()> {
    let ds = dataset(vec![
        Column::new("day".into(), &["2024-01-01", "2024-01-02", "2024-01-03"]),
        Column::new("v".into(), &[1.0, 2.0, 3.0]),
    ]);
    let outcome = Analyzer::new(&ds).time_series_analysis("day", "v")?;
    assert_eq!(
        outcome.unavailable_reason(),
        Some(&Unavailable::InsufficientData {
            required: 4,
            found: 3
        })
    );

    let settings = AnalysisSettings {
        seasonal_period: Some(2),
        ..AnalysisSettings::default()
    };
    let outcome = analyzer_with(&ds, settings).time_series_analysis("day", "v")?;
    assert!(matches!(
        outcome.unavailable_reason(),
        Some(Unavailable::InsufficientData { found: 3, .. })
    ));
    Ok(())
}

#[test]
fn test_leading_missing_value_is_unavailable() -> anyhow::Result<()> {
    let ds = dataset(vec![
        Column::new(
            "day".into(),
            &["2024-01-02", "2024-01-01", "2024-01-03", "2024-01-04"],
        ),
        Column::new("v".into(), &[Some(2.0), None, Some(3.0), Some(4.0)]),
    ]);
    let outcome = Analyzer::new(&ds).time_series_analysis("day", "v")?;
    assert_eq!(
        outcome.unavailable_reason(),
        Some(&Unavailable::LeadingMissing {
            column: "v".to_owned()
        })
    );
    Ok(())
}

#[test]
fn test_rows_without_dates_are_dropped() -> anyhow::Result<()> {
    let ds = dataset(vec![
        Column::new(
            "day".into(),
            &[
                Some("2024-01-01"),
                None,
                Some("2024-01-02"),
                Some("2024-01-03"),
                Some("2024-01-04"),
            ],
        ),
        Column::new("v".into(), &[1.0, 50.0, 2.0, 1.0, 2.0]),
    ]);
    let result = Analyzer::new(&ds)
        .time_series_analysis("day", "v")?
        .available()
        .expect("four dated rows, period 2");
    assert_eq!(result.period, 2);
    assert_eq!(result.observed, vec![1.0, 2.0, 1.0, 2.0]);
    Ok(())
}

#[test]
fn test_default_period_counts_dated_rows_only() -> anyhow::Result<()> {
    let mut days: Vec<Option<String>> = (1..=9)
        .map(|d| Some(format!("2024-03-{d:02}")))
        .collect();
    days.insert(3, None);
    let values: Vec<f64> = (0_u32..10).map(|v| f64::from(v % 4)).collect();
    let ds = dataset(vec![
        Column::new("day".into(), days),
        Column::new("v".into(), values),
    ]);

    let result = Analyzer::new(&ds)
        .time_series_analysis("day", "v")?
        .available()
        .expect("nine dated rows");
    // Nine dated rows out of ten: 9 / 2 = 4, not 10 / 2 = 5
    assert_eq!(result.period, 4);
    assert_eq!(result.len(), 9);
    Ok(())
}

#[test]
fn test_bad_date_columns_are_errors() {
    let ds = dataset(vec![
        Column::new("n".into(), &[1_i64, 2, 3, 4]),
        Column::new("when".into(), &["2024-01-01", "soon", "later", "never"]),
        Column::new("v".into(), &[1.0, 2.0, 3.0, 4.0]),
    ]);
    let analyzer = Analyzer::new(&ds);

    assert!(matches!(
        analyzer.time_series_analysis("n", "v"),
        Err(AnalysisError::InvalidInput(_))
    ));
    assert!(matches!(
        analyzer.time_series_analysis("when", "v"),
        Err(AnalysisError::InvalidInput(_))
    ));
    assert!(matches!(
        analyzer.time_series_analysis("date", "v"),
        Err(AnalysisError::ColumnNotFound(name)) if name == "date"
    ));
    assert!(matches!(
        analyzer.time_series_analysis("when", "value"),
        Err(AnalysisError::ColumnNotFound(name)) if name == "value"
    ));
}

#[test]
fn test_equal_dates_keep_row_order() -> anyhow::Result<()> {
    let day = |d: u32| {
        chrono::NaiveDate::from_ymd_opt(2024, 5, d).and_then(|d| d.and_hms_opt(0, 0, 0))
    };
    let view = TimeSeriesView::build(
        "v",
        &[day(2), day(1), day(2), day(1)],
        &[Some(3.0), Some(1.0), Some(4.0), Some(2.0)],
    )?;
    assert_eq!(view.values, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    Ok(())
}

#[test]
fn test_linear_series_has_flat_season() -> anyhow::Result<()> {
    let view = TimeSeriesView {
        timestamps: Vec::new(),
        values: (0_u32..24).map(|t| Some(f64::from(t) * 2.0)).collect(),
    };
    let result = decomposition::decompose("v", view, 6)?
        .available()
        .expect("24 points, period 6");
    assert!(result.seasonal.iter().all(|s| s.abs() < 1e-9));
    assert!(
        result
            .residual
            .iter()
            .flatten()
            .all(|r| r.abs() < 1e-9)
    );
    Ok(())
}
