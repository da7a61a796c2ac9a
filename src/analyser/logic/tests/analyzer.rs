use super::*;

fn shop() -> Dataset {
    dataset(vec![
        Column::new(
            "date".into(),
            &["2024-01-05", "2024-01-06", "2024-01-07", "2024-01-08"],
        ),
        Column::new("revenue".into(), &[Some(120.0), Some(95.5), None, Some(130.25)]),
        Column::new("units".into(), &[12_i64, 9, 11, 13]),
        Column::new("store".into(), &["north", "south", "north", "north"]),
    ])
}

#[test]
fn test_analyzer_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Analyzer<'static>>();

    let ds = shop();
    let analyzer = Analyzer::new(&ds);
    std::thread::scope(|scope| {
        let stats = scope.spawn(|| analyzer.basic_stats("revenue"));
        let matrix = scope.spawn(|| analyzer.correlation_analysis(None));
        assert!(stats.join().expect("thread finished").is_ok());
        assert!(matrix.join().expect("thread finished").is_ok());
    });
}

#[test]
fn test_invalid_settings_are_rejected() {
    let ds = shop();
    let settings = AnalysisSettings {
        outlier_z_threshold: -1.0,
        ..AnalysisSettings::default()
    };
    assert!(matches!(
        Analyzer::with_settings(&ds, settings),
        Err(AnalysisError::Config(_))
    ));
}

#[test]
fn test_overview_describes_columns() {
    let ds = shop();
    let overview = Analyzer::new(&ds).overview();

    assert_eq!(overview.row_count, 4);
    assert_eq!(overview.column_count, 4);
    assert_eq!(overview.numeric_columns, vec!["revenue", "units"]);

    let kinds: Vec<(&str, ColumnKind, usize)> = overview
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c.kind, c.missing))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("date", ColumnKind::Text, 0),
            ("revenue", ColumnKind::Numeric, 1),
            ("units", ColumnKind::Numeric, 0),
            ("store", ColumnKind::Categorical, 0),
        ]
    );
}

#[test]
fn test_queries_are_independent_of_each_other() -> anyhow::Result<()> {
    let ds = shop();
    let analyzer = Analyzer::new(&ds);

    let before = analyzer.basic_stats("revenue")?;
    let _ = analyzer.time_series_analysis("date", "revenue")?;
    let _ = analyzer.perform_pca(&["revenue", "units"], None)?;
    let _ = analyzer.outlier_detection("units")?;
    let after = analyzer.basic_stats("revenue")?;

    assert_eq!(before, after);
    assert_eq!(
        ds.column("revenue")?.null_count(),
        1,
        "dataset must not be filled in place"
    );
    Ok(())
}

#[test]
fn test_unavailable_outcome_serializes_with_reason() -> anyhow::Result<()> {
    let ds = shop();
    let outcome = Analyzer::new(&ds).correlation_analysis(Some(&["store"][..]))?;
    let json = serde_json::to_value(&outcome)?;
    assert_eq!(json["status"], "unavailable");
    assert_eq!(json["value"]["reason"], "no_numeric_columns");
    Ok(())
}
