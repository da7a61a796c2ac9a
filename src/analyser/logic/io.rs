//! Loading uploaded files into a frame the analyzer can use.

use super::coercion;
use anyhow::{Context as _, Result};
use polars::prelude::*;
use std::path::Path;

// A text column becomes temporal when at least this share of its values parse
const TEMPORAL_PARSE_RATIO: f64 = 0.5;

pub fn load_df(path: &Path) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let df = match ext.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_has_header(true)
            .finish()?
            .collect()
            .context("Failed to read CSV")?,
        "parquet" => ParquetReader::new(std::fs::File::open(path)?)
            .finish()
            .context("Failed to read Parquet")?,
        "json" => JsonReader::new(std::fs::File::open(path)?)
            .finish()
            .context("Failed to read JSON")?,
        _ => return Err(anyhow::anyhow!("Unsupported file extension: {ext}")),
    };

    tracing::debug!(
        "Loaded {} ({} rows, {} columns)",
        path.display(),
        df.height(),
        df.width()
    );

    try_parse_temporal_columns(df)
}

/// Converts text columns that mostly hold dates into millisecond datetimes.
///
/// Cells that do not parse become missing.
pub fn try_parse_temporal_columns(df: DataFrame) -> Result<DataFrame> {
    let mut df = df;
    let candidates: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| matches!(c.dtype(), DataType::String))
        .map(|c| c.name().to_string())
        .collect();

    for name in candidates {
        let parsed: Vec<Option<i64>> = df
            .column(&name)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|cell| {
                cell.and_then(coercion::parse_datetime)
                    .map(coercion::to_millis)
            })
            .collect();

        let present = df.column(&name)?.len() - df.column(&name)?.null_count();
        let parsed_count = parsed.iter().flatten().count();
        if present == 0 || (parsed_count as f64) < present as f64 * TEMPORAL_PARSE_RATIO {
            continue;
        }

        let series = Series::new(name.as_str().into(), parsed)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        df.replace(&name, series)?;
        tracing::debug!("Parsed column '{name}' as datetime");
    }

    Ok(df)
}
