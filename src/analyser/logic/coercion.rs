//! Conversion of raw column values to the kinds the analyses work on.
//!
//! Numeric coercion never fails on individual cells: anything that does not parse
//! becomes missing. Datetime coercion is stricter because a date column that does
//! not parse means the caller picked the wrong column.

use crate::error::{AnalysisError, Result};
use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

// Month-first before day-first, matching the usual spreadsheet export
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%b %d %Y",
    "%d %b %Y", "%B %d, %Y",
];

/// Casts a column to `f64`, turning unparseable cells and NaN into `None`.
pub fn to_f64_values(col: &Column) -> anyhow::Result<Vec<Option<f64>>> {
    let series = col.as_materialized_series();
    let cast = series
        .cast(&DataType::Float64)
        .map_err(|e| anyhow!("Cannot coerce '{}' to numbers: {e}", series.name()))?;
    let ca = cast.f64().map_err(|e| anyhow!(e))?;
    Ok(ca
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Forward-fills missing values along row order.
///
/// A leading run of missing values has nothing to copy and stays missing.
pub fn forward_fill(name: &str, values: &[Option<f64>]) -> anyhow::Result<Vec<Option<f64>>> {
    let series = Series::new(name.into(), values.to_vec());
    let filled = series
        .fill_null(FillNullStrategy::Forward(None))
        .map_err(|e| anyhow!("Forward fill failed for '{name}': {e}"))?;
    Ok(filled.f64().map_err(|e| anyhow!(e))?.into_iter().collect())
}

/// Parses a single date or datetime string.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // Monthly data is often written as "2024-03"
    if s.len() == 7
        && let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
    {
        return d.and_hms_opt(0, 0, 0);
    }

    None
}

pub fn from_millis(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

pub fn to_millis(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_millis()
}

/// Converts a temporal or date-like text column to datetimes.
///
/// Missing cells stay `None`. Any present cell that cannot be read as a date is an
/// [`AnalysisError::InvalidInput`].
pub fn to_datetimes(col: &Column) -> Result<Vec<Option<NaiveDateTime>>> {
    let series = col.as_materialized_series();
    let dtype = series.dtype();

    if dtype.is_temporal() {
        let millis = series
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
            .cast(&DataType::Int64)?;
        return Ok(millis
            .i64()?
            .into_iter()
            .map(|v| v.and_then(from_millis))
            .collect());
    }

    if !matches!(dtype, DataType::String) {
        return Err(AnalysisError::InvalidInput(format!(
            "Column '{}' of type {dtype} cannot be parsed as dates",
            series.name()
        )));
    }

    series
        .str()?
        .into_iter()
        .map(|cell| match cell {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_datetime(raw).map(Some).ok_or_else(|| {
                AnalysisError::InvalidInput(format!(
                    "Value '{raw}' in column '{}' is not a recognizable date",
                    series.name()
                ))
            }),
        })
        .collect()
}
