use super::types::{ColumnKind, ColumnProfile, DatasetOverview};
use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use std::collections::HashSet;

// A text column with few distinct values is treated as categorical
const CATEGORICAL_MAX_DISTINCT: usize = 100;
const CATEGORICAL_MAX_RATIO: f64 = 0.05;

/// Immutable tabular dataset with per-column kinds.
///
/// Column names are unique and every column has the same length. No analysis
/// mutates a `Dataset`; operations that need reordered or coerced data build
/// their own view.
#[derive(Clone, Debug)]
pub struct Dataset {
    df: DataFrame,
    kinds: Vec<ColumnKind>,
}

impl Dataset {
    /// Wraps a frame produced by the ingestion layer.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidInput`] when the frame has no columns, repeats a
    /// column name or has columns of different lengths.
    pub fn new(df: DataFrame) -> Result<Self> {
        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        let lengths: Vec<usize> = df.get_columns().iter().map(Column::len).collect();
        validate_shape(&names, &lengths)?;

        let kinds = df.get_columns().iter().map(infer_kind).collect();
        Ok(Self { df, kinds })
    }

    /// Builds a dataset from individual columns.
    ///
    /// # Errors
    ///
    /// Same as [`Dataset::new`].
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let names: Vec<&str> = columns.iter().map(|c| c.name().as_str()).collect();
        let lengths: Vec<usize> = columns.iter().map(Column::len).collect();
        validate_shape(&names, &lengths)?;

        let df = DataFrame::new(columns)
            .map_err(|e| AnalysisError::InvalidInput(format!("Not a valid table: {e}")))?;
        Self::new(df)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn width(&self) -> usize {
        self.df.width()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.as_str())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.df
            .get_column_names()
            .iter()
            .position(|s| s.as_str() == name)
    }

    /// # Errors
    ///
    /// [`AnalysisError::ColumnNotFound`] when `name` is not a column.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.df
            .column(name)
            .map_err(|_| AnalysisError::ColumnNotFound(name.to_owned()))
    }

    /// # Errors
    ///
    /// [`AnalysisError::ColumnNotFound`] when `name` is not a column.
    pub fn kind(&self, name: &str) -> Result<ColumnKind> {
        self.position(name)
            .and_then(|i| self.kinds.get(i).copied())
            .ok_or_else(|| AnalysisError::ColumnNotFound(name.to_owned()))
    }

    /// Checks that every name in `names` is a column, reporting the first that is not.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::ColumnNotFound`] for the first unknown name.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        match names.iter().find(|name| !self.contains(name)) {
            Some(missing) => Err(AnalysisError::ColumnNotFound((*missing).to_owned())),
            None => Ok(()),
        }
    }

    /// Names of numeric-typed columns, in dataset order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.column_names()
            .into_iter()
            .zip(&self.kinds)
            .filter(|(_, kind)| **kind == ColumnKind::Numeric)
            .map(|(name, _)| name)
            .collect()
    }

    pub fn overview(&self) -> DatasetOverview {
        let columns = self
            .df
            .get_columns()
            .iter()
            .zip(&self.kinds)
            .map(|(col, kind)| ColumnProfile {
                name: col.name().to_string(),
                kind: *kind,
                missing: col.null_count(),
            })
            .collect();

        DatasetOverview {
            row_count: self.height(),
            column_count: self.width(),
            columns,
            numeric_columns: self
                .numeric_columns()
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

impl TryFrom<DataFrame> for Dataset {
    type Error = AnalysisError;

    fn try_from(df: DataFrame) -> Result<Self> {
        Self::new(df)
    }
}

fn validate_shape(names: &[&str], lengths: &[usize]) -> Result<()> {
    if names.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Dataset must contain at least one column".to_owned(),
        ));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = names.iter().find(|name| !seen.insert(**name)) {
        return Err(AnalysisError::InvalidInput(format!(
            "Duplicate column name '{dup}'"
        )));
    }

    if let Some(first) = lengths.first()
        && let Some((i, len)) = lengths.iter().enumerate().find(|(_, l)| *l != first)
    {
        let name = names.get(i).copied().unwrap_or_default();
        return Err(AnalysisError::InvalidInput(format!(
            "Column '{name}' has {len} rows, expected {first}"
        )));
    }

    Ok(())
}

pub fn infer_kind(col: &Column) -> ColumnKind {
    let dtype = col.dtype();
    if dtype.is_bool() {
        ColumnKind::Boolean
    } else if dtype.is_primitive_numeric() {
        ColumnKind::Numeric
    } else if dtype.is_temporal() {
        ColumnKind::Temporal
    } else if dtype.is_nested() {
        ColumnKind::Nested
    } else if matches!(dtype, DataType::String) {
        text_or_categorical(col)
    } else {
        ColumnKind::Categorical
    }
}

fn text_or_categorical(col: &Column) -> ColumnKind {
    let series = col.as_materialized_series();
    let present = series.len() - series.null_count();
    let distinct = series.drop_nulls().n_unique().unwrap_or(0);

    let is_categorical = distinct > 0
        && distinct < present
        && (distinct < CATEGORICAL_MAX_DISTINCT
            || (distinct as f64 / present as f64) < CATEGORICAL_MAX_RATIO);

    if is_categorical {
        ColumnKind::Categorical
    } else {
        ColumnKind::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_columns(vec![
            Column::new("id".into(), &[1_i64, 2, 3, 4]),
            Column::new("price".into(), &[Some(9.5), None, Some(3.0), Some(4.0)]),
            Column::new("city".into(), &["SYD", "MEL", "SYD", "SYD"]),
            Column::new("note".into(), &["a", "b", "c", "d"]),
            Column::new("active".into(), &[true, false, true, true]),
        ])
        .expect("valid dataset")
    }

    #[test]
    fn test_kind_inference() {
        let ds = sample();
        assert_eq!(ds.kind("id").ok(), Some(ColumnKind::Numeric));
        assert_eq!(ds.kind("price").ok(), Some(ColumnKind::Numeric));
        assert_eq!(ds.kind("city").ok(), Some(ColumnKind::Categorical));
        assert_eq!(ds.kind("note").ok(), Some(ColumnKind::Text));
        assert_eq!(ds.kind("active").ok(), Some(ColumnKind::Boolean));
        assert!(matches!(
            ds.kind("nope"),
            Err(AnalysisError::ColumnNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_numeric_columns_keep_order() {
        assert_eq!(sample().numeric_columns(), vec!["id", "price"]);
    }

    #[test]
    fn test_overview_counts_missing() {
        let overview = sample().overview();
        assert_eq!(overview.row_count, 4);
        assert_eq!(overview.column_count, 5);
        let price = overview
            .columns
            .iter()
            .find(|c| c.name == "price")
            .expect("price profiled");
        assert_eq!(price.missing, 1);
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let err = Dataset::from_columns(vec![
            Column::new("a".into(), &[1.0, 2.0]),
            Column::new("b".into(), &[1.0]),
        ])
        .expect_err("ragged columns");
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Dataset::from_columns(vec![
            Column::new("a".into(), &[1.0]),
            Column::new("a".into(), &[2.0]),
        ])
        .expect_err("duplicate names");
        assert!(err.to_string().contains("Duplicate column name 'a'"));
    }

    #[test]
    fn test_rejects_empty_frame() {
        assert!(matches!(
            Dataset::new(DataFrame::empty()),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_require_columns_reports_first_missing() {
        let ds = sample();
        assert!(ds.require_columns(&["id", "city"]).is_ok());
        assert!(matches!(
            ds.require_columns(&["id", "ghost", "phantom"]),
            Err(AnalysisError::ColumnNotFound(name)) if name == "ghost"
        ));
    }
}
