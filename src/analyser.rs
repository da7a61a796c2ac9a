//! The dataset analyzer behind the dashboard's analysis panels.
//!
//! An [`Analyzer`] borrows one [`Dataset`] and answers five independent
//! queries about it. Every query returns `Result<Outcome<T>>`:
//!
//! - `Err(AnalysisError::ColumnNotFound | InvalidInput)` when the request itself
//!   is wrong (unknown column, empty selection, unparseable date column);
//! - `Ok(Outcome::Unavailable(reason))` when the data cannot support the
//!   analysis (all values missing, series too short, no variance), including any
//!   internal numeric failure;
//! - `Ok(Outcome::Available(result))` otherwise.
//!
//! No query modifies the dataset, so one analyzer can serve any number of
//! readers, including from several threads.
//!
//! ```
//! use dashlab::analyser::Analyzer;
//! use dashlab::analyser::logic::{Dataset, Outcome};
//! use polars::prelude::*;
//!
//! # fn main() -> dashlab::error::Result<()> {
//! let dataset = Dataset::from_columns(vec![
//!     Column::new("a".into(), &[1.0, 2.0, 3.0]),
//!     Column::new("b".into(), &[2.0, 4.0, 6.0]),
//! ])?;
//! let analyzer = Analyzer::new(&dataset);
//!
//! match analyzer.correlation_analysis(Some(&["a", "b"][..]))? {
//!     Outcome::Available(matrix) => assert!(matrix.get("a", "b").is_some()),
//!     Outcome::Unavailable(reason) => println!("nothing to show: {reason}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod logic;

use crate::config::AnalysisSettings;
use crate::error::{AnalysisError, Result};
use logic::coercion;
use logic::decomposition::{self, TimeSeriesView};
use logic::types::{
    ColumnKind, CorrelationMatrix, DatasetOverview, DecompositionResult, DescriptiveStats,
    OutlierResult, Outcome, PcaResult, Unavailable,
};
use logic::{Dataset, correlation, descriptive, outliers, pca};
use ndarray::Array2;

/// Read-only analysis session over one dataset.
#[derive(Clone, Debug)]
pub struct Analyzer<'a> {
    dataset: &'a Dataset,
    settings: AnalysisSettings,
}

impl<'a> Analyzer<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            settings: AnalysisSettings::default(),
        }
    }

    /// # Errors
    ///
    /// [`AnalysisError::Config`] when `settings` fail validation.
    pub fn with_settings(dataset: &'a Dataset, settings: AnalysisSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { dataset, settings })
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn overview(&self) -> DatasetOverview {
        self.dataset.overview()
    }

    /// Mean, median, std, skew and kurtosis (2 dp) plus missing and valid counts.
    ///
    /// Values that do not coerce to numbers count as missing. Date and nested
    /// columns are unavailable.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::ColumnNotFound`] when `column` is not in the dataset.
    pub fn basic_stats(&self, column: &str) -> Result<Outcome<DescriptiveStats>> {
        let col = self.dataset.column(column)?;
        if let Some(reason) = self.not_coercible(column)? {
            return Ok(Outcome::Unavailable(reason));
        }
        tracing::debug!("Computing descriptive statistics for '{column}'");

        Ok(soften("basic_stats", || {
            let values = coercion::to_f64_values(col)?;
            Ok(descriptive::describe(column, &values))
        }))
    }

    /// Pairwise Pearson correlation between numeric columns.
    ///
    /// With `None` every numeric column takes part; otherwise the numeric subset of
    /// `columns`, in the given order. Missing values are excluded pair by pair.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::ColumnNotFound`] when any selected column is not in the
    /// dataset.
    pub fn correlation_analysis(
        &self,
        columns: Option<&[&str]>,
    ) -> Result<Outcome<CorrelationMatrix>> {
        let selected: Vec<&str> = match columns {
            Some(names) => {
                self.dataset.require_columns(names)?;
                names
                    .iter()
                    .copied()
                    .filter(|name| self.dataset.kind(name).ok() == Some(ColumnKind::Numeric))
                    .collect()
            }
            None => self.dataset.numeric_columns(),
        };

        if selected.is_empty() {
            return Ok(Outcome::Unavailable(Unavailable::NoNumericColumns));
        }
        tracing::debug!("Correlating {} numeric columns", selected.len());

        Ok(soften("correlation_analysis", || {
            let values = selected
                .iter()
                .map(|name| coercion::to_f64_values(self.dataset.column(name)?))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let names = selected.iter().map(|s| (*s).to_owned()).collect();
            Ok(Outcome::Available(correlation::correlation_matrix(
                names, &values,
            )))
        }))
    }

    /// Projects the standardized `columns` onto their leading principal components.
    ///
    /// Keeps `min(n_components, columns.len())` components; `None` uses the
    /// configured default (2). Missing values are forward-filled first.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::ColumnNotFound`] for unknown columns,
    /// [`AnalysisError::InvalidInput`] for an empty selection or zero components.
    pub fn perform_pca(
        &self,
        columns: &[&str],
        n_components: Option<usize>,
    ) -> Result<Outcome<PcaResult>> {
        self.dataset.require_columns(columns)?;
        if columns.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "PCA needs at least one column".to_owned(),
            ));
        }
        let n_components = n_components.unwrap_or(self.settings.default_pca_components);
        if n_components == 0 {
            return Err(AnalysisError::InvalidInput(
                "n_components must be at least 1".to_owned(),
            ));
        }

        for name in columns {
            let kind = self.dataset.kind(name)?;
            if !matches!(kind, ColumnKind::Numeric | ColumnKind::Boolean) {
                return Ok(Outcome::Unavailable(Unavailable::NonNumericColumn {
                    column: (*name).to_owned(),
                }));
            }
        }
        tracing::debug!(
            "Running PCA on {} columns with {n_components} components",
            columns.len()
        );

        Ok(soften("perform_pca", || {
            let rows = self.dataset.height();
            let mut flat = Vec::with_capacity(rows * columns.len());
            for name in columns {
                let values = coercion::to_f64_values(self.dataset.column(name)?)?;
                let filled = coercion::forward_fill(name, &values)?;
                let Some(complete) = filled.into_iter().collect::<Option<Vec<f64>>>() else {
                    return Ok(Outcome::Unavailable(Unavailable::LeadingMissing {
                        column: (*name).to_owned(),
                    }));
                };
                flat.extend(complete);
            }

            // Filled column by column, so build columns × rows and transpose
            let data = Array2::from_shape_vec((columns.len(), rows), flat)?.reversed_axes();
            let names = columns.iter().map(|s| (*s).to_owned()).collect();
            pca::fit_transform(names, &data, n_components)
        }))
    }

    /// Additive trend/seasonal/residual decomposition of `value_column` over
    /// `date_column`.
    ///
    /// Works on a new date-sorted view; the dataset keeps its row order. Rows
    /// without a date are left out. The period is the configured
    /// `seasonal_period`, or `min(max_seasonal_period, n / 2)` when unset, where
    /// `n` counts the dated rows of the view rather than every dataset row. The
    /// decomposition needs at least two full periods; below roughly four it is
    /// computed but unreliable.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::ColumnNotFound`] for unknown columns,
    /// [`AnalysisError::InvalidInput`] when `date_column` does not hold dates.
    pub fn time_series_analysis(
        &self,
        date_column: &str,
        value_column: &str,
    ) -> Result<Outcome<DecompositionResult>> {
        let date_col = self.dataset.column(date_column)?;
        let value_col = self.dataset.column(value_column)?;
        let dates = coercion::to_datetimes(date_col)?;

        Ok(soften("time_series_analysis", || {
            let values = coercion::to_f64_values(value_col)?;
            let view = TimeSeriesView::build(value_column, &dates, &values)?;

            let period = self.settings.seasonal_period.unwrap_or_else(|| {
                decomposition::default_period(view.len(), self.settings.max_seasonal_period)
            });
            if period >= 2 && view.len() < 4 * period {
                tracing::warn!(
                    "Decomposing '{value_column}' with only {} observations for period {period}; \
                     fewer than four cycles gives unreliable components",
                    view.len()
                );
            }

            decomposition::decompose(value_column, view, period)
        }))
    }

    /// Flags values whose score exceeds the configured threshold (3.0 by default).
    ///
    /// Missing and non-numeric cells are dropped first. `flags`, `z_scores` and
    /// `outlier_indices` in the result are positions in that cleaned subset;
    /// `outlier_rows` are the matching dataset rows.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::ColumnNotFound`] when `column` is not in the dataset.
    pub fn outlier_detection(&self, column: &str) -> Result<Outcome<OutlierResult>> {
        let col = self.dataset.column(column)?;
        if let Some(reason) = self.not_coercible(column)? {
            return Ok(Outcome::Unavailable(reason));
        }
        tracing::debug!(
            "Detecting outliers in '{column}' using {} > {}",
            self.settings.outlier_method.as_str(),
            self.settings.outlier_z_threshold
        );

        Ok(soften("outlier_detection", || {
            let values = coercion::to_f64_values(col)?;
            Ok(outliers::detect(
                column,
                &values,
                self.settings.outlier_method,
                self.settings.outlier_z_threshold,
            ))
        }))
    }

    // Dates and nested values would coerce to meaningless numbers
    fn not_coercible(&self, column: &str) -> Result<Option<Unavailable>> {
        let kind = self.dataset.kind(column)?;
        Ok((!kind.is_numeric_coercible()).then(|| Unavailable::NonNumericColumn {
            column: column.to_owned(),
        }))
    }
}

/// Runs `compute`, turning internal failures into [`Unavailable::ComputationFailed`].
fn soften<T, F>(operation: &str, compute: F) -> Outcome<T>
where
    F: FnOnce() -> anyhow::Result<Outcome<T>>,
{
    match compute() {
        Ok(outcome) => {
            if let Outcome::Unavailable(reason) = &outcome {
                tracing::info!("{operation} unavailable: {reason}");
            }
            outcome
        }
        Err(e) => {
            tracing::warn!("{operation} failed: {e:#}");
            Outcome::Unavailable(Unavailable::ComputationFailed {
                message: format!("{e:#}"),
            })
        }
    }
}
