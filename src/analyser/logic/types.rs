use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Kind of a dataset column, resolved once when the [`Dataset`](super::dataset::Dataset)
/// is built.
#[derive(Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, Debug)]
pub enum ColumnKind {
    Numeric,
    Text,
    Categorical,
    Temporal,
    Boolean,
    Nested,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::Text => "Text",
            Self::Categorical => "Categorical",
            Self::Temporal => "Temporal",
            Self::Boolean => "Boolean",
            Self::Nested => "Nested",
        }
    }

    /// Whether values of this kind may turn into numbers under coercion.
    ///
    /// Text and categorical columns qualify because individual cells may hold
    /// numeric strings; cells that do not parse become missing.
    pub fn is_numeric_coercible(&self) -> bool {
        matches!(
            self,
            Self::Numeric | Self::Boolean | Self::Text | Self::Categorical
        )
    }
}

/// Why an analysis produced no result.
///
/// These are expected outcomes for valid but unsuitable data and are never raised
/// as errors.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq, Debug)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Unavailable {
    /// The column has no value that coerces to a number
    NoNumericData { column: String },
    /// The selection contains no numeric-typed column
    NoNumericColumns,
    /// A column cannot be treated as numeric at all
    NonNumericColumn { column: String },
    /// The column starts with missing values that forward-fill cannot repair
    LeadingMissing { column: String },
    /// Not enough observations for the requested computation
    InsufficientData { required: usize, found: usize },
    /// Every selected column is constant
    ZeroVariance,
    /// A numerical routine failed internally
    ComputationFailed { message: String },
}

impl std::fmt::Display for Unavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoNumericData { column } => {
                write!(f, "Column '{column}' has no numeric values")
            }
            Self::NoNumericColumns => write!(f, "No numeric columns available"),
            Self::NonNumericColumn { column } => {
                write!(f, "Column '{column}' is not numeric")
            }
            Self::LeadingMissing { column } => write!(
                f,
                "Column '{column}' begins with missing values that cannot be filled"
            ),
            Self::InsufficientData { required, found } => write!(
                f,
                "Insufficient data: {required} observations required, {found} available"
            ),
            Self::ZeroVariance => write!(f, "Selected data has no variance"),
            Self::ComputationFailed { message } => write!(f, "Computation failed: {message}"),
        }
    }
}

/// Result of an analysis that may legitimately have nothing to show.
#[must_use = "an analysis may be unavailable; handle both cases"]
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    Available(T),
    Unavailable(Unavailable),
}

impl<T> Outcome<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn available(self) -> Option<T> {
        match self {
            Self::Available(v) => Some(v),
            Self::Unavailable(_) => None,
        }
    }

    pub fn as_available(&self) -> Option<&T> {
        match self {
            Self::Available(v) => Some(v),
            Self::Unavailable(_) => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&Unavailable> {
        match self {
            Self::Available(_) => None,
            Self::Unavailable(reason) => Some(reason),
        }
    }

    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Available(v) => Outcome::Available(f(v)),
            Self::Unavailable(reason) => Outcome::Unavailable(reason),
        }
    }
}

/// Descriptive statistics of one column, rounded to 2 decimal places.
///
/// Moments that are undefined for the sample size are `None`: the standard
/// deviation needs 2 values, skewness 3 and kurtosis 4.
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
pub struct DescriptiveStats {
    pub mean: f64,
    pub median: f64,
    pub std: Option<f64>,
    pub skew: Option<f64>,
    pub kurtosis: Option<f64>,
    pub missing_values: usize,
    pub count: usize,
}

impl DescriptiveStats {
    pub fn missing_pct(&self) -> f64 {
        let total = self.count + self.missing_values;
        if total == 0 {
            0.0
        } else {
            (self.missing_values as f64 / total as f64) * 100.0
        }
    }

    /// Short plain-language reading of the distribution shape.
    pub fn interpretation(&self) -> Vec<&'static str> {
        let mut signals = Vec::new();

        let missing_pct = self.missing_pct();
        if self.missing_values == 0 {
            signals.push("No missing values.");
        } else if missing_pct > 15.0 {
            signals.push("Significant missing data; results may be biased.");
        } else if missing_pct > 5.0 {
            signals.push("Material amount of missing data.");
        }

        if let Some(skew) = self.skew {
            if skew.abs() < 0.5 {
                signals.push("Roughly symmetric distribution.");
            } else if skew > 0.0 {
                signals.push("Right-skewed; the mean is pulled up by high values.");
            } else {
                signals.push("Left-skewed; the mean is pulled down by low values.");
            }
        }

        if let Some(kurtosis) = self.kurtosis
            && kurtosis > 3.0
        {
            signals.push("Heavy tails; expect extreme values.");
        }

        if self.std == Some(0.0) {
            signals.push("Column is constant.");
        }

        signals
    }
}

/// Pairwise Pearson correlations between numeric columns.
///
/// Entry `(i, j)` is `None` when the pair has fewer than two complete observations
/// or either side is constant over those observations.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.data.get(i)?.get(j).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Principal component projection of standardized columns.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct PcaResult {
    pub columns: Vec<String>,
    /// One row per dataset row, one entry per retained component
    pub scores: Vec<Vec<f64>>,
    /// Descending; sums to at most 1
    pub explained_variance_ratio: Vec<f64>,
    pub explained_variance: Vec<f64>,
    /// Loadings, one row per component, one entry per column
    pub components: Vec<Vec<f64>>,
}

impl PcaResult {
    pub fn n_components(&self) -> usize {
        self.explained_variance_ratio.len()
    }
}

/// Additive decomposition `observed = trend + seasonal + residual` over a
/// time-sorted view of the dataset.
///
/// Trend and residual are `None` where the centred moving average has no full
/// window (`period / 2` points at each end).
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct DecompositionResult {
    pub period: usize,
    pub timestamps: Vec<NaiveDateTime>,
    pub observed: Vec<f64>,
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
}

impl DecompositionResult {
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }
}

/// Z-score outliers of one column.
///
/// `flags`, `z_scores` and `outlier_indices` refer to the cleaned subset (the
/// column with missing and non-numeric cells dropped), not to dataset rows. Use
/// `outlier_rows` for row positions in the dataset.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct OutlierResult {
    pub threshold: f64,
    pub flags: Vec<bool>,
    pub z_scores: Vec<f64>,
    pub outlier_indices: Vec<usize>,
    pub outlier_rows: Vec<usize>,
    pub outlier_values: Vec<f64>,
}

impl OutlierResult {
    pub fn outlier_count(&self) -> usize {
        self.outlier_indices.len()
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
}

/// Shape of a dataset as shown before any analysis is picked.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct DatasetOverview {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnProfile>,
    pub numeric_columns: Vec<String>,
}
