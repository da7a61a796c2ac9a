//! Core analysis algorithms.
//!
//! Each submodule works on plain values (`&[Option<f64>]`, `ndarray` matrices)
//! extracted from a [`Dataset`]; [`Analyzer`](crate::analyser::Analyzer) does the
//! column validation and extraction.

pub mod coercion;
pub mod correlation;
pub mod dataset;
pub mod decomposition;
pub mod descriptive;
pub mod io;
pub mod outliers;
pub mod pca;
pub mod types;

pub use dataset::Dataset;
pub use io::load_df;
pub use types::{
    ColumnKind, ColumnProfile, CorrelationMatrix, DatasetOverview, DecompositionResult,
    DescriptiveStats, OutlierResult, Outcome, PcaResult, Unavailable,
};
