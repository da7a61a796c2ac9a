//! # dashlab - statistical core of a tabular-data dashboard
//!
//! dashlab takes a dataset uploaded to the dashboard and produces the numbers the
//! dashboard renders: descriptive statistics, correlation matrices, principal
//! component projections, seasonal decompositions and outlier flags.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dashlab::analyser::Analyzer;
//! use dashlab::analyser::logic::{Dataset, Outcome, load_df};
//!
//! # fn main() -> dashlab::error::Result<()> {
//! let df = load_df("sales.csv".as_ref())?;
//! let dataset = Dataset::new(df)?;
//! let analyzer = Analyzer::new(&dataset);
//!
//! match analyzer.basic_stats("revenue")? {
//!     Outcome::Available(stats) => println!("mean revenue {}", stats.mean),
//!     Outcome::Unavailable(reason) => println!("no statistics: {reason}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`analyser`]: the [`Analyzer`](analyser::Analyzer) and its algorithms
//!   - [`analyser::logic`]: dataset model, coercion and the numeric routines
//! - [`config`]: analysis and logging settings
//! - [`error`]: error types and the hard/soft failure split
//! - [`logging`]: tracing subscriber setup
//! - [`utils`]: common utility functions
//!
//! ## Failure model
//!
//! Requests that name unknown columns or pass malformed arguments fail with
//! [`error::AnalysisError`]. Data that simply cannot support an analysis yields
//! [`Outcome::Unavailable`](analyser::logic::Outcome) with a reason, so the
//! dashboard can show an empty state instead of an error.

#![warn(clippy::all, rust_2018_idioms)]

pub mod analyser;
pub mod config;
pub mod error;
pub mod logging;
pub mod utils;
