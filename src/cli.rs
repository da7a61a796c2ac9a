use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use dashlab::analyser::Analyzer;
use dashlab::analyser::logic::{Dataset, DescriptiveStats, load_df};
use dashlab::config::{AppConfig, OutlierMethod};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dashlab", about = "Statistical analysis of tabular datasets")]
pub struct Cli {
    /// Path to a JSON configuration file. Defaults to the app data directory.
    #[arg(long, global = true, env = "DASHLAB_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show row and column counts, column kinds and missing values
    Overview {
        /// Dataset to load (CSV, Parquet, JSON)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Descriptive statistics of one column
    Stats {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long)]
        column: String,
    },
    /// Pearson correlation matrix of numeric columns
    Correlate {
        #[arg(short, long)]
        file: PathBuf,

        /// Columns to correlate. Defaults to every numeric column.
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// Principal component analysis
    Pca {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, value_delimiter = ',', required = true)]
        columns: Vec<String>,

        /// Number of components. Defaults to the configured value.
        #[arg(short = 'n', long)]
        components: Option<usize>,
    },
    /// Trend/seasonal/residual decomposition of a time series
    Decompose {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(long)]
        date: String,

        #[arg(long)]
        value: String,

        /// Seasonal period. Defaults to min(12, rows / 2).
        #[arg(long)]
        period: Option<usize>,
    },
    /// Flag outliers in one column
    Outliers {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long)]
        column: String,

        /// Score threshold. Defaults to the configured value (3.0).
        #[arg(long)]
        threshold: Option<f64>,

        /// Use the median/MAD based score instead of the classic z-score
        #[arg(long)]
        robust: bool,
    },
}

pub fn load_config(path: Option<&Path>) -> Result<(AppConfig, Option<String>)> {
    match path {
        Some(p) => {
            let config = dashlab::config::load_config_from(p)
                .with_context(|| format!("Failed to load config {}", p.display()))?;
            Ok((config, None))
        }
        None => Ok(dashlab::config::load_app_config()),
    }
}

fn load_dataset(file: &Path) -> Result<Dataset> {
    let df = load_df(file).with_context(|| format!("Failed to load {}", file.display()))?;
    Ok(Dataset::new(df)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{json}");
    Ok(())
}

pub fn run_command(command: Commands, config: &AppConfig) -> Result<()> {
    let mut settings = config.analysis.clone();

    match command {
        Commands::Overview { file } => {
            let dataset = load_dataset(&file)?;
            print_json(&dataset.overview())
        }
        Commands::Stats { file, column } => {
            let dataset = load_dataset(&file)?;
            let analyzer = Analyzer::with_settings(&dataset, settings)?;
            let outcome = analyzer.basic_stats(&column)?;
            let interpretation = outcome
                .as_available()
                .map(DescriptiveStats::interpretation)
                .unwrap_or_default();
            print_json(&serde_json::json!({
                "outcome": outcome,
                "interpretation": interpretation,
            }))
        }
        Commands::Correlate { file, columns } => {
            let dataset = load_dataset(&file)?;
            let analyzer = Analyzer::with_settings(&dataset, settings)?;
            let names: Vec<&str> = columns.iter().map(String::as_str).collect();
            let selection = if names.is_empty() {
                None
            } else {
                Some(names.as_slice())
            };
            print_json(&analyzer.correlation_analysis(selection)?)
        }
        Commands::Pca {
            file,
            columns,
            components,
        } => {
            let dataset = load_dataset(&file)?;
            let analyzer = Analyzer::with_settings(&dataset, settings)?;
            let names: Vec<&str> = columns.iter().map(String::as_str).collect();
            print_json(&analyzer.perform_pca(&names, components)?)
        }
        Commands::Decompose {
            file,
            date,
            value,
            period,
        } => {
            if period.is_some() {
                settings.seasonal_period = period;
            }
            let dataset = load_dataset(&file)?;
            let analyzer = Analyzer::with_settings(&dataset, settings)?;
            print_json(&analyzer.time_series_analysis(&date, &value)?)
        }
        Commands::Outliers {
            file,
            column,
            threshold,
            robust,
        } => {
            if let Some(t) = threshold {
                settings.outlier_z_threshold = t;
            }
            if robust {
                settings.outlier_method = OutlierMethod::ModifiedZScore;
            }
            let dataset = load_dataset(&file)?;
            let analyzer = Analyzer::with_settings(&dataset, settings)?;
            print_json(&analyzer.outlier_detection(&column)?)
        }
    }
}
